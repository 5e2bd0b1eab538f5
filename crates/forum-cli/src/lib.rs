//! Forum CLI library
//!
//! Thin frontend over `forum-client`: command parsing, layered
//! configuration, and the per-command handlers.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
