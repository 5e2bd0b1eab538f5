//! Command-line interface definitions and parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data directory for session persistence
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,
        /// Account password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        /// Account username
        #[arg(short, long)]
        username: String,
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Account password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out and clear the persisted session
    Logout,
    /// Send a single chat message
    Send {
        /// Message content
        message: String,
    },
    /// Stay connected and print incoming chat messages
    Listen,
    /// Show recent chat history
    History {
        /// Number of messages to fetch
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
    /// Show session and connection status
    Status,
}
