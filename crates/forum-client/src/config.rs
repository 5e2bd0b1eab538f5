//! Client configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Endpoints and storage location for the forum client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the auth/forum HTTP API
    pub auth_url: String,

    /// Full WebSocket URL of the chat endpoint
    pub chat_url: String,

    /// Where the session record is persisted across restarts
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://127.0.0.1:8080".to_string(),
            chat_url: "ws://127.0.0.1:8080/ws/chat".to_string(),
            session_file: PathBuf::from("session.json"),
        }
    }
}
