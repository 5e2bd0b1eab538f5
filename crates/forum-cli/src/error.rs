//! Error handling for the forum CLI

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("forum client error: {0}")]
    Client(#[from] forum_client::ClientError),

    #[error("send failed: {0}")]
    Send(#[from] forum_client::SendError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not logged in (run `forum login` first)")]
    NotLoggedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Config(err.to_string())
    }
}
