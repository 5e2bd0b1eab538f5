//! Error types for the forum chat client
//!
//! Authentication, send, and connection failures each get their own taxonomy
//! so the frontend can react per-category (show a login error, prompt a
//! reconnect, and so on). `ClientError` unifies them at the facade boundary.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Specific Error Types
// ----------------------------------------------------------------------------

/// Authentication failures surfaced to the frontend.
///
/// None of these are retried automatically; the user re-submits the form.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("auth server error: {reason}")]
    ServerError { reason: String },

    #[error("network failure: {reason}")]
    NetworkFailure { reason: String },
}

/// Failures while sending a chat message over the duplex channel.
#[derive(Debug, Error)]
pub enum SendError {
    /// No connection is open. Recover with `ConnectionManager::ensure_open`.
    #[error("not connected")]
    NotConnected,

    /// The transport failed mid-send; the connection transitions to `Closed`.
    #[error("transport failure: {reason}")]
    TransportFailure { reason: String },
}

/// Failures while establishing the duplex channel.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("handshake rejected: {reason}")]
    Handshake { reason: String },

    #[error("transport failure: {reason}")]
    Transport { reason: String },
}

/// Durable session storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session file exists but does not parse. Treated as recoverable:
    /// the caller may clear storage and continue logged out.
    #[error("corrupt session storage: {reason}")]
    Corrupt { reason: String },
}

/// Forum HTTP API failures (message history and friends).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("forum server error: {reason}")]
    ServerError { reason: String },

    #[error("network failure: {reason}")]
    NetworkFailure { reason: String },
}

// ----------------------------------------------------------------------------
// Unified Client Error
// ----------------------------------------------------------------------------

/// Unified error type for `ForumClient` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("send failed: {0}")]
    Send(#[from] SendError),

    #[error("connection failed: {0}")]
    Connect(#[from] ConnectError),

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("forum API request failed: {0}")]
    Api(#[from] ApiError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
