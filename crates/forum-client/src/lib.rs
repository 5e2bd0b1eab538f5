//! Forum chat client core
//!
//! Client-resident session and messaging state for the forum web service:
//! a session store that persists the token/username pair across restarts, a
//! connection manager owning the single duplex chat channel, and a pure
//! view-state projection for frontends. The auth endpoint, the chat
//! WebSocket, and the forum HTTP API are external collaborators reached
//! through trait seams, so the whole core runs against mocks in tests.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod connection;
pub mod errors;
pub mod session;
pub mod storage;
pub mod transport;
pub mod view;
pub mod wire;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use api::ForumApi;
pub use auth::{AuthEndpoint, HttpAuthEndpoint};
pub use client::ForumClient;
pub use config::ClientConfig;
pub use connection::{ConnectionManager, ConnectionState};
pub use errors::{ApiError, AuthError, ClientError, ConnectError, Result, SendError, StorageError};
pub use session::{Session, SessionData, SessionStore};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use transport::{ChannelFactory, ChannelSink, ChannelStream, WebSocketChannelFactory};
pub use view::{ViewState, Visibility};
pub use wire::{ChatFrame, ChatMessage, OutgoingMessage};
