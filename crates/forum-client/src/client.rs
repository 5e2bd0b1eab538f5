//! Client facade
//!
//! `ForumClient` wires the session store and the connection manager together
//! and enforces the one ordering rule between them: the connection is only
//! ever opened after the session write (memory and durable storage) has
//! completed, so a channel can never come up against a stale or absent token.

use std::sync::Arc;

use tracing::warn;

use crate::api::ForumApi;
use crate::auth::{AuthEndpoint, HttpAuthEndpoint};
use crate::config::ClientConfig;
use crate::connection::{ConnectionManager, ConnectionState};
use crate::errors::{ApiError, Result, SendError};
use crate::session::{Session, SessionStore};
use crate::storage::{FileSessionStorage, SessionStorage};
use crate::transport::{ChannelFactory, WebSocketChannelFactory};
use crate::view::ViewState;
use crate::wire::ChatMessage;

/// The forum chat client: session plus the single chat connection.
pub struct ForumClient {
    store: SessionStore,
    connection: ConnectionManager,
    api: ForumApi,
}

impl ForumClient {
    /// Build a client against the configured endpoints with file-backed
    /// session storage.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_parts(
            Arc::new(HttpAuthEndpoint::new(config.auth_url.clone())),
            Arc::new(FileSessionStorage::new(config.session_file.clone())),
            Box::new(WebSocketChannelFactory::new(config.chat_url.clone())),
            ForumApi::new(config.auth_url.clone()),
        )
    }

    /// Build a client from explicit collaborators. This is the seam tests
    /// and embedders use to swap the network out.
    pub fn with_parts(
        auth: Arc<dyn AuthEndpoint>,
        storage: Arc<dyn SessionStorage>,
        factory: Box<dyn ChannelFactory>,
        api: ForumApi,
    ) -> Self {
        Self {
            store: SessionStore::new(auth, storage),
            connection: ConnectionManager::new(factory),
            api,
        }
    }

    /// Restore the persisted session at startup. A restored token counts as
    /// a login: the chat connection is opened for it. A connect failure is
    /// logged and left for an explicit [`ensure_connected`](Self::ensure_connected)
    /// retry, the way a page load proceeds even when its socket does not
    /// come up.
    pub async fn restore(&self) -> Result<Session> {
        let session = self.store.restore().await?;
        if session.is_authenticated() {
            if let Err(e) = self.connection.ensure_open(&session).await {
                warn!("restored session but chat connection failed: {}", e);
            }
        }
        Ok(session)
    }

    /// Log in and open the chat connection.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let session = self.store.login(username, password).await?;
        self.connection.ensure_open(&session).await?;
        Ok(session)
    }

    /// Register a new account and open the chat connection.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Session> {
        let session = self.store.register(username, email, password).await?;
        self.connection.ensure_open(&session).await?;
        Ok(session)
    }

    /// Log out: clear the session, then close the connection.
    ///
    /// The channel is torn down even when the durable-storage clear fails;
    /// a connection must never outlive the in-memory session.
    pub async fn logout(&self) -> Result<()> {
        let cleared = self.store.logout().await;
        self.connection.close().await;
        cleared?;
        Ok(())
    }

    /// Send a chat message over the open connection.
    pub async fn send_message(&self, content: &str) -> std::result::Result<(), SendError> {
        self.connection.send(content).await
    }

    /// Register a handler for inbound chat frames.
    pub async fn on_message<F>(&self, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.connection.on_message(handler).await;
    }

    /// Re-open the chat connection after a transport failure.
    pub async fn ensure_connected(&self) -> Result<()> {
        let session = self.store.session().await;
        self.connection.ensure_open(&session).await?;
        Ok(())
    }

    /// Fetch recent chat history over the HTTP API.
    pub async fn fetch_messages(&self, limit: usize) -> Result<Vec<ChatMessage>> {
        let session = self.store.session().await;
        let token = session.token().ok_or(ApiError::Unauthorized)?;
        let messages = self.api.fetch_messages(token, limit).await?;
        Ok(messages)
    }

    /// Current session snapshot.
    pub async fn session(&self) -> Session {
        self.store.session().await
    }

    /// Current connection state.
    pub async fn connection_state(&self) -> ConnectionState {
        self.connection.state().await
    }

    /// Project the current session onto frontend visibility.
    pub async fn view(&self) -> ViewState {
        ViewState::for_session(&self.store.session().await)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
