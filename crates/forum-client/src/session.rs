//! Session state and the session store
//!
//! A [`Session`] is the client's record of current authentication: token plus
//! username, both present or both absent. The half-authenticated state is
//! unrepresentable by construction. [`SessionStore`] owns the current session,
//! runs the login/logout transitions against the auth endpoint, and keeps
//! durable storage in sync on every change so a restart restores the session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::auth::AuthEndpoint;
use crate::errors::{ClientError, StorageError};
use crate::storage::SessionStorage;

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// Token and username of an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Opaque bearer token issued by the auth service
    pub token: String,
    /// Display name the user logged in with
    pub username: String,
}

/// The client's record of current authentication.
///
/// Empty until a login (or a restore of a previously persisted session)
/// succeeds. Cleared atomically on logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    data: Option<SessionData>,
}

impl Session {
    /// An unauthenticated session.
    pub fn empty() -> Self {
        Self { data: None }
    }

    /// A session populated from a completed authentication exchange.
    pub fn authenticated(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            data: Some(SessionData {
                token: token.into(),
                username: username.into(),
            }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.username.as_str())
    }

    pub(crate) fn data(&self) -> Option<&SessionData> {
        self.data.as_ref()
    }
}

// ----------------------------------------------------------------------------
// Session Store
// ----------------------------------------------------------------------------

/// Owns the current [`Session`] and its transitions.
///
/// Login and register are serialized: the store holds its lock across the
/// whole network exchange, so a second call issued while one is pending queues
/// behind it rather than racing it.
pub struct SessionStore {
    auth: Arc<dyn AuthEndpoint>,
    storage: Arc<dyn SessionStorage>,
    current: Mutex<Session>,
}

impl SessionStore {
    pub fn new(auth: Arc<dyn AuthEndpoint>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            auth,
            storage,
            current: Mutex::new(Session::empty()),
        }
    }

    /// Current session snapshot.
    pub async fn session(&self) -> Session {
        self.current.lock().await.clone()
    }

    /// Reload the session from durable storage. No network access.
    ///
    /// Called once at startup; a restored token is treated as a fresh login
    /// for connection-opening purposes by the facade.
    pub async fn restore(&self) -> Result<Session, StorageError> {
        let restored = self.storage.load()?;
        let mut current = self.current.lock().await;
        *current = restored.clone();
        debug!(
            authenticated = restored.is_authenticated(),
            "session restored from storage"
        );
        Ok(restored)
    }

    /// Authenticate against the auth endpoint and establish a session.
    ///
    /// On success the token and username are persisted to durable storage
    /// before the in-memory session is updated, so no partial state survives
    /// a failure anywhere along the way.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let mut current = self.current.lock().await;
        let token = self.auth.login(username, password).await?;
        let session = Session::authenticated(token, username);
        self.persist(&session)?;
        *current = session.clone();
        info!(username, "login succeeded");
        Ok(session)
    }

    /// Create an account and establish a session, under the same contract as
    /// [`login`](Self::login).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let mut current = self.current.lock().await;
        let token = self.auth.register(username, email, password).await?;
        let session = Session::authenticated(token, username);
        self.persist(&session)?;
        *current = session.clone();
        info!(username, "registration succeeded");
        Ok(session)
    }

    /// Clear the session from memory and durable storage.
    ///
    /// Idempotent: logging out of an already-empty session is a no-op with
    /// the same observable result. Memory is cleared even if the storage
    /// clear fails, so the client is always logged out afterwards.
    pub async fn logout(&self) -> Result<(), StorageError> {
        let mut current = self.current.lock().await;
        *current = Session::empty();
        self.storage.clear()?;
        info!("logged out");
        Ok(())
    }

    fn persist(&self, session: &Session) -> Result<(), StorageError> {
        match session.data() {
            Some(data) => self.storage.store(data),
            None => self.storage.clear(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
