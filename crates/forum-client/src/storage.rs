//! Durable session storage
//!
//! Plays the role the browser's localStorage plays for the web client: a
//! small key/value record holding `token` and `username`, written on every
//! session change and read back once at startup. Absence of the record means
//! "not logged in".

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::StorageError;
use crate::session::{Session, SessionData};

// ----------------------------------------------------------------------------
// Storage Trait
// ----------------------------------------------------------------------------

/// Durable storage for the session record.
///
/// Writes are whole-record: the token and username land (or disappear)
/// together, never one without the other.
pub trait SessionStorage: Send + Sync {
    /// Read the persisted session. An absent record yields an empty session.
    fn load(&self) -> Result<Session, StorageError>;

    /// Persist the record, replacing any previous one.
    fn store(&self, data: &SessionData) -> Result<(), StorageError>;

    /// Remove the record. Clearing absent storage is a no-op.
    fn clear(&self) -> Result<(), StorageError>;
}

// ----------------------------------------------------------------------------
// File-backed Storage
// ----------------------------------------------------------------------------

/// JSON file storage, the durable analogue of the page's localStorage.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Session, StorageError> {
        if !self.path.exists() {
            return Ok(Session::empty());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let data: SessionData =
            serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
                reason: format!("failed to parse session file: {}", e),
            })?;
        Ok(Session::authenticated(data.token, data.username))
    }

    fn store(&self, data: &SessionData) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(data).map_err(|e| StorageError::Corrupt {
            reason: format!("failed to serialize session: {}", e),
        })?;
        std::fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// In-memory Storage
// ----------------------------------------------------------------------------

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySessionStorage {
    inner: Mutex<Option<SessionData>>,
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Session, StorageError> {
        let guard = self.inner.lock().map_err(poisoned)?;
        Ok(match guard.as_ref() {
            Some(data) => Session::authenticated(data.token.clone(), data.username.clone()),
            None => Session::empty(),
        })
    }

    fn store(&self, data: &SessionData) -> Result<(), StorageError> {
        let mut guard = self.inner.lock().map_err(poisoned)?;
        *guard = Some(data.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.inner.lock().map_err(poisoned)?;
        *guard = None;
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Corrupt {
        reason: "session storage lock poisoned".to_string(),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));

        assert!(!storage.load().unwrap().is_authenticated());

        storage
            .store(&SessionData {
                token: "test-token".into(),
                username: "testuser".into(),
            })
            .unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.token(), Some("test-token"));
        assert_eq!(loaded.username(), Some("testuser"));
    }

    #[test]
    fn test_file_storage_clear_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileSessionStorage::new(&path);

        storage
            .store(&SessionData {
                token: "test-token".into(),
                username: "testuser".into(),
            })
            .unwrap();
        storage.clear().unwrap();

        assert!(!path.exists());
        assert!(!storage.load().unwrap().is_authenticated());

        // Clearing again is a no-op
        storage.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json at all").unwrap();

        let storage = FileSessionStorage::new(&path);
        let err = storage.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemorySessionStorage::default();
        storage
            .store(&SessionData {
                token: "t".into(),
                username: "u".into(),
            })
            .unwrap();
        assert!(storage.load().unwrap().is_authenticated());
        storage.clear().unwrap();
        assert!(!storage.load().unwrap().is_authenticated());
    }
}
