use async_trait::async_trait;
use drill_core::model::SessionSnapshot;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::record::SnapshotRecord;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<drill_core::Error> for StorageError {
    fn from(err: drill_core::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Repository contract for the session snapshot slot.
///
/// A slot holds exactly one snapshot; saving fully replaces the previous value.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Fetch the snapshot stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored payload is corrupted,
    /// or other storage errors.
    async fn load_snapshot(&self, key: &str) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Overwrite the slot `key` with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_snapshot(&self, key: &str, snapshot: &SessionSnapshot)
    -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and ephemeral runs.
///
/// Payloads are kept in their encoded JSON form so the wire mapping is
/// exercised exactly as with a durable backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a raw payload, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, key: &str, payload: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), payload.into());
        Ok(())
    }

    /// Raw payload currently stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn load_snapshot(&self, key: &str) -> Result<Option<SessionSnapshot>, StorageError> {
        self.raw(key)?
            .map(|payload| SnapshotRecord::decode(&payload))
            .transpose()
    }

    async fn save_snapshot(
        &self,
        key: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), StorageError> {
        let payload = SnapshotRecord::encode(snapshot)?;
        self.put_raw(key, payload)
    }
}

/// Snapshot repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let snapshots: Arc<dyn SnapshotRepository> = Arc::new(InMemoryRepository::new());
        Self { snapshots }
    }
}
