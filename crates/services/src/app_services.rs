use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::narration::Narrator;
use crate::persistence::PersistenceLayer;
use crate::sessions::{SessionConfig, SessionRuntime};

/// Assembles app-facing services around a storage backend.
#[derive(Clone)]
pub struct AppServices {
    persistence: PersistenceLayer,
    durable: bool,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self {
            persistence: PersistenceLayer::new(Arc::clone(&storage.snapshots)),
            durable: true,
        })
    }

    /// Like `new_sqlite`, but falls back to in-memory storage when the
    /// database cannot be opened.
    pub async fn open(db_url: &str) -> Self {
        match Self::new_sqlite(db_url).await {
            Ok(services) => services,
            Err(err) => {
                tracing::warn!(db_url, error = %err, "storage unavailable, session will not survive a restart");
                Self::in_memory()
            }
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            persistence: PersistenceLayer::new(Arc::clone(&Storage::in_memory().snapshots)),
            durable: false,
        }
    }

    #[must_use]
    pub fn persistence(&self) -> PersistenceLayer {
        self.persistence.clone()
    }

    /// False when running on the in-memory fallback.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Boot a session runtime on this storage with an OS-seeded generator.
    pub async fn boot_runtime(
        &self,
        config: SessionConfig,
        narrator: Arc<dyn Narrator>,
    ) -> SessionRuntime {
        SessionRuntime::boot(config, self.persistence(), narrator, StdRng::from_os_rng()).await
    }
}
