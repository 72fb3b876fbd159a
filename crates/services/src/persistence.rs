use std::sync::Arc;

use drill_core::model::SessionSnapshot;
use storage::repository::{InMemoryRepository, SnapshotRepository};

/// Fixed slot under which the single learner's session is stored.
pub const SESSION_SLOT_KEY: &str = "math_practice_session";

/// Best-effort write-through mirror of the session snapshot.
///
/// Failures are logged and swallowed: an unreadable slot loads as absent and
/// a failed save leaves the session running in memory.
#[derive(Clone)]
pub struct PersistenceLayer {
    repo: Arc<dyn SnapshotRepository>,
    key: String,
}

impl PersistenceLayer {
    #[must_use]
    pub fn new(repo: Arc<dyn SnapshotRepository>) -> Self {
        Self::with_key(repo, SESSION_SLOT_KEY)
    }

    #[must_use]
    pub fn with_key(repo: Arc<dyn SnapshotRepository>, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    /// Persistence that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored snapshot; `None` when absent or unreadable.
    pub async fn load(&self) -> Option<SessionSnapshot> {
        match self.repo.load_snapshot(&self.key).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding unreadable session snapshot");
                None
            }
        }
    }

    /// Overwrite the stored snapshot. Errors are logged, never returned.
    pub async fn save(&self, snapshot: &SessionSnapshot) {
        if let Err(err) = self.repo.save_snapshot(&self.key, snapshot).await {
            tracing::warn!(key = %self.key, error = %err, "failed to persist session snapshot");
        }
    }
}
