//! Shared error types for the services crate.
//!
//! Session operations themselves never fail: answer parsing, persistence and
//! narration problems degrade a single feature instead. Only bootstrapping
//! can surface an error.

use thiserror::Error;

use storage::sqlite::SqliteInitError;

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
