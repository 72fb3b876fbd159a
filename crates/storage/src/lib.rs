#![forbid(unsafe_code)]

pub mod record;
pub mod repository;
pub mod sqlite;

pub use record::SnapshotRecord;
pub use repository::{InMemoryRepository, SnapshotRepository, Storage, StorageError};
