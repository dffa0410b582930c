//! Embedded redb database
//!
//! One database file (`market.redb`) holds every table. The catalog,
//! account and order stores each receive a clone of the same
//! `Arc<Database>` and create their own tables on construction.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: a commit is
//! persistent as soon as `commit()` returns and the file is always in a
//! consistent state. Writers are serialized by redb itself; readers work on
//! MVCC snapshots and never block writers.

use redb::Database;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Database file name inside the work directory
pub const DB_FILE_NAME: &str = "market.redb";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for shared::error::AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Storage failure");
        shared::error::AppError::database(err.to_string())
    }
}

/// Open or create the database file at `path`
pub fn open(path: impl AsRef<Path>) -> StorageResult<Arc<Database>> {
    if let Some(parent) = path.as_ref().parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let db = Database::create(path)?;
    Ok(Arc::new(db))
}

/// Open an in-memory database (tests and ephemeral runs)
pub fn open_in_memory() -> StorageResult<Arc<Database>> {
    let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
    Ok(Arc::new(db))
}
