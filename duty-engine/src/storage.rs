//! redb-based storage layer for the duty document
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `document` | `"current"` | `DutyDocument` (JSON) | The single persisted aggregate |
//!
//! The whole document is rewritten in one write transaction per mutation,
//! so a reader never observes a half-applied action.

use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::state::DutyDocument;

/// Table for the aggregate: key = document name, value = JSON-serialized DutyDocument
const DOCUMENT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("document");

const DOCUMENT_KEY: &str = "current";

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

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence seam for the duty document
///
/// `save` must be atomic: either the whole document is stored or nothing is.
pub trait DocumentStore: Send + Sync {
    /// Load the stored document (`None` on a fresh store)
    fn load(&self) -> StorageResult<Option<DutyDocument>>;

    /// Replace the stored document
    fn save(&self, document: &DutyDocument) -> StorageResult<()>;
}

/// Document storage backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate` by default: once `commit()`
    /// returns the document is on disk, and the copy-on-write pointer swap
    /// keeps the file consistent across power loss.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and dry runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DOCUMENT_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl DocumentStore for RedbStore {
    fn load(&self) -> StorageResult<Option<DutyDocument>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOCUMENT_TABLE)?;
        match table.get(DOCUMENT_KEY)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn save(&self, document: &DutyDocument) -> StorageResult<()> {
        let bytes = serde_json::to_vec(document)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOCUMENT_TABLE)?;
            table.insert(DOCUMENT_KEY, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
