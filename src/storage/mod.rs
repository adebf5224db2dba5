//! Durable identity storage.

pub mod sqlite;

use crate::model::types::{Identity, IdentityId};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("creating store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("opening identity store at {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("store {op} timed out after {}ms", .after.as_millis())]
    Timeout { op: &'static str, after: Duration },
    #[error("store {op} failed: {source}")]
    Sqlite {
        op: &'static str,
        source: rusqlite::Error,
    },
}

impl StoreError {
    /// Open-time failures are fatal at startup; everything else is scoped to
    /// the action that hit it.
    pub fn is_fault(&self) -> bool {
        matches!(self, StoreError::CreateDir { .. } | StoreError::Open { .. })
    }
}

/// Keyed CRUD over identity records, deduplicated on the trimmed
/// `(name, email)` pair.
pub trait IdentityStore {
    /// All identities ordered by name, case-insensitively.
    fn list(&self) -> Result<Vec<Identity>, StoreError>;

    /// Insert the trimmed pair. Returns `None` when the pair already exists.
    fn insert(&self, name: &str, email: &str) -> Result<Option<IdentityId>, StoreError>;

    /// Remove by id. Unknown ids are ignored.
    fn delete(&self, id: IdentityId) -> Result<(), StoreError>;

    /// Delete `id`, then insert the pair, as one unit. An edit always yields
    /// a fresh id, or `None` when the new pair merged into an existing row.
    fn replace(
        &self,
        id: IdentityId,
        name: &str,
        email: &str,
    ) -> Result<Option<IdentityId>, StoreError>;
}

impl<S: IdentityStore + ?Sized> IdentityStore for &S {
    fn list(&self) -> Result<Vec<Identity>, StoreError> {
        (**self).list()
    }

    fn insert(&self, name: &str, email: &str) -> Result<Option<IdentityId>, StoreError> {
        (**self).insert(name, email)
    }

    fn delete(&self, id: IdentityId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn replace(
        &self,
        id: IdentityId,
        name: &str,
        email: &str,
    ) -> Result<Option<IdentityId>, StoreError> {
        (**self).replace(id, name, email)
    }
}
