//! Key-value blob storage.
//!
//! # Responsibility
//! - Define the opaque string-blob contract the record layer persists into.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `set_item` overwrites the whole value under `key` in one call.
//! - Implementations never interpret stored values.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type KvResult<T> = Result<T, KvError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Backend-specific failure outside SQLite.
    Backend(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "key-value backend failure: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistent string-blob store addressed by key.
pub trait KeyValueStore {
    /// Returns the blob under `key`, or `None` when nothing was stored.
    fn get_item(&self, key: &str) -> KvResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous blob.
    fn set_item(&self, key: &str, value: &str) -> KvResult<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> KvResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> KvResult<()> {
        (**self).remove_item(key)
    }
}
