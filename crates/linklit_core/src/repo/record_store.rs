//! JSON-array record store over a key-value backend.
//!
//! # Responsibility
//! - Persist links and collections as one JSON array blob per kind.
//! - Provide whole-collection CRUD plus the welcome-dismissed flag.
//!
//! # Invariants
//! - Every write replaces the whole blob for its kind in one `set_item` call.
//! - `add` prepends; no id uniqueness check is performed.
//! - Read-modify-write paths never overwrite a blob that failed to parse.
//! - Links and collections are never written atomically together.

use crate::kv::{KeyValueStore, KvError};
use crate::model::collection::{Collection, CollectionPatch};
use crate::model::link::{Link, LinkPatch};
use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const LINKS_KEY: &str = "@linklit_links";
pub const COLLECTIONS_KEY: &str = "@linklit_collections";
pub const WELCOME_DISMISSED_KEY: &str = "@linklit_welcome_dismissed";

const WELCOME_DISMISSED_VALUE: &str = "true";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// The key-value backend failed to read or write.
    Storage(KvError),
    /// A record list could not be serialized.
    Serialize(serde_json::Error),
    /// A stored blob exists but does not parse as a record list.
    Corrupt { key: &'static str, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize records: {err}"),
            Self::Corrupt { key, message } => {
                write!(f, "stored data under `{key}` is corrupt: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Corrupt { .. } => None,
        }
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// A record kind persisted as one JSON array.
pub trait Record: Serialize + DeserializeOwned + Clone {
    type Patch;

    /// Key of the blob holding every record of this kind.
    const STORAGE_KEY: &'static str;
    /// Short label used in log events.
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn apply_patch(&mut self, patch: &Self::Patch);
    fn touch(&mut self, now: DateTime<Utc>);
}

impl Record for Link {
    type Patch = LinkPatch;

    const STORAGE_KEY: &'static str = LINKS_KEY;
    const LABEL: &'static str = "link";

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: &LinkPatch) {
        Link::apply_patch(self, patch);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        Link::touch(self, now);
    }
}

impl Record for Collection {
    type Patch = CollectionPatch;

    const STORAGE_KEY: &'static str = COLLECTIONS_KEY;
    const LABEL: &'static str = "collection";

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: &CollectionPatch) {
        Collection::apply_patch(self, patch);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        Collection::touch(self, now);
    }
}

/// Record store constructed once at startup and shared by services.
pub struct RecordStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Borrows the underlying key-value backend.
    pub fn backend(&self) -> &S {
        &self.kv
    }

    /// Loads every record of kind `T`, degrading to an empty list.
    ///
    /// Absent blobs, read failures and parse failures all yield `[]`; the
    /// latter two are logged. Use [`RecordStore::load`] to tell them apart.
    pub fn get_all<T: Record>(&self) -> Vec<T> {
        match self.load::<T>() {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=records_load module=repo status=degraded kind={} error={}",
                    T::LABEL,
                    err
                );
                Vec::new()
            }
        }
    }

    /// Loads every record of kind `T`.
    ///
    /// Returns `Ok([])` when nothing was stored and `RepoError::Corrupt` when
    /// the stored blob does not parse.
    pub fn load<T: Record>(&self) -> RepoResult<Vec<T>> {
        let Some(raw) = self.kv.get_item(T::STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|err| RepoError::Corrupt {
            key: T::STORAGE_KEY,
            message: err.to_string(),
        })
    }

    /// Serializes `records` and overwrites the blob for kind `T`.
    pub fn save_all<T: Record>(&self, records: &[T]) -> RepoResult<()> {
        let raw = serde_json::to_string(records).map_err(RepoError::Serialize)?;
        if let Err(err) = self.kv.set_item(T::STORAGE_KEY, &raw) {
            error!(
                "event=records_save module=repo status=error kind={} count={} error={}",
                T::LABEL,
                records.len(),
                err
            );
            return Err(err.into());
        }

        debug!(
            "event=records_save module=repo status=ok kind={} count={}",
            T::LABEL,
            records.len()
        );
        Ok(())
    }

    /// Prepends `record` to the stored list.
    pub fn add<T: Record>(&self, record: T) -> RepoResult<()> {
        let mut records = self.load::<T>()?;
        records.insert(0, record);
        self.save_all(&records)
    }

    /// Applies `patch` to the record with `id` and stamps `updated_at = now`.
    ///
    /// Returns `false` without writing when no record has `id`.
    pub fn update<T: Record>(&self, id: &str, patch: &T::Patch) -> RepoResult<bool> {
        self.update_at::<T>(id, patch, Utc::now())
    }

    /// Same as [`RecordStore::update`] with an explicit timestamp.
    pub fn update_at<T: Record>(
        &self,
        id: &str,
        patch: &T::Patch,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut records = self.load::<T>()?;
        let Some(record) = records.iter_mut().find(|record| record.id() == id) else {
            warn!(
                "event=record_update module=repo status=not_found kind={}",
                T::LABEL
            );
            return Ok(false);
        };

        record.apply_patch(patch);
        record.touch(now);
        self.save_all(&records)?;
        Ok(true)
    }

    /// Removes every record with `id`. Returns whether anything was removed.
    pub fn delete<T: Record>(&self, id: &str) -> RepoResult<bool> {
        let mut records = self.load::<T>()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Ok(false);
        }

        self.save_all(&records)?;
        Ok(true)
    }

    /// Finds one record by id.
    pub fn find<T: Record>(&self, id: &str) -> RepoResult<Option<T>> {
        Ok(self
            .load::<T>()?
            .into_iter()
            .find(|record| record.id() == id))
    }

    /// Lenient link list; see [`RecordStore::get_all`].
    pub fn links(&self) -> Vec<Link> {
        self.get_all::<Link>()
    }

    /// Lenient collection list; see [`RecordStore::get_all`].
    pub fn collections(&self) -> Vec<Collection> {
        self.get_all::<Collection>()
    }

    /// Returns whether the welcome card was dismissed.
    ///
    /// Only the exact blob `"true"` counts; read failures count as "not
    /// dismissed".
    pub fn is_welcome_dismissed(&self) -> bool {
        match self.kv.get_item(WELCOME_DISMISSED_KEY) {
            Ok(value) => value.as_deref() == Some(WELCOME_DISMISSED_VALUE),
            Err(err) => {
                warn!(
                    "event=welcome_flag_read module=repo status=error error={}",
                    err
                );
                false
            }
        }
    }

    pub fn set_welcome_dismissed(&self) -> RepoResult<()> {
        self.kv
            .set_item(WELCOME_DISMISSED_KEY, WELCOME_DISMISSED_VALUE)?;
        Ok(())
    }
}
