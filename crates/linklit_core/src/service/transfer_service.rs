//! Backup export/import and full data reset.
//!
//! # Responsibility
//! - Serialize links and collections into the portable backup document.
//! - Validate a backup completely before replacing stored data with it.
//! - Reset stored data and pending reminders.
//!
//! # Invariants
//! - A rejected import never writes to the store.
//! - Only reminders still in the future are rescheduled after an import.

use crate::kv::KeyValueStore;
use crate::model::collection::Collection;
use crate::model::link::Link;
use crate::reminder::scheduler::{ReminderNotification, ReminderScheduler};
use crate::repo::record_store::{RecordStore, RepoError};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const BACKUP_FORMAT_VERSION: &str = "1.0";
pub const BACKUP_APP_NAME: &str = "Linklit";

const REQUIRED_BACKUP_FIELDS: [&str; 3] = ["links", "collections", "version"];

#[derive(Debug)]
pub enum TransferError {
    /// The input is not a usable backup document.
    InvalidBackup(String),
    Serialize(serde_json::Error),
    Repo(RepoError),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBackup(message) => write!(f, "invalid backup file: {message}"),
            Self::Serialize(err) => write!(f, "failed to serialize backup: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBackup(_) => None,
            Self::Serialize(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TransferError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Portable backup document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub links: Vec<Link>,
    pub collections: Vec<Collection>,
    /// Absent in hand-edited or foreign backups.
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    pub version: String,
    #[serde(default)]
    pub app_name: Option<String>,
}

/// What an import replaced the stored data with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub links: usize,
    pub collections: usize,
    pub exported_at: Option<DateTime<Utc>>,
    pub rescheduled_reminders: usize,
}

pub struct TransferService<'s, S: KeyValueStore, N: ReminderScheduler> {
    store: &'s RecordStore<S>,
    scheduler: N,
}

impl<'s, S: KeyValueStore, N: ReminderScheduler> TransferService<'s, S, N> {
    pub fn new(store: &'s RecordStore<S>, scheduler: N) -> Self {
        Self { store, scheduler }
    }

    /// Snapshots stored data. Corrupt stored data fails the export instead of
    /// producing an empty backup.
    pub fn export_document(&self, now: DateTime<Utc>) -> Result<BackupDocument, TransferError> {
        Ok(BackupDocument {
            links: self.store.load::<Link>()?,
            collections: self.store.load::<Collection>()?,
            exported_at: Some(now),
            version: BACKUP_FORMAT_VERSION.to_string(),
            app_name: Some(BACKUP_APP_NAME.to_string()),
        })
    }

    /// Pretty-printed JSON backup.
    pub fn export_json(&self, now: DateTime<Utc>) -> Result<String, TransferError> {
        let document = self.export_document(now)?;
        let json = serde_json::to_string_pretty(&document).map_err(TransferError::Serialize)?;
        info!(
            "event=backup_export module=transfer status=ok links={} collections={}",
            document.links.len(),
            document.collections.len()
        );
        Ok(json)
    }

    /// Replaces all stored links and collections with the backup in `raw`.
    pub fn import_json(
        &self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<ImportSummary, TransferError> {
        let document = parse_backup(raw)?;

        if let Err(err) = self.scheduler.cancel_all() {
            warn!("event=backup_import module=transfer status=cancel_failed error={}", err);
        }
        self.store.save_all(&document.links)?;
        self.store.save_all(&document.collections)?;

        let mut rescheduled_reminders = 0;
        for notification in document
            .links
            .iter()
            .filter_map(ReminderNotification::for_link)
            .filter(|notification| notification.scheduled_for > now)
        {
            match self.scheduler.schedule(&notification) {
                Ok(()) => rescheduled_reminders += 1,
                Err(err) => warn!(
                    "event=backup_import module=transfer status=schedule_failed notification_id={} error={}",
                    notification.id, err
                ),
            }
        }

        info!(
            "event=backup_import module=transfer status=ok links={} collections={} rescheduled={}",
            document.links.len(),
            document.collections.len(),
            rescheduled_reminders
        );
        Ok(ImportSummary {
            links: document.links.len(),
            collections: document.collections.len(),
            exported_at: document.exported_at,
            rescheduled_reminders,
        })
    }

    /// Empties both record lists and cancels every pending reminder.
    pub fn clear_all(&self) -> Result<(), TransferError> {
        self.store.save_all::<Link>(&[])?;
        self.store.save_all::<Collection>(&[])?;
        if let Err(err) = self.scheduler.cancel_all() {
            warn!("event=data_clear module=transfer status=cancel_failed error={}", err);
        }
        info!("event=data_clear module=transfer status=ok");
        Ok(())
    }
}

/// Parses and validates a backup document without touching any store.
///
/// `links`, `collections` and `version` must be present and non-null,
/// `version` must not be blank, and every record must parse.
pub fn parse_backup(raw: &str) -> Result<BackupDocument, TransferError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| TransferError::InvalidBackup(format!("not JSON: {err}")))?;
    let Some(object) = value.as_object() else {
        return Err(TransferError::InvalidBackup(
            "expected a JSON object".to_string(),
        ));
    };

    for field in REQUIRED_BACKUP_FIELDS {
        if object.get(field).map_or(true, Value::is_null) {
            return Err(TransferError::InvalidBackup(format!(
                "missing `{field}` field"
            )));
        }
    }

    if object
        .get("version")
        .and_then(Value::as_str)
        .is_some_and(|version| version.trim().is_empty())
    {
        return Err(TransferError::InvalidBackup(
            "blank `version` field".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|err| TransferError::InvalidBackup(err.to_string()))
}
