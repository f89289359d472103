//! Link record and patch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved URL with its metadata.
///
/// Field names serialize in camelCase and timestamps as ISO-8601 strings so
/// persisted blobs and backups stay readable by other clients of the format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Weak reference to a collection. `None` means uncategorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl Link {
    /// Creates an active, uncategorized link stamped at `now`.
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            description: None,
            collection_id: None,
            is_completed: false,
            reminder: None,
            created_at: now,
            updated_at: now,
            favicon: None,
        }
    }

    pub fn has_reminder(&self) -> bool {
        self.reminder.is_some()
    }

    /// Returns whether this link references `collection_id`.
    pub fn belongs_to(&self, collection_id: &str) -> bool {
        self.collection_id.as_deref() == Some(collection_id)
    }

    /// Applies every field present in `patch`, leaving the rest untouched.
    ///
    /// Does not stamp `updated_at`; see [`Link::touch`].
    pub fn apply_patch(&mut self, patch: &LinkPatch) {
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(collection_id) = &patch.collection_id {
            self.collection_id = collection_id.clone();
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(reminder) = patch.reminder {
            self.reminder = reminder;
        }
        if let Some(favicon) = &patch.favicon {
            self.favicon = favicon.clone();
        }
    }

    /// Stamps `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Partial update for a [`Link`].
///
/// Outer `None` leaves a field untouched. For optional fields `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub collection_id: Option<Option<String>>,
    pub is_completed: Option<bool>,
    pub reminder: Option<Option<DateTime<Utc>>>,
    pub favicon: Option<Option<String>>,
}

impl LinkPatch {
    /// Patch setting only the completion flag.
    pub fn completed(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }

    /// Patch clearing the collection reference.
    pub fn detach_collection() -> Self {
        Self {
            collection_id: Some(None),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
