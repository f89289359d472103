//! Collection record, patch and color palette.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named palette colors a collection may be created with.
pub const COLLECTION_PALETTE: &[(&str, &str)] = &[
    ("blue", "#3B82F6"),
    ("green", "#10B981"),
    ("purple", "#8B5CF6"),
    ("orange", "#F97316"),
    ("pink", "#EC4899"),
    ("teal", "#14B8A6"),
    ("red", "#EF4444"),
    ("gray", "#6B7280"),
];

pub const DEFAULT_COLLECTION_COLOR: &str = "#3B82F6";

/// Resolves a palette entry by name (`teal`) or hex value (`#14b8a6`).
///
/// Returns the canonical hex string, or `None` for colors outside the palette.
pub fn palette_color(value: &str) -> Option<&'static str> {
    let needle = value.trim();
    COLLECTION_PALETTE
        .iter()
        .find(|(name, hex)| name.eq_ignore_ascii_case(needle) || hex.eq_ignore_ascii_case(needle))
        .map(|(_, hex)| *hex)
}

/// A named, colored grouping of links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Advisory cache. Membership truth is the set of links pointing here.
    #[serde(default)]
    pub link_count: u32,
}

impl Collection {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            color: color.into(),
            is_completed: false,
            created_at: now,
            updated_at: now,
            link_count: 0,
        }
    }

    pub fn apply_patch(&mut self, patch: &CollectionPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(link_count) = patch.link_count {
            self.link_count = link_count;
        }
    }

    /// Stamps `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Partial update for a [`Collection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
    pub is_completed: Option<bool>,
    pub link_count: Option<u32>,
}

impl CollectionPatch {
    pub fn completed(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }

    pub fn link_count(link_count: u32) -> Self {
        Self {
            link_count: Some(link_count),
            ..Self::default()
        }
    }
}
