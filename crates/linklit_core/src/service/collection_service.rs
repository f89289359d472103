//! Collection use-case service.
//!
//! # Responsibility
//! - Validate and persist collection create/edit requests.
//! - Detach member links before a collection is deleted.
//! - Recompute advisory `link_count` values for display.
//!
//! # Invariants
//! - Names are trimmed, non-empty and at most 50 characters.
//! - Descriptions are at most 200 characters.
//! - New or edited colors come from the fixed palette.
//! - Deleting a collection never deletes a link.

use crate::kv::KeyValueStore;
use crate::model::collection::{palette_color, Collection, CollectionPatch};
use crate::model::link::{Link, LinkPatch};
use crate::ordering::{sorted_by_reminder_priority, CompletionFilter};
use crate::reminder::ReminderStats;
use crate::repo::record_store::{RecordStore, RepoError};
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const COLLECTION_NAME_MAX_CHARS: usize = 50;
pub const COLLECTION_DESCRIPTION_MAX_CHARS: usize = 200;

#[derive(Debug)]
pub enum CollectionServiceError {
    NameRequired,
    NameTooLong { max: usize, actual: usize },
    DescriptionTooLong { max: usize, actual: usize },
    /// Color is neither a palette name nor a palette hex value.
    UnknownColor(String),
    CollectionNotFound(String),
    Repo(RepoError),
}

impl Display for CollectionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "please enter a collection name"),
            Self::NameTooLong { max, actual } => {
                write!(f, "collection name is {actual} characters; the limit is {max}")
            }
            Self::DescriptionTooLong { max, actual } => {
                write!(f, "description is {actual} characters; the limit is {max}")
            }
            Self::UnknownColor(value) => write!(f, "color `{value}` is not in the palette"),
            Self::CollectionNotFound(id) => write!(f, "collection not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CollectionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CollectionServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Form input for creating or editing a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDraft {
    pub name: String,
    pub description: String,
    /// Palette name (`blue`) or hex value (`#3B82F6`).
    pub color: String,
}

impl Default for CollectionDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            color: "blue".to_string(),
        }
    }
}

/// Collection view with its ordered links and derived counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDetail {
    pub collection: Collection,
    /// Member links in reminder-priority order.
    pub links: Vec<Link>,
    pub reminder_stats: ReminderStats,
    pub active_count: usize,
    pub completed_count: usize,
}

pub struct CollectionService<'s, S: KeyValueStore> {
    store: &'s RecordStore<S>,
}

impl<'s, S: KeyValueStore> CollectionService<'s, S> {
    pub fn new(store: &'s RecordStore<S>) -> Self {
        Self { store }
    }

    pub fn create_collection(
        &self,
        draft: &CollectionDraft,
    ) -> Result<Collection, CollectionServiceError> {
        let (name, color) = validate_draft(draft)?;
        let mut collection = Collection::new(Uuid::now_v7().to_string(), name, color, Utc::now());
        collection.description = non_empty(&draft.description);

        self.store.add(collection.clone())?;
        info!("event=collection_create module=service status=ok");
        Ok(collection)
    }

    pub fn edit_collection(
        &self,
        id: &str,
        draft: &CollectionDraft,
    ) -> Result<Collection, CollectionServiceError> {
        let (name, color) = validate_draft(draft)?;
        let patch = CollectionPatch {
            name: Some(name),
            description: Some(non_empty(&draft.description)),
            color: Some(color.to_string()),
            ..CollectionPatch::default()
        };
        self.patch(id, &patch)
    }

    pub fn toggle_complete(&self, id: &str) -> Result<Collection, CollectionServiceError> {
        let collection = self.require(id)?;
        self.patch(id, &CollectionPatch::completed(!collection.is_completed))
    }

    /// Clears `collection_id` on every member link in a single links write,
    /// then deletes the collection. Returns how many links were detached.
    pub fn delete_collection(&self, id: &str) -> Result<usize, CollectionServiceError> {
        self.require(id)?;

        let now = Utc::now();
        let detach = LinkPatch::detach_collection();
        let mut links = self.store.load::<Link>()?;
        let mut detached = 0;
        for link in links.iter_mut().filter(|link| link.belongs_to(id)) {
            link.apply_patch(&detach);
            link.touch(now);
            detached += 1;
        }

        // Members are detached before the collection is removed.
        if detached > 0 {
            self.store.save_all(&links)?;
        }
        self.store.delete::<Collection>(id)?;

        info!(
            "event=collection_delete module=service status=ok detached_links={}",
            detached
        );
        Ok(detached)
    }

    pub fn get_collection(&self, id: &str) -> Result<Option<Collection>, CollectionServiceError> {
        Ok(self.store.find::<Collection>(id)?)
    }

    /// Lists collections matching `filter` with recomputed link counts.
    ///
    /// Unreadable stored data degrades to an empty list.
    pub fn list_collections(&self, filter: CompletionFilter) -> Vec<Collection> {
        let links = self.store.links();
        with_link_counts(self.store.collections(), &links)
            .into_iter()
            .filter(|collection| filter.admits(collection.is_completed))
            .collect()
    }

    /// Loads one collection with its ordered member links and counters.
    pub fn collection_detail(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<CollectionDetail, CollectionServiceError> {
        let mut collection = self.require(id)?;
        let members: Vec<Link> = self
            .store
            .load::<Link>()?
            .into_iter()
            .filter(|link| link.belongs_to(id))
            .collect();

        collection.link_count = count_u32(members.len());
        let completed_count = members.iter().filter(|link| link.is_completed).count();
        Ok(CollectionDetail {
            reminder_stats: ReminderStats::collect(&members, now),
            active_count: members.len() - completed_count,
            completed_count,
            links: sorted_by_reminder_priority(&members),
            collection,
        })
    }

    fn require(&self, id: &str) -> Result<Collection, CollectionServiceError> {
        self.store
            .find::<Collection>(id)?
            .ok_or_else(|| CollectionServiceError::CollectionNotFound(id.to_string()))
    }

    fn patch(
        &self,
        id: &str,
        patch: &CollectionPatch,
    ) -> Result<Collection, CollectionServiceError> {
        if !self.store.update::<Collection>(id, patch)? {
            return Err(CollectionServiceError::CollectionNotFound(id.to_string()));
        }
        self.require(id)
    }
}

/// Replaces each collection's `link_count` with the number of links that
/// reference it.
pub fn with_link_counts(collections: Vec<Collection>, links: &[Link]) -> Vec<Collection> {
    collections
        .into_iter()
        .map(|mut collection| {
            let count = links
                .iter()
                .filter(|link| link.belongs_to(&collection.id))
                .count();
            collection.link_count = count_u32(count);
            collection
        })
        .collect()
}

fn validate_draft(
    draft: &CollectionDraft,
) -> Result<(String, &'static str), CollectionServiceError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CollectionServiceError::NameRequired);
    }
    let actual = name.chars().count();
    if actual > COLLECTION_NAME_MAX_CHARS {
        return Err(CollectionServiceError::NameTooLong {
            max: COLLECTION_NAME_MAX_CHARS,
            actual,
        });
    }

    let description = draft.description.trim().chars().count();
    if description > COLLECTION_DESCRIPTION_MAX_CHARS {
        return Err(CollectionServiceError::DescriptionTooLong {
            max: COLLECTION_DESCRIPTION_MAX_CHARS,
            actual: description,
        });
    }

    let color = palette_color(&draft.color)
        .ok_or_else(|| CollectionServiceError::UnknownColor(draft.color.clone()))?;
    Ok((name.to_string(), color))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{validate_draft, with_link_counts, CollectionDraft, CollectionServiceError};
    use crate::model::collection::Collection;
    use crate::model::link::Link;
    use chrono::{TimeZone, Utc};

    #[test]
    fn draft_validation_trims_and_limits_names() {
        let draft = CollectionDraft {
            name: "  Reading  ".to_string(),
            color: "green".to_string(),
            ..CollectionDraft::default()
        };
        assert_eq!(validate_draft(&draft).unwrap(), ("Reading".to_string(), "#10B981"));

        let too_long = CollectionDraft {
            name: "x".repeat(51),
            ..CollectionDraft::default()
        };
        assert!(matches!(
            validate_draft(&too_long),
            Err(CollectionServiceError::NameTooLong { max: 50, actual: 51 })
        ));

        let long_description = CollectionDraft {
            name: "ok".to_string(),
            description: "d".repeat(201),
            ..CollectionDraft::default()
        };
        assert!(matches!(
            validate_draft(&long_description),
            Err(CollectionServiceError::DescriptionTooLong { max: 200, actual: 201 })
        ));

        let bad_color = CollectionDraft {
            name: "ok".to_string(),
            color: "#123456".to_string(),
            ..CollectionDraft::default()
        };
        assert!(matches!(
            validate_draft(&bad_color),
            Err(CollectionServiceError::UnknownColor(_))
        ));
    }

    #[test]
    fn link_counts_come_from_links_not_the_cached_value() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut stale = Collection::new("c1", "One", "#3B82F6", now);
        stale.link_count = 9;
        let empty = Collection::new("c2", "Two", "#3B82F6", now);

        let mut a = Link::new("a", "https://a.test", "a", now);
        a.collection_id = Some("c1".to_string());
        let b = Link::new("b", "https://b.test", "b", now);

        let counted = with_link_counts(vec![stale, empty], &[a, b]);
        assert_eq!(counted[0].link_count, 1);
        assert_eq!(counted[1].link_count, 0);
    }
}
