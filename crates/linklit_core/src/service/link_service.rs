//! Link use-case service.
//!
//! # Responsibility
//! - Validate and persist link create/edit requests.
//! - Keep device reminders in step with link reminder changes.
//! - Serve ordered link lists for display.
//!
//! # Invariants
//! - URLs are trimmed and must parse as absolute URLs before any write.
//! - Titles are at most 100 characters, descriptions at most 300.
//! - A newly set reminder must lie in the future; an unchanged one is kept.
//! - Editing a link that no longer exists creates it instead.
//! - Reminder scheduling failures are logged and never fail the link write.

use crate::kv::KeyValueStore;
use crate::model::link::{Link, LinkPatch};
use crate::ordering::{filter_and_sort, CompletionFilter};
use crate::reminder::scheduler::{notification_id, ReminderNotification, ReminderScheduler};
use crate::repo::record_store::{RecordStore, RepoError};
use crate::service::link_preview::derive_link_preview;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;
use uuid::Uuid;

pub const LINK_TITLE_MAX_CHARS: usize = 100;
pub const LINK_DESCRIPTION_MAX_CHARS: usize = 300;

/// Service error for link use-cases.
#[derive(Debug)]
pub enum LinkServiceError {
    /// URL input is empty after trimming.
    UrlRequired,
    /// URL input does not parse as an absolute URL.
    InvalidUrl(String),
    TitleTooLong { max: usize, actual: usize },
    DescriptionTooLong { max: usize, actual: usize },
    /// A newly chosen reminder is not after the current time.
    ReminderInPast(DateTime<Utc>),
    Repo(RepoError),
}

impl Display for LinkServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UrlRequired => write!(f, "please enter a URL"),
            Self::InvalidUrl(value) => write!(f, "please enter a valid URL: `{value}`"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "title is {actual} characters; the limit is {max}")
            }
            Self::DescriptionTooLong { max, actual } => {
                write!(f, "description is {actual} characters; the limit is {max}")
            }
            Self::ReminderInPast(at) => write!(
                f,
                "please select a future date and time for your reminder (got {})",
                at.to_rfc3339()
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LinkServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LinkServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Form input for creating or editing a link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    pub url: String,
    /// Empty means "derive from URL" on create and "keep" on edit.
    pub title: String,
    pub description: String,
    pub collection_id: Option<String>,
    pub reminder: Option<DateTime<Utc>>,
}

/// Result of an edit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Updated(Link),
    /// The edited link was gone; a new link was created from the draft.
    Created(Link),
}

impl SaveOutcome {
    pub fn link(&self) -> &Link {
        match self {
            Self::Updated(link) | Self::Created(link) => link,
        }
    }
}

/// Link use-cases over an injected record store and reminder scheduler.
pub struct LinkService<'s, S: KeyValueStore, N: ReminderScheduler> {
    store: &'s RecordStore<S>,
    scheduler: N,
}

impl<'s, S: KeyValueStore, N: ReminderScheduler> LinkService<'s, S, N> {
    pub fn new(store: &'s RecordStore<S>, scheduler: N) -> Self {
        Self { store, scheduler }
    }

    /// Creates a link from `draft` and schedules its reminder, if any.
    pub fn create_link(&self, draft: &LinkDraft) -> Result<Link, LinkServiceError> {
        let now = Utc::now();
        let url = validate_draft(draft, None, now)?;
        let preview = derive_link_preview(&url);

        let mut link = Link::new(Uuid::now_v7().to_string(), url, preview.title, now);
        if let Some(title) = non_empty(&draft.title) {
            link.title = title;
        }
        link.description = non_empty(&draft.description);
        link.collection_id = draft.collection_id.as_deref().and_then(non_empty);
        link.reminder = draft.reminder;
        link.favicon = preview.favicon;

        self.store.add(link.clone())?;
        info!(
            "event=link_create module=service status=ok has_reminder={} has_collection={}",
            link.has_reminder(),
            link.collection_id.is_some()
        );

        if let Some(notification) = ReminderNotification::for_link(&link) {
            self.schedule(&notification);
        }
        Ok(link)
    }

    /// Applies `draft` to the link with `id`, or creates it when missing.
    ///
    /// An empty draft title keeps the stored title. Clearing the reminder
    /// cancels the pending notification; setting one reschedules it.
    pub fn edit_link(&self, id: &str, draft: &LinkDraft) -> Result<SaveOutcome, LinkServiceError> {
        let Some(existing) = self.store.find::<Link>(id)? else {
            info!("event=link_edit module=service status=fallback_create");
            return self.create_link(draft).map(SaveOutcome::Created);
        };
        let url = validate_draft(draft, existing.reminder, Utc::now())?;

        let patch = LinkPatch {
            url: Some(url),
            title: non_empty(&draft.title),
            description: Some(non_empty(&draft.description)),
            collection_id: Some(draft.collection_id.as_deref().and_then(non_empty)),
            reminder: Some(draft.reminder),
            ..LinkPatch::default()
        };
        self.store.update::<Link>(id, &patch)?;

        let mut updated = existing.clone();
        updated.apply_patch(&patch);
        match ReminderNotification::for_link(&updated) {
            Some(notification) => {
                self.cancel(&notification.id);
                self.schedule(&notification);
            }
            None if existing.has_reminder() => self.cancel(&notification_id(id)),
            None => {}
        }

        let stored = self.store.find::<Link>(id)?.unwrap_or(updated);
        Ok(SaveOutcome::Updated(stored))
    }

    /// Flips the completion flag. Returns the updated link, or `None` when
    /// no link has `id`.
    pub fn toggle_complete(&self, id: &str) -> Result<Option<Link>, LinkServiceError> {
        let Some(link) = self.store.find::<Link>(id)? else {
            return Ok(None);
        };

        self.store
            .update::<Link>(id, &LinkPatch::completed(!link.is_completed))?;
        Ok(self.store.find::<Link>(id)?)
    }

    /// Deletes the link and cancels its reminder. Returns whether it existed.
    pub fn delete_link(&self, id: &str) -> Result<bool, LinkServiceError> {
        let removed = self.store.delete::<Link>(id)?;
        if removed {
            self.cancel(&notification_id(id));
        }
        Ok(removed)
    }

    pub fn get_link(&self, id: &str) -> Result<Option<Link>, LinkServiceError> {
        Ok(self.store.find::<Link>(id)?)
    }

    /// Lists links matching `filter` in display order.
    ///
    /// Unreadable stored data degrades to an empty list.
    pub fn list_links(&self, filter: CompletionFilter) -> Vec<Link> {
        filter_and_sort(self.store.links(), filter)
    }

    fn schedule(&self, notification: &ReminderNotification) {
        if let Err(err) = self.scheduler.schedule(notification) {
            warn!(
                "event=reminder_schedule module=service status=error notification_id={} error={}",
                notification.id, err
            );
        }
    }

    fn cancel(&self, notification_id: &str) {
        if let Err(err) = self.scheduler.cancel(notification_id) {
            warn!(
                "event=reminder_cancel module=service status=error notification_id={} error={}",
                notification_id, err
            );
        }
    }
}

/// Trims `raw` and checks that it parses as an absolute URL.
pub fn validate_url(raw: &str) -> Result<String, LinkServiceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinkServiceError::UrlRequired);
    }

    Url::parse(trimmed).map_err(|_| LinkServiceError::InvalidUrl(trimmed.to_string()))?;
    Ok(trimmed.to_string())
}

/// Checks every draft field before any write and returns the trimmed URL.
///
/// `current_reminder` is the stored reminder of the edited link; keeping it
/// unchanged is allowed even once it has passed.
fn validate_draft(
    draft: &LinkDraft,
    current_reminder: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<String, LinkServiceError> {
    let url = validate_url(&draft.url)?;

    let title = draft.title.trim().chars().count();
    if title > LINK_TITLE_MAX_CHARS {
        return Err(LinkServiceError::TitleTooLong {
            max: LINK_TITLE_MAX_CHARS,
            actual: title,
        });
    }
    let description = draft.description.trim().chars().count();
    if description > LINK_DESCRIPTION_MAX_CHARS {
        return Err(LinkServiceError::DescriptionTooLong {
            max: LINK_DESCRIPTION_MAX_CHARS,
            actual: description,
        });
    }

    if let Some(reminder) = draft.reminder {
        if reminder <= now && current_reminder != Some(reminder) {
            return Err(LinkServiceError::ReminderInPast(reminder));
        }
    }
    Ok(url)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_draft, validate_url, LinkDraft, LinkServiceError};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn validate_url_trims_and_rejects_relative_input() {
        assert_eq!(
            validate_url("  https://example.com/a  ").unwrap(),
            "https://example.com/a"
        );
        assert!(matches!(validate_url("   "), Err(LinkServiceError::UrlRequired)));
        assert!(matches!(
            validate_url("example.com"),
            Err(LinkServiceError::InvalidUrl(value)) if value == "example.com"
        ));
    }

    #[test]
    fn draft_validation_limits_text_and_reminder_time() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap();
        let draft = LinkDraft {
            url: "https://example.com".to_string(),
            title: "t".repeat(100),
            description: "d".repeat(300),
            reminder: Some(now + Duration::minutes(1)),
            ..LinkDraft::default()
        };
        assert_eq!(validate_draft(&draft, None, now).unwrap(), "https://example.com");

        let long_title = LinkDraft {
            title: "t".repeat(101),
            ..draft.clone()
        };
        assert!(matches!(
            validate_draft(&long_title, None, now),
            Err(LinkServiceError::TitleTooLong { max: 100, actual: 101 })
        ));

        let long_description = LinkDraft {
            description: "d".repeat(301),
            ..draft.clone()
        };
        assert!(matches!(
            validate_draft(&long_description, None, now),
            Err(LinkServiceError::DescriptionTooLong { max: 300, actual: 301 })
        ));

        let past = now - Duration::hours(1);
        let stale = LinkDraft {
            reminder: Some(past),
            ..draft.clone()
        };
        assert!(matches!(
            validate_draft(&stale, None, now),
            Err(LinkServiceError::ReminderInPast(at)) if at == past
        ));
        let exactly_now = LinkDraft {
            reminder: Some(now),
            ..draft
        };
        assert!(validate_draft(&exactly_now, None, now).is_err());
        assert!(validate_draft(&stale, Some(past), now).is_ok());
    }
}
