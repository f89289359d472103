//! Display ordering and completion filters for links.
//!
//! # Invariants
//! - Links with a reminder come before links without one.
//! - Reminders sort ascending; overdue reminders get no extra promotion.
//! - Links without reminders sort by `created_at` descending.
//! - Sorting is stable: exact ties keep input order.

use crate::model::link::Link;
use std::cmp::Ordering;

/// Completion filter shared by link and collection lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionFilter {
    /// Items not yet marked complete.
    #[default]
    Active,
    Completed,
    All,
}

impl CompletionFilter {
    pub fn admits(self, is_completed: bool) -> bool {
        match self {
            Self::Active => !is_completed,
            Self::Completed => is_completed,
            Self::All => true,
        }
    }

    pub fn matches(self, link: &Link) -> bool {
        self.admits(link.is_completed)
    }

    /// Parses `active|completed|all` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" | "done" => Some(Self::Completed),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Pairwise reminder-priority comparator.
pub fn compare_by_reminder_priority(a: &Link, b: &Link) -> Ordering {
    match (a.reminder, b.reminder) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

/// Sorts `links` in place by reminder priority.
pub fn sort_by_reminder_priority(links: &mut [Link]) {
    links.sort_by(compare_by_reminder_priority);
}

/// Returns a reminder-priority ordered copy of `links`.
pub fn sorted_by_reminder_priority(links: &[Link]) -> Vec<Link> {
    let mut sorted = links.to_vec();
    sort_by_reminder_priority(&mut sorted);
    sorted
}

/// Keeps links matching `filter` and orders them for display.
pub fn filter_and_sort(
    links: impl IntoIterator<Item = Link>,
    filter: CompletionFilter,
) -> Vec<Link> {
    let mut visible: Vec<Link> = links
        .into_iter()
        .filter(|link| filter.matches(link))
        .collect();
    sort_by_reminder_priority(&mut visible);
    visible
}
