//! Device notification boundary for link reminders.
//!
//! # Responsibility
//! - Define the scheduler contract invoked when a link's reminder changes.
//! - Build the notification payload for a link.
//!
//! # Invariants
//! - A link owns at most one notification, addressed by `link_<id>`.

use crate::model::link::Link;
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTIFICATION_TITLE: &str = "Link Reminder";

/// Failure reported by a notification backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerError(pub String);

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "reminder scheduling failed: {}", self.0)
    }
}

impl Error for SchedulerError {}

/// Notification payload for one link reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub scheduled_for: DateTime<Utc>,
}

impl ReminderNotification {
    /// Builds the payload for `link`, or `None` when it has no reminder.
    pub fn for_link(link: &Link) -> Option<Self> {
        let scheduled_for = link.reminder?;
        Some(Self {
            id: notification_id(&link.id),
            title: NOTIFICATION_TITLE.to_string(),
            body: format!("Remember to check: {}", link.title),
            scheduled_for,
        })
    }
}

/// Stable notification id for a link.
pub fn notification_id(link_id: &str) -> String {
    format!("link_{link_id}")
}

/// Notification service used by link use-cases.
pub trait ReminderScheduler {
    /// Schedules `notification`, replacing any pending one with the same id.
    fn schedule(&self, notification: &ReminderNotification) -> Result<(), SchedulerError>;
    fn cancel(&self, notification_id: &str) -> Result<(), SchedulerError>;
    fn cancel_all(&self) -> Result<(), SchedulerError>;
}

impl<N: ReminderScheduler + ?Sized> ReminderScheduler for &N {
    fn schedule(&self, notification: &ReminderNotification) -> Result<(), SchedulerError> {
        (**self).schedule(notification)
    }

    fn cancel(&self, notification_id: &str) -> Result<(), SchedulerError> {
        (**self).cancel(notification_id)
    }

    fn cancel_all(&self) -> Result<(), SchedulerError> {
        (**self).cancel_all()
    }
}

/// Scheduler for hosts without a notification service; records intent in
/// the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyScheduler;

impl ReminderScheduler for LogOnlyScheduler {
    fn schedule(&self, notification: &ReminderNotification) -> Result<(), SchedulerError> {
        info!(
            "event=reminder_schedule module=reminder status=logged notification_id={} scheduled_for={}",
            notification.id,
            notification.scheduled_for.to_rfc3339()
        );
        Ok(())
    }

    fn cancel(&self, notification_id: &str) -> Result<(), SchedulerError> {
        info!(
            "event=reminder_cancel module=reminder status=logged notification_id={}",
            notification_id
        );
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), SchedulerError> {
        info!("event=reminder_cancel_all module=reminder status=logged");
        Ok(())
    }
}
