//! Reminder presentation: urgency, relative descriptions, statistics and
//! quick presets.
//!
//! # Invariants
//! - All functions are pure with respect to the `now` they are given.
//! - Calendar math (today/tomorrow/09:00) happens in the time zone of `now`.

use crate::model::link::Link;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use std::fmt::Display;

pub mod scheduler;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const QUICK_REMINDER_HOUR: u32 = 9;

/// Visual urgency bucket of a reminder relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderUrgency {
    /// Reminder time already passed.
    Overdue,
    /// Due within the next hour.
    Soon,
    Scheduled,
}

impl ReminderUrgency {
    pub fn classify(reminder: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let diff_ms = reminder.signed_duration_since(now).num_milliseconds();
        if diff_ms < 0 {
            Self::Overdue
        } else if diff_ms < HOUR_MS {
            Self::Soon
        } else {
            Self::Scheduled
        }
    }
}

/// Renders a human-readable reminder label such as `Reminder in 5 minutes`,
/// `Tomorrow at 9:00 AM` or `Overdue (was yesterday at 6:30 PM)`.
pub fn describe_reminder<Tz>(reminder: DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let diff_ms = reminder
        .signed_duration_since(now.with_timezone(&Utc))
        .num_milliseconds();
    let local = reminder.with_timezone(&now.timezone());
    let time = local.format("%-I:%M %p").to_string();

    if diff_ms < 0 {
        let days_ago = now
            .date_naive()
            .signed_duration_since(local.date_naive())
            .num_days();
        return match days_ago {
            d if d <= 0 => format!("Overdue (was today at {time})"),
            1 => format!("Overdue (was yesterday at {time})"),
            _ => format!("Overdue (was {} at {time})", local.format("%-m/%-d/%Y")),
        };
    }

    let diff_minutes = diff_ms.div_euclid(MINUTE_MS);
    let diff_hours = diff_ms.div_euclid(HOUR_MS);
    let diff_days = diff_ms.div_euclid(DAY_MS);

    if diff_minutes < 60 {
        if diff_minutes <= 1 {
            return "Reminder in 1 minute".to_string();
        }
        return format!("Reminder in {diff_minutes} minutes");
    }
    if diff_hours < 24 {
        if diff_hours == 1 {
            return "Reminder in 1 hour".to_string();
        }
        return format!("Reminder in {diff_hours} hours");
    }
    if diff_days == 1 {
        return format!("Tomorrow at {time}");
    }
    if diff_days < 7 {
        return format!("{} at {time}", local.format("%A"));
    }

    let date = if local.year() != now.year() {
        local.format("%b %-d, %Y").to_string()
    } else {
        local.format("%b %-d").to_string()
    };
    format!("{date} at {time}")
}

/// Overdue/upcoming counts over active links that carry a reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderStats {
    pub overdue: usize,
    pub upcoming: usize,
}

impl ReminderStats {
    pub fn collect<'a>(links: impl IntoIterator<Item = &'a Link>, now: DateTime<Utc>) -> Self {
        links
            .into_iter()
            .filter(|link| !link.is_completed)
            .filter_map(|link| link.reminder)
            .fold(Self::default(), |mut stats, reminder| {
                if reminder < now {
                    stats.overdue += 1;
                } else {
                    stats.upcoming += 1;
                }
                stats
            })
    }

    pub fn total(&self) -> usize {
        self.overdue + self.upcoming
    }
}

/// One-tap reminder presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickReminder {
    /// One hour from now.
    InOneHour,
    /// Tomorrow at 09:00.
    TomorrowMorning,
    /// Seven days from now at 09:00.
    NextWeek,
}

impl QuickReminder {
    /// Parses `hour|tomorrow|week`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hour" => Some(Self::InOneHour),
            "tomorrow" => Some(Self::TomorrowMorning),
            "week" => Some(Self::NextWeek),
            _ => None,
        }
    }

    /// Resolves the preset against `now` in its own time zone.
    ///
    /// Returns `None` only when 09:00 does not exist on the target day.
    pub fn resolve<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        match self {
            Self::InOneHour => Some(now.with_timezone(&Utc) + Duration::hours(1)),
            Self::TomorrowMorning => {
                morning_of(&now.timezone(), now.date_naive() + Duration::days(1))
            }
            Self::NextWeek => morning_of(&now.timezone(), now.date_naive() + Duration::days(7)),
        }
    }
}

fn morning_of<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(QUICK_REMINDER_HOUR, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{describe_reminder, QuickReminder, ReminderStats, ReminderUrgency};
    use crate::model::link::Link;
    use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        // Wednesday.
        Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn future_reminders_use_minutes_then_hours() {
        let now = now();
        assert_eq!(
            describe_reminder(now + Duration::seconds(30), &now),
            "Reminder in 1 minute"
        );
        assert_eq!(
            describe_reminder(now + Duration::minutes(25), &now),
            "Reminder in 25 minutes"
        );
        assert_eq!(
            describe_reminder(now + Duration::minutes(61), &now),
            "Reminder in 1 hour"
        );
        assert_eq!(
            describe_reminder(now + Duration::hours(5), &now),
            "Reminder in 5 hours"
        );
    }

    #[test]
    fn future_reminders_use_days_then_dates() {
        let now = now();
        assert_eq!(
            describe_reminder(now + Duration::hours(30), &now),
            "Tomorrow at 4:00 PM"
        );
        assert_eq!(
            describe_reminder(now + Duration::days(3), &now),
            "Saturday at 10:00 AM"
        );
        assert_eq!(
            describe_reminder(now + Duration::days(10), &now),
            "May 25 at 10:00 AM"
        );
        assert_eq!(
            describe_reminder(now + Duration::days(300), &now),
            "Mar 11, 2025 at 10:00 AM"
        );
    }

    #[test]
    fn past_reminders_are_described_as_overdue() {
        let now = now();
        assert_eq!(
            describe_reminder(now - Duration::hours(2), &now),
            "Overdue (was today at 8:00 AM)"
        );
        assert_eq!(
            describe_reminder(now - Duration::hours(20), &now),
            "Overdue (was yesterday at 2:00 PM)"
        );
        assert_eq!(
            describe_reminder(now - Duration::days(4), &now),
            "Overdue (was 5/11/2024 at 10:00 AM)"
        );
    }

    #[test]
    fn descriptions_follow_the_time_zone_of_now() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let local_now = now().with_timezone(&tz);
        assert_eq!(
            describe_reminder(now() + Duration::hours(30), &local_now),
            "Tomorrow at 6:00 PM"
        );
    }

    #[test]
    fn urgency_buckets() {
        let now = now();
        assert_eq!(
            ReminderUrgency::classify(now - Duration::seconds(1), now),
            ReminderUrgency::Overdue
        );
        assert_eq!(
            ReminderUrgency::classify(now + Duration::minutes(59), now),
            ReminderUrgency::Soon
        );
        assert_eq!(
            ReminderUrgency::classify(now + Duration::hours(1), now),
            ReminderUrgency::Scheduled
        );
    }

    #[test]
    fn stats_ignore_completed_links_and_links_without_reminders() {
        let now = now();
        let mut overdue = Link::new("1", "https://a.test", "a", now);
        overdue.reminder = Some(now - Duration::hours(1));
        let mut upcoming = Link::new("2", "https://b.test", "b", now);
        upcoming.reminder = Some(now);
        let mut done = Link::new("3", "https://c.test", "c", now);
        done.reminder = Some(now - Duration::hours(1));
        done.is_completed = true;
        let plain = Link::new("4", "https://d.test", "d", now);

        let stats = ReminderStats::collect(&[overdue, upcoming, done, plain], now);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.upcoming, 1);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn quick_presets_resolve_in_local_time() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let local_now = tz.with_ymd_and_hms(2024, 5, 15, 22, 30, 0).unwrap();

        assert_eq!(
            QuickReminder::InOneHour.resolve(&local_now),
            Some(Utc.with_ymd_and_hms(2024, 5, 16, 4, 30, 0).unwrap())
        );
        assert_eq!(
            QuickReminder::TomorrowMorning.resolve(&local_now),
            Some(Utc.with_ymd_and_hms(2024, 5, 16, 14, 0, 0).unwrap())
        );
        assert_eq!(
            QuickReminder::NextWeek.resolve(&local_now),
            Some(Utc.with_ymd_and_hms(2024, 5, 22, 14, 0, 0).unwrap())
        );
        assert_eq!(QuickReminder::parse("week"), Some(QuickReminder::NextWeek));
        assert_eq!(QuickReminder::parse("someday"), None);
    }
}
