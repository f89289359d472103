#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use linklit_core::{
    KeyValueStore, KvError, Link, MemoryKeyValueStore, ReminderNotification, ReminderScheduler,
    SchedulerError,
};
use std::cell::{Cell, RefCell};

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn link(id: &str, created_at: DateTime<Utc>) -> Link {
    Link::new(id, format!("https://{id}.example.com"), id, created_at)
}

/// Scheduler double recording every call.
#[derive(Default)]
pub struct RecordingScheduler {
    pub scheduled: RefCell<Vec<ReminderNotification>>,
    pub cancelled: RefCell<Vec<String>>,
    pub cancel_all_calls: Cell<usize>,
    pub fail: bool,
}

impl RecordingScheduler {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn scheduled_ids(&self) -> Vec<String> {
        self.scheduled
            .borrow()
            .iter()
            .map(|notification| notification.id.clone())
            .collect()
    }

    fn outcome(&self) -> Result<(), SchedulerError> {
        if self.fail {
            Err(SchedulerError("permission denied".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ReminderScheduler for RecordingScheduler {
    fn schedule(&self, notification: &ReminderNotification) -> Result<(), SchedulerError> {
        self.scheduled.borrow_mut().push(notification.clone());
        self.outcome()
    }

    fn cancel(&self, notification_id: &str) -> Result<(), SchedulerError> {
        self.cancelled.borrow_mut().push(notification_id.to_string());
        self.outcome()
    }

    fn cancel_all(&self) -> Result<(), SchedulerError> {
        self.cancel_all_calls.set(self.cancel_all_calls.get() + 1);
        self.outcome()
    }
}

/// In-memory store whose writes can be switched to fail. Records the key of
/// every attempted write.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryKeyValueStore,
    pub fail_writes: Cell<bool>,
    pub written_keys: RefCell<Vec<String>>,
}

impl FlakyStore {
    pub fn writes_to(&self, key: &str) -> usize {
        self.written_keys
            .borrow()
            .iter()
            .filter(|written| written.as_str() == key)
            .count()
    }
}

impl KeyValueStore for FlakyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.written_keys.borrow_mut().push(key.to_string());
        if self.fail_writes.get() {
            return Err(KvError::Backend("disk full".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), KvError> {
        self.inner.remove_item(key)
    }
}
