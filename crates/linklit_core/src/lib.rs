//! Core domain logic for Linklit, a local-first link saver.
//! This crate owns storage, ordering and seeding rules; front ends only
//! render and collect input.

pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod reminder;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use kv::{KeyValueStore, KvError, MemoryKeyValueStore, SqliteKeyValueStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{Collection, CollectionPatch};
pub use model::link::{Link, LinkPatch};
pub use ordering::{
    compare_by_reminder_priority, filter_and_sort, sort_by_reminder_priority,
    sorted_by_reminder_priority, CompletionFilter,
};
pub use reminder::scheduler::{
    LogOnlyScheduler, ReminderNotification, ReminderScheduler, SchedulerError,
};
pub use reminder::{describe_reminder, QuickReminder, ReminderStats, ReminderUrgency};
pub use repo::record_store::{Record, RecordStore, RepoError, RepoResult};
pub use service::collection_service::{
    CollectionDetail, CollectionDraft, CollectionService, CollectionServiceError,
};
pub use service::link_service::{LinkDraft, LinkService, LinkServiceError, SaveOutcome};
pub use service::seed_service::{DefaultSeeder, SeedOutcome};
pub use service::transfer_service::{
    BackupDocument, ImportSummary, TransferError, TransferService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
