mod common;

use chrono::Duration;
use common::{at, link, RecordingScheduler};
use linklit_core::service::transfer_service::BACKUP_FORMAT_VERSION;
use linklit_core::{
    Collection, KeyValueStore, Link, MemoryKeyValueStore, RecordStore, TransferError,
    TransferService,
};
use serde_json::Value;

#[test]
fn export_carries_records_version_and_timestamp() {
    let store = RecordStore::new(MemoryKeyValueStore::new());
    let now = at(2024, 5, 15, 10, 0);
    store.add(link("a", now)).unwrap();
    store.add(Collection::new("c1", "Work", "#3B82F6", now)).unwrap();

    let json = TransferService::new(&store, RecordingScheduler::default())
        .export_json(now)
        .unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["version"], BACKUP_FORMAT_VERSION);
    assert_eq!(value["appName"], "Linklit");
    assert_eq!(value["exportedAt"], "2024-05-15T10:00:00Z");
    assert_eq!(value["links"][0]["id"], "a");
    assert_eq!(value["collections"][0]["name"], "Work");
}

#[test]
fn import_replaces_data_and_reschedules_future_reminders() {
    let store = RecordStore::new(MemoryKeyValueStore::new());
    let scheduler = RecordingScheduler::default();
    let now = at(2024, 5, 15, 10, 0);
    store.add(link("old", now)).unwrap();

    let mut future = link("future", now);
    future.reminder = Some(now + Duration::days(1));
    let mut past = link("past", now);
    past.reminder = Some(now - Duration::days(1));
    let source = RecordStore::new(MemoryKeyValueStore::new());
    source.save_all(&[future, past]).unwrap();
    source
        .save_all(&[Collection::new("c1", "Work", "#3B82F6", now)])
        .unwrap();
    let backup = TransferService::new(&source, RecordingScheduler::default())
        .export_json(now)
        .unwrap();

    let summary = TransferService::new(&store, &scheduler)
        .import_json(&backup, now)
        .unwrap();

    assert_eq!(summary.links, 2);
    assert_eq!(summary.collections, 1);
    assert_eq!(summary.rescheduled_reminders, 1);
    assert_eq!(summary.exported_at, Some(now));
    assert_eq!(scheduler.cancel_all_calls.get(), 1);
    assert_eq!(scheduler.scheduled_ids(), vec!["link_future".to_string()]);

    let ids: Vec<String> = store
        .load::<Link>()
        .unwrap()
        .into_iter()
        .map(|link| link.id)
        .collect();
    assert_eq!(ids, vec!["future", "past"]);
    assert_eq!(store.load::<Collection>().unwrap().len(), 1);
}

#[test]
fn rejected_import_leaves_store_untouched() {
    let store = RecordStore::new(MemoryKeyValueStore::new());
    let scheduler = RecordingScheduler::default();
    store.add(link("keep", at(2024, 5, 15, 10, 0))).unwrap();
    let before = store.backend().get_item("@linklit_links").unwrap();
    let service = TransferService::new(&store, &scheduler);

    let inputs = [
        r#"{"links": [], "collections": []}"#,
        r#"{"links": [{"id": 1}], "collections": [], "version": "1.0"}"#,
        "definitely not json",
        r#"{"links": [], "collections": [], "version": ""}"#,
        r#"{"links": [], "collections": [], "version": "   "}"#,
        r#"{"links": [], "collections": [], "version": 0}"#,
    ];
    for raw in inputs {
        assert!(matches!(
            service.import_json(raw, at(2024, 5, 15, 10, 0)),
            Err(TransferError::InvalidBackup(_))
        ));
    }

    assert_eq!(store.backend().get_item("@linklit_links").unwrap(), before);
    assert_eq!(scheduler.cancel_all_calls.get(), 0);
}

#[test]
fn clear_all_empties_both_lists_and_cancels_reminders() {
    let store = RecordStore::new(MemoryKeyValueStore::new());
    let scheduler = RecordingScheduler::default();
    let now = at(2024, 5, 15, 10, 0);
    store.add(link("a", now)).unwrap();
    store.add(Collection::new("c1", "Work", "#3B82F6", now)).unwrap();

    TransferService::new(&store, &scheduler).clear_all().unwrap();

    assert!(store.load::<Link>().unwrap().is_empty());
    assert!(store.load::<Collection>().unwrap().is_empty());
    assert_eq!(
        store.backend().get_item("@linklit_links").unwrap().as_deref(),
        Some("[]")
    );
    assert_eq!(scheduler.cancel_all_calls.get(), 1);
}

#[test]
fn corrupt_storage_fails_export() {
    let kv = MemoryKeyValueStore::new();
    kv.set_item("@linklit_collections", "[{").unwrap();
    let store = RecordStore::new(kv);

    assert!(matches!(
        TransferService::new(&store, RecordingScheduler::default())
            .export_json(at(2024, 5, 15, 10, 0)),
        Err(TransferError::Repo(_))
    ));
}
