//! Unit tests for the latest-value store.

use super::*;
use serde_json::json;
use std::sync::Arc;

fn snap(value: serde_json::Value) -> Snapshot {
    Snapshot::new(value)
}

#[test]
fn test_new_store_is_empty() {
    let store = LatestValueStore::new();
    assert_eq!(store.channel_count(), 0);
    assert!(store.get_all().is_empty());
    assert!(store.get("forecast").is_none());
}

#[test]
fn test_declared_channel_has_no_data() {
    let store = LatestValueStore::new();
    store.declare("forecast");

    assert!(store.get("forecast").is_none());
    assert!(store.get_all().is_empty());

    let status = store.status("forecast").unwrap();
    assert!(!status.has_data);
    assert_eq!(status.version, 0);
    assert!(status.last_success.is_none());
}

#[test]
fn test_put_then_get() {
    let store = LatestValueStore::new();
    let stored = store.put("forecast", snap(json!({"high": 24})));

    assert_eq!(stored.version, 1);
    let got = store.get("forecast").unwrap();
    assert_eq!(got, stored);
    assert_eq!(got.snapshot.as_value()["high"], 24);
}

#[test]
fn test_empty_snapshot_is_still_data() {
    let store = LatestValueStore::new();
    store.put("now_playing", Snapshot::empty());

    let all = store.get_all();
    assert_eq!(all.len(), 1);
    assert!(all[0].snapshot.is_empty());
}

#[test]
fn test_put_replaces_and_bumps_version() {
    let store = LatestValueStore::new();
    store.put("bandwidth", snap(json!({"down": 10})));
    let second = store.put("bandwidth", snap(json!({"down": 20})));

    assert_eq!(second.version, 2);
    assert_eq!(
        store.get("bandwidth").unwrap().snapshot.as_value()["down"],
        20
    );
    assert_eq!(store.get_all().len(), 1);
}

#[test]
fn test_failure_before_success_records_error_only() {
    let store = LatestValueStore::new();
    store.record_failure("forecast", "Network error: refused", 1);

    assert!(store.get("forecast").is_none());
    assert!(store.get_all().is_empty());

    let status = store.status("forecast").unwrap();
    assert_eq!(status.last_error.as_deref(), Some("Network error: refused"));
    assert_eq!(status.consecutive_failures, 1);
}

#[test]
fn test_failure_leaves_snapshot_unchanged() {
    let store = LatestValueStore::new();
    let stored = store.put("services", snap(json!([{"name": "nas", "up": true}])));

    store.record_failure("services", "Request timeout after 3000ms", 1);
    store.record_failure("services", "Request timeout after 3000ms", 2);

    assert_eq!(store.get("services").unwrap(), stored);
    let status = store.status("services").unwrap();
    assert!(status.has_data);
    assert_eq!(status.consecutive_failures, 2);
}

#[test]
fn test_success_clears_error() {
    let store = LatestValueStore::new();
    store.record_failure("volumes", "Backend error 500: boom", 3);
    store.put("volumes", snap(json!([])));

    let status = store.status("volumes").unwrap();
    assert!(status.last_error.is_none());
    assert!(status.last_error_at.is_none());
    assert_eq!(status.consecutive_failures, 0);
}

#[test]
fn test_get_all_sorted_and_skips_channels_without_data() {
    let store = LatestValueStore::new();
    store.declare("volumes");
    store.put("now_playing", Snapshot::empty());
    store.put("forecast", snap(json!({"high": 24})));
    store.record_failure("bandwidth", "Network error: unreachable", 1);

    let channels: Vec<String> = store.get_all().into_iter().map(|s| s.channel).collect();
    assert_eq!(channels, vec!["forecast", "now_playing"]);

    let names: Vec<String> = store.statuses().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["bandwidth", "forecast", "now_playing", "volumes"]);
}

#[test]
fn test_success_timestamp_is_monotonic() {
    let store = LatestValueStore::new();
    let mut previous = store.put("now_playing", Snapshot::empty()).updated_at;
    for _ in 0..50 {
        let next = store.put("now_playing", Snapshot::empty()).updated_at;
        assert!(next >= previous);
        previous = next;
    }
}

#[test]
fn test_concurrent_readers_never_see_torn_entries() {
    let store = Arc::new(LatestValueStore::new());
    store.put("bandwidth", snap(json!({"seq": 0, "copy": 0})));

    let writer = {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            for i in 1..=2000u64 {
                store.put("bandwidth", snap(json!({"seq": i, "copy": i})));
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let mut last_version = 0;
                for _ in 0..2000 {
                    let got = store.get("bandwidth").unwrap();
                    let value = got.snapshot.as_value();
                    assert_eq!(value["seq"], value["copy"]);
                    assert_eq!(value["seq"].as_u64().unwrap() + 1, got.version);
                    assert!(got.version >= last_version);
                    last_version = got.version;
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
