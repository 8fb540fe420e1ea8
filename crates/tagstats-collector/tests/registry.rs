//! Registry lifecycle, gate, and concurrency.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};

use tagstats_collector::{EventBus, StatsRegistry, StatsSettings};
use tagstats_core::ManualClock;

struct Fixture {
    bus: Arc<EventBus>,
    settings: Arc<StatsSettings>,
    clock: Arc<ManualClock>,
    registry: StatsRegistry,
}

fn fixture(ring_size: usize) -> Fixture {
    let bus = Arc::new(EventBus::new());
    let settings = Arc::new(StatsSettings::new(true, ring_size));
    let clock = Arc::new(ManualClock::new(1_000));
    let registry = StatsRegistry::with_clock(Arc::clone(&settings), Arc::clone(&bus), clock.clone());
    registry.init();
    Fixture { bus, settings, clock, registry }
}

#[test]
fn capacity_three_scenario() {
    let f = fixture(3);
    for v in ["a", "b", "c", "d"] {
        f.bus.emit("X", v);
        f.clock.advance(5);
    }

    let values: Vec<Value> = f.registry.values("X").into_iter().map(|e| e.datum).collect();
    assert_eq!(values, vec![json!("b"), json!("c"), json!("d")]);
    assert_eq!(f.registry.stats_for("X").unwrap().count(), 4);
}

#[test]
fn retained_is_capacity_count_is_total() {
    let f = fixture(10);
    for i in 0..250 {
        f.bus.emit("Posts", i);
    }
    let d = f.registry.stats_for("Posts").unwrap();
    assert_eq!(d.retained(), 10);
    assert_eq!(d.count(), 250);
}

#[test]
fn concurrent_first_access_yields_one_instance() {
    let f = fixture(8);
    let all: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..32)
            .map(|_| s.spawn(|| f.registry.stats_for("Login").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(all.iter().all(|d| Arc::ptr_eq(d, &all[0])));
    assert_eq!(f.registry.len(), 1);
}

#[test]
fn concurrent_emits_are_all_counted() {
    let f = fixture(64);
    thread::scope(|s| {
        for t in 0..8 {
            let bus = Arc::clone(&f.bus);
            s.spawn(move || {
                for i in 0..500 {
                    bus.emit(format!("tag-{}", i % 4), json!({ "thread": t, "i": i }));
                }
            });
        }
    });
    let total: u64 = f.registry.records().iter().map(|r| r.count).sum();
    assert_eq!(total, 4_000);
    assert_eq!(f.registry.tags(), vec!["tag-0", "tag-1", "tag-2", "tag-3"]);
    for r in f.registry.records() {
        assert_eq!(r.count, 1_000);
        assert_eq!(f.registry.values(&r.tag).len(), 64);
    }
}

#[test]
fn gate_off_records_nothing_and_does_not_replay() {
    let f = fixture(5);
    f.bus.emit("Spam", "first");
    f.settings.set_active(false);
    f.bus.emit("Spam", "ignored");
    f.bus.emit("Fresh", "ignored");

    assert_eq!(f.registry.stats_for("Spam").unwrap().count(), 1);
    assert!(!f.registry.tags().contains(&"Fresh".to_string()));

    // reads still work while gated
    assert_eq!(f.registry.records().len(), 1);

    f.settings.set_active(true);
    assert_eq!(f.registry.stats_for("Spam").unwrap().count(), 1);
    f.bus.emit("Spam", "second");
    let values: Vec<Value> = f.registry.values("Spam").into_iter().map(|e| e.datum).collect();
    assert_eq!(values, vec![json!("first"), json!("second")]);
}

#[test]
fn stop_clears_history_and_unsubscribes() {
    let f = fixture(5);
    f.bus.emit("Posts", "p1");
    let old = f.registry.stats_for("Posts").unwrap();
    assert_eq!(f.bus.subscriber_count(), 1);

    f.registry.stop();
    assert!(!f.registry.is_subscribed());
    assert_eq!(f.bus.subscriber_count(), 0);
    assert!(f.registry.is_empty());
    assert_eq!(old.retained(), 0);

    let fresh = f.registry.stats_for("Posts").unwrap();
    assert_eq!(fresh.count(), 0);
    assert!(fresh.values().is_empty());

    // not subscribed anymore
    f.bus.emit("Posts", "p2");
    assert_eq!(fresh.count(), 0);
}

#[test]
fn double_init_subscribes_once() {
    let f = fixture(5);
    f.registry.init();
    assert_eq!(f.bus.subscriber_count(), 1);
    f.bus.emit("Once", Value::Null);
    assert_eq!(f.registry.stats_for("Once").unwrap().count(), 1);
}

#[test]
fn restart_time_moves_on_reinit() {
    let f = fixture(5);
    assert_eq!(f.registry.restart_time_ms(), 1_000);
    f.registry.stop();
    f.clock.set(9_000);
    f.registry.init();
    assert_eq!(f.registry.restart_time_ms(), 9_000);
}

#[test]
fn zero_capacity_fails_at_tag_creation_only() {
    let f = fixture(4);
    f.bus.emit("Existing", 1);

    f.settings.set_ring_size(0);
    let err = f.registry.stats_for("New").err().expect("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CAPACITY");

    // producers never see the error; existing tags keep recording
    f.bus.emit("New", 1);
    f.bus.emit("Existing", 2);
    assert!(!f.registry.tags().contains(&"New".to_string()));
    assert_eq!(f.registry.stats_for("Existing").unwrap().count(), 2);
}

#[test]
fn ring_size_change_applies_to_new_tags() {
    let f = fixture(2);
    f.bus.emit("Old", 1);
    f.settings.set_ring_size(7);
    f.bus.emit("New", 1);
    assert_eq!(f.registry.stats_for("Old").unwrap().capacity(), 2);
    assert_eq!(f.registry.stats_for("New").unwrap().capacity(), 7);
}

#[test]
fn degenerate_inputs_are_accepted() {
    let f = fixture(3);
    f.bus.emit("", Value::Null);
    f.registry.on_event("", json!({"odd": [1, 2]}));
    assert_eq!(f.registry.stats_for("").unwrap().count(), 2);
}

#[test]
fn records_sorted_with_rates() {
    let f = fixture(10);
    f.bus.emit("b", 1);
    f.bus.emit("a", 1);
    f.bus.emit("a", 2);
    f.bus.emit("Sent private message", "secret");
    f.clock.advance(60_000);

    let records = f.registry.records();
    let tags: Vec<&str> = records.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, vec!["Sent private message", "a", "b"]);
    assert!((records[1].rate - 2.0).abs() < 1e-9);
    assert!(records[0].detail_forbidden);
    assert!(!records[1].detail_forbidden);
}

#[test]
fn detail_redacts_private_messages() {
    let f = fixture(10);
    f.bus.emit("Sent private message", "to: bob");
    f.bus.emit("Posts", "http://forum/t/1");

    let pm = f.registry.detail("Sent private message").unwrap();
    assert!(pm.values.is_none());
    assert_eq!(pm.record.count, 1);

    let posts = f.registry.detail("Posts").unwrap();
    let values = posts.values.unwrap();
    assert_eq!(values[0].datum, json!("<a href='http://forum/t/1'>http://forum/t/1</a>"));

    assert!(f.registry.detail("Unknown").is_none());
    assert!(f.registry.values("Unknown").is_empty());
    assert!(!f.registry.tags().contains(&"Unknown".to_string()));
}
