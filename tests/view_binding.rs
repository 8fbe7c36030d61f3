mod common;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use streakstore::error::StoreError;
use streakstore::store::{Action, StateHub, Store};

use common::settle;

fn collect<T: streakstore::store::StoreValue>(
    store: &Store<T>,
) -> (Arc<Mutex<Vec<T>>>, streakstore::store::Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = store.subscribe(move |value| sink.lock().push(value));
    (seen, sub)
}

#[test]
fn value_falls_back_to_default() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["app", "likes"], 7i64).unwrap();
    assert_eq!(store.value(), 7);
}

#[test]
fn empty_key_is_an_invalid_path() {
    let hub = StateHub::new();
    let err = Store::with_hub(&hub, ["app", ""], 0i64).unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath { .. }));
}

#[test]
fn set_value_writes_through_the_lens() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["app", "likes"], 0i64).unwrap();
    store.set_value(12).unwrap();

    assert_eq!(store.value(), 12);
    assert_eq!(*hub.snapshots().current(), json!({ "app": { "likes": 12 } }));
}

#[test]
fn stores_on_the_same_path_share_state() {
    let hub = StateHub::new();
    let writer = Store::with_hub(&hub, ["shared"], String::new()).unwrap();
    let reader = Store::with_hub(&hub, ["shared"], "unset".to_string()).unwrap();

    assert_eq!(reader.value(), "unset");
    writer.set_value("hello".to_string()).unwrap();
    assert_eq!(reader.value(), "hello");
}

#[test]
fn value_is_an_owned_copy() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["tags"], BTreeMap::<String, i64>::new()).unwrap();
    store
        .set_value(BTreeMap::from([("a".to_string(), 1)]))
        .unwrap();

    let mut copy = store.value();
    copy.insert("b".to_string(), 2);

    assert_eq!(store.value().len(), 1);
}

#[test]
fn mismatched_shape_reads_as_default() {
    let hub = StateHub::new();
    hub.snapshots().publish(json!({ "count": "not a number" }));
    let store = Store::with_hub(&hub, ["count"], 5i64).unwrap();
    assert_eq!(store.value(), 5);
}

#[test]
fn same_value_published_twice_is_emitted_once() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 0i64).unwrap();
    let (seen, _sub) = collect(&store);

    store.set_value(1).unwrap();
    store.set_value(1).unwrap();
    store.set_value(2).unwrap();

    assert_eq!(*seen.lock(), vec![0, 1, 2]);
}

#[test]
fn unrelated_paths_do_not_trigger_emissions() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["a"], 0i64).unwrap();
    let other = Store::with_hub(&hub, ["b"], 0i64).unwrap();
    let (seen, _sub) = collect(&store);

    other.set_value(9).unwrap();
    other.set_value(10).unwrap();

    assert_eq!(*seen.lock(), vec![0]);
}

#[test]
fn late_subscriber_gets_latest_value_first() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 0i64).unwrap();
    for n in 1..=4 {
        store.set_value(n).unwrap();
    }

    let (seen, _sub) = collect(&store);
    assert_eq!(*seen.lock(), vec![4]);
}

#[tokio::test]
async fn changes_stream_starts_with_current_and_skips_duplicates() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 0i64).unwrap();
    store.set_value(3).unwrap();

    let mut changes = store.changes();
    store.set_value(3).unwrap();
    store.set_value(4).unwrap();

    assert_eq!(changes.recv().await, Some(3));
    assert_eq!(changes.recv().await, Some(4));
    assert_eq!(changes.try_recv(), None);
}

#[tokio::test]
async fn each_changes_call_is_independent() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 0i64).unwrap();

    let mut first = store.changes();
    store.set_value(1).unwrap();
    let mut second = store.changes();

    assert_eq!(first.recv().await, Some(0));
    assert_eq!(first.recv().await, Some(1));
    assert_eq!(second.recv().await, Some(1));

    first.close();
    store.set_value(2).unwrap();
    assert_eq!(first.recv().await, None);
    assert_eq!(second.recv().await, Some(2));
}

#[test]
fn reducers_chain_and_fire_in_registration_order() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["log"], Vec::<String>::new())
        .unwrap()
        .add_reducer("STEP", |mut log, _| {
            log.push("first".to_string());
            log
        })
        .add_reducer("STEP", |mut log, _| {
            log.push("second".to_string());
            log
        });

    hub.actions().dispatch(Action::new("STEP")).unwrap();

    assert_eq!(store.value(), vec!["first", "second"]);
}

#[test]
fn reducer_receives_payload() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 10i64)
        .unwrap()
        .add_reducer("ADD", |n, action| n + action.payload_as::<i64>().unwrap_or(0));

    hub.actions().dispatch(Action::with_payload("ADD", 5)).unwrap();
    hub.actions().dispatch(Action::new("ADD")).unwrap();

    assert_eq!(store.value(), 15);
}

#[test]
fn failing_reducer_leaves_snapshot_and_other_reducers_intact() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 0i64)
        .unwrap()
        .try_add_reducer("ADD", |n, action| match action.payload_as::<i64>() {
            Some(amount) => Ok(n + amount),
            None => Err("missing payload"),
        })
        .add_reducer("RESET", |_, _| 0);
    let audit = Store::with_hub(&hub, ["audit"], 0i64)
        .unwrap()
        .add_reducer("ADD", |count, _| count + 1);

    hub.actions().dispatch(Action::with_payload("ADD", 2)).unwrap();
    let before = hub.snapshots().current();
    hub.actions().dispatch(Action::new("ADD")).unwrap();

    assert_eq!(store.value(), 2);
    assert_eq!(audit.value(), 2);
    assert_eq!(before["n"], hub.snapshots().current()["n"]);

    hub.actions().dispatch(Action::new("RESET")).unwrap();
    assert_eq!(store.value(), 0);
}

#[test]
fn reducers_stop_when_last_handle_is_dropped() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 0i64)
        .unwrap()
        .add_reducer("ADD", |n, _| n + 1);
    let clone = store.clone();
    drop(store);

    hub.actions().dispatch(Action::new("ADD")).unwrap();
    assert_eq!(clone.value(), 1);
    assert_eq!(hub.actions().handler_count("ADD"), 1);

    drop(clone);
    assert_eq!(hub.actions().handler_count("ADD"), 0);
}

/// Test that a store dropped right after registration leaves no reducer.
#[test]
fn discarded_store_keeps_no_reducer() {
    let hub = StateHub::new();
    drop(
        Store::with_hub(&hub, ["n"], 0i64)
            .unwrap()
            .add_reducer("ADD", |n, _| n + 1),
    );

    hub.actions().dispatch(Action::new("ADD")).unwrap();
    assert_eq!(hub.actions().handler_count("ADD"), 0);
    assert_eq!(Store::with_hub(&hub, ["n"], 0i64).unwrap().value(), 0);
}

#[tokio::test]
async fn async_reducer_commits_when_resolved() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 1i64)
        .unwrap()
        .add_async_reducer("DOUBLE", |n, _| async move { Ok::<_, String>(n * 2) });

    hub.actions().dispatch(Action::new("DOUBLE")).unwrap();
    settle().await;

    assert_eq!(store.value(), 2);
}

#[tokio::test]
async fn async_reducer_error_is_not_committed() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 1i64)
        .unwrap()
        .add_async_reducer("FAIL", |_, _| async { Err::<i64, _>("upstream down") })
        .add_reducer("INC", |n, _| n + 1);

    hub.actions().dispatch(Action::new("FAIL")).unwrap();
    settle().await;
    hub.actions().dispatch(Action::new("INC")).unwrap();

    assert_eq!(store.value(), 2);
}

#[tokio::test(start_paused = true)]
async fn overlapping_async_reducers_resolve_last_writer_wins() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 0i64)
        .unwrap()
        .add_async_reducer("SLOW", |_, _| async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, String>(1)
        })
        .add_async_reducer("FAST", |_, _| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, String>(2)
        });

    hub.actions().dispatch(Action::new("SLOW")).unwrap();
    hub.actions().dispatch(Action::new("FAST")).unwrap();

    common::sleep_ms(20).await;
    assert_eq!(store.value(), 2);

    common::sleep_ms(100).await;
    assert_eq!(store.value(), 1);
}

#[test]
fn async_reducer_without_runtime_is_dropped() {
    let hub = StateHub::new();
    let store = Store::with_hub(&hub, ["n"], 1i64)
        .unwrap()
        .add_async_reducer("DOUBLE", |n, _| async move { Ok::<_, String>(n * 2) });

    hub.actions().dispatch(Action::new("DOUBLE")).unwrap();
    assert_eq!(store.value(), 1);
}
