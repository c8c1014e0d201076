//! Recency index eviction and fail-open tests.

use super::*;
use crate::test_support::{FaultyStore, Op};
use crate::MemoryStore;

fn index_over(store: Arc<dyn KvStore>, capacity: usize) -> RecencyIndex {
    RecencyIndex::new(store, capacity)
}

async fn seed_pastes(store: &dyn KvStore, ids: &[&str]) {
    for id in ids {
        store.put(id, &format!("content of {}", id)).await.expect("seed");
    }
}

#[test]
fn parse_treats_absent_and_malformed_records_as_empty() {
    assert_eq!(ParsedIndex::parse(None), ParsedIndex::Empty);
    assert_eq!(ParsedIndex::parse(Some("not json")), ParsedIndex::Empty);
    assert_eq!(ParsedIndex::parse(Some("{\"a\":1}")), ParsedIndex::Empty);
    assert_eq!(ParsedIndex::parse(Some("[1, 2]")), ParsedIndex::Empty);
    assert_eq!(ParsedIndex::parse(Some("null")), ParsedIndex::Empty);
    assert_eq!(
        ParsedIndex::parse(Some("[\"b\",\"a\"]")),
        ParsedIndex::Valid(vec!["b".to_string(), "a".to_string()])
    );
    assert_eq!(ParsedIndex::parse(Some("[]")), ParsedIndex::Valid(Vec::new()));
}

#[tokio::test]
async fn capacity_three_keeps_newest_three_and_deletes_oldest() {
    let store = Arc::new(MemoryStore::default());
    let index = index_over(store.clone(), 3);
    seed_pastes(&*store, &["A", "B", "C", "D"]).await;

    for id in ["A", "B", "C"] {
        let outcome = index.record_creation(id).await.expect("record");
        assert!(outcome.evicted.is_empty());
    }
    let outcome = index.record_creation("D").await.expect("record D");

    assert_eq!(outcome.evicted, vec!["A".to_string()]);
    assert!(outcome.failed_deletions.is_empty());
    assert_eq!(outcome.len, 3);
    assert_eq!(index.entries().await, vec!["D", "C", "B"]);
    assert_eq!(store.get("A").await.expect("get A"), None);
    for id in ["B", "C", "D"] {
        assert_eq!(
            store.get(id).await.expect("get").as_deref(),
            Some(format!("content of {}", id).as_str())
        );
    }
}

#[tokio::test]
async fn filling_to_capacity_evicts_nothing_and_next_evicts_one() {
    let store = Arc::new(MemoryStore::default());
    let capacity = 5;
    let index = index_over(store.clone(), capacity);
    let ids: Vec<String> = (0..=capacity).map(|n| format!("id{}", n)).collect();

    for id in &ids[..capacity] {
        let outcome = index.record_creation(id).await.expect("record");
        assert!(outcome.evicted.is_empty(), "no eviction at or below capacity");
    }
    let expected: Vec<String> = ids[..capacity].iter().rev().cloned().collect();
    assert_eq!(index.entries().await, expected);

    let outcome = index
        .record_creation(&ids[capacity])
        .await
        .expect("record overflow");
    assert_eq!(outcome.evicted, vec![ids[0].clone()]);
    assert_eq!(index.entries().await.len(), capacity);
}

#[tokio::test]
async fn many_creations_keep_only_the_newest_capacity_ids() {
    let store = Arc::new(MemoryStore::default());
    let capacity = 4;
    let index = index_over(store.clone(), capacity);
    let ids: Vec<String> = (0..11).map(|n| format!("p{:02}", n)).collect();

    for id in &ids {
        store.put(id, id).await.expect("put");
        index.record_creation(id).await.expect("record");
    }

    let expected: Vec<String> = ids.iter().rev().take(capacity).cloned().collect();
    assert_eq!(index.entries().await, expected);
    for evicted in &ids[..ids.len() - capacity] {
        assert_eq!(store.get(evicted).await.expect("get"), None);
    }
    // Survivors plus the index record itself.
    assert_eq!(store.len(), capacity + 1);
}

#[tokio::test]
async fn first_creation_over_malformed_record_starts_fresh() {
    let store = Arc::new(MemoryStore::default());
    store.put(INDEX_KEY, "{broken").await.expect("seed corrupt index");
    let index = index_over(store.clone(), 3);

    index.record_creation("id1").await.expect("record");
    assert_eq!(index.entries().await, vec!["id1"]);
    assert_eq!(
        store.get(INDEX_KEY).await.expect("get").as_deref(),
        Some("[\"id1\"]")
    );
}

#[tokio::test]
async fn absent_record_on_first_creation_yields_single_entry() {
    let store = Arc::new(MemoryStore::default());
    let index = index_over(store, 3);
    assert_eq!(index.load().await, ParsedIndex::Empty);

    index.record_creation("id1").await.expect("record");
    assert_eq!(index.load().await, ParsedIndex::Valid(vec!["id1".to_string()]));
}

#[tokio::test]
async fn load_failure_fails_open_to_empty_index() {
    let store = Arc::new(FaultyStore::default());
    store.inner.put(INDEX_KEY, "[\"old\"]").await.expect("seed");
    store.fail(Op::Get, INDEX_KEY);
    let index = index_over(store.clone(), 3);

    assert_eq!(index.load().await, ParsedIndex::Empty);
    let outcome = index.record_creation("new").await.expect("record");
    assert_eq!(outcome.len, 1);

    store.heal();
    assert_eq!(index.entries().await, vec!["new"]);
}

#[tokio::test]
async fn failed_eviction_delete_still_trims_index() {
    let store = Arc::new(FaultyStore::default());
    let index = index_over(store.clone(), 2);
    seed_pastes(&*store, &["a", "b", "c"]).await;
    store.fail(Op::Delete, "a");

    for id in ["a", "b", "c"] {
        index.record_creation(id).await.expect("record");
    }

    assert_eq!(index.entries().await, vec!["c", "b"]);
    // The store and index drift: "a" is no longer indexed but still stored.
    assert_eq!(
        store.get("a").await.expect("get").as_deref(),
        Some("content of a")
    );
}

#[tokio::test]
async fn failed_eviction_delete_is_reported_in_outcome() {
    let store = Arc::new(FaultyStore::default());
    let index = index_over(store.clone(), 1);
    store.fail(Op::Delete, "old");

    index.record_creation("old").await.expect("record old");
    let outcome = index.record_creation("new").await.expect("record new");
    assert_eq!(outcome.evicted, vec!["old".to_string()]);
    assert_eq!(outcome.failed_deletions, vec!["old".to_string()]);
    assert_eq!(outcome.len, 1);
}

#[tokio::test]
async fn persist_failure_is_returned_to_caller() {
    let store = Arc::new(FaultyStore::default());
    let index = index_over(store.clone(), 3);
    store.fail(Op::Put, INDEX_KEY);

    let err = index
        .record_creation("id1")
        .await
        .expect_err("persist failure should surface");
    assert!(err.to_string().contains("injected"));

    store.heal();
    assert_eq!(index.load().await, ParsedIndex::Empty);
}

#[tokio::test]
async fn duplicate_ids_are_kept_and_evict_sooner() {
    let store = Arc::new(MemoryStore::default());
    let index = index_over(store, 3);

    for id in ["x", "y", "x"] {
        index.record_creation(id).await.expect("record");
    }
    assert_eq!(index.entries().await, vec!["x", "y", "x"]);

    let outcome = index.record_creation("z").await.expect("record z");
    assert_eq!(outcome.evicted, vec!["x".to_string()]);
    assert_eq!(index.entries().await, vec!["z", "x", "y"]);
}

#[tokio::test]
async fn stale_concurrent_write_wins_over_newer_index() {
    let store = Arc::new(MemoryStore::default());
    let index = index_over(store.clone(), 3);
    index.record_creation("a").await.expect("record a");

    // A slow writer loaded the index before "b" was recorded.
    let stale = index.entries().await;
    index.record_creation("b").await.expect("record b");
    let mut stale_update = vec!["c".to_string()];
    stale_update.extend(stale);
    store
        .put(INDEX_KEY, &serde_json::to_string(&stale_update).expect("encode"))
        .await
        .expect("stale persist");

    assert_eq!(index.entries().await, vec!["c", "a"]);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let index = index_over(Arc::new(MemoryStore::default()), 0);
    assert_eq!(index.capacity(), 1);
}
