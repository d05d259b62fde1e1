//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's capacity, recency and expiration
//! behavior against a simple reference model.

use proptest::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::adapter::{CacheAdapter, MemoryAdapter};
use crate::cache::{LruStore, ManualClock};
use crate::config::MemoryOptions;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;

// == Strategies ==
/// Generates cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates serialized cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// Generates arbitrary JSON documents, nested up to a few levels
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9f64).prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,32}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Has { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // Small key space so operations collide
    let key = "[a-e]";
    prop_oneof![
        (key, valid_value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key.prop_map(|key| CacheOp::Get { key }),
        key.prop_map(|key| CacheOp::Has { key }),
        key.prop_map(|key| CacheOp::Delete { key }),
    ]
}

/// Reference LRU: keys ordered oldest first.
#[derive(Default)]
struct Model {
    order: Vec<(String, String)>,
}

impl Model {
    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _)| k == key)
    }

    fn set(&mut self, key: String, value: String, capacity: usize) {
        if let Some(pos) = self.position(&key) {
            self.order.remove(pos);
        } else if self.order.len() >= capacity {
            self.order.remove(0);
        }
        self.order.push((key, value));
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let pos = self.position(key)?;
        let entry = self.order.remove(pos);
        let value = entry.1.clone();
        self.order.push(entry);
        Some(value)
    }

    fn has(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn delete(&mut self, key: &str) {
        if let Some(pos) = self.position(key) {
            self.order.remove(pos);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Any interleaving of operations behaves like the reference LRU model,
    // and the size never exceeds capacity.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let mut store = LruStore::new(capacity, 0).unwrap();
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), None);
                    model.set(key, value, capacity);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key));
                }
                CacheOp::Has { key } => {
                    prop_assert_eq!(store.has(&key), model.has(&key));
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.delete(&key);
                }
            }
            prop_assert!(store.len() <= capacity);
            prop_assert_eq!(store.len(), model.order.len());
        }

        let expected: Vec<String> = model.order.iter().rev().map(|(k, _)| k.clone()).collect();
        prop_assert_eq!(store.keys(), expected);
    }

    // Hit and miss counters reflect every get.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = LruStore::new(TEST_MAX_ENTRIES, 0).unwrap();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value, None),
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Has { key } => {
                    store.has(&key);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, store.len(), "Size mismatch");
    }

    // Storing then reading a value returns it unchanged.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = LruStore::new(TEST_MAX_ENTRIES, 0).unwrap();

        store.set(key.clone(), value.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value));
    }

    // Any JSON document survives a trip through the memory adapter.
    #[test]
    fn prop_adapter_json_roundtrip(key in valid_key_strategy(), value in json_value_strategy()) {
        let cache = MemoryAdapter::<Value>::new(&MemoryOptions::default()).unwrap();

        let fetched = tokio_test::block_on(async {
            cache.set(&key, &value, None).await.unwrap();
            cache.get(&key).await.unwrap()
        });

        prop_assert_eq!(fetched, Some(value));
    }

    // After a delete, the key is gone for both get and has.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = LruStore::new(TEST_MAX_ENTRIES, 0).unwrap();

        store.set(key.clone(), value, None);
        prop_assert!(store.has(&key));

        prop_assert!(store.delete(&key));
        prop_assert!(!store.has(&key));
        prop_assert!(store.get(&key).is_none());
        prop_assert!(!store.delete(&key), "second delete is a no-op");
    }

    // Storing V1 then V2 under one key reads back V2.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut store = LruStore::new(TEST_MAX_ENTRIES, 0).unwrap();

        store.set(key.clone(), value1, None);
        store.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.len(), 1);
    }

    // Filling a store of capacity c with c + 1 distinct keys evicts exactly
    // the first one.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 1..10),
        new_key in valid_key_strategy(),
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .filter(|key| seen.insert(key.clone()))
            .collect();
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = LruStore::new(capacity, 0).unwrap();
        for key in &unique_keys {
            store.set(key.clone(), format!("value_{}", key), None);
        }

        store.set(new_key.clone(), "new".to_string(), None);

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.has(&unique_keys[0]), "oldest key should be evicted");
        prop_assert!(store.has(&new_key));
        for key in unique_keys.iter().skip(1) {
            prop_assert!(store.has(key), "key '{}' should survive", key);
        }
    }

    // A get moves a key out of the eviction slot; a has does not.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy(),
        touch_with_get in any::<bool>(),
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = keys
            .into_iter()
            .filter(|key| seen.insert(key.clone()))
            .collect();
        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let mut store = LruStore::new(unique_keys.len(), 0).unwrap();
        for key in &unique_keys {
            store.set(key.clone(), format!("value_{}", key), None);
        }

        let oldest = &unique_keys[0];
        if touch_with_get {
            store.get(oldest);
        } else {
            store.has(oldest);
        }
        store.set(new_key, "new".to_string(), None);

        if touch_with_get {
            prop_assert!(store.has(oldest));
            prop_assert!(!store.has(&unique_keys[1]));
        } else {
            prop_assert!(!store.has(oldest));
            prop_assert!(store.has(&unique_keys[1]));
        }
    }

    // An entry with TTL t is readable before t elapses and gone after.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl in 1u64..3600,
        before_ms in 0u64..1000,
        after_ms in 0u64..5000,
    ) {
        let clock = Arc::new(ManualClock::new(0));
        let mut store = LruStore::with_clock(TEST_MAX_ENTRIES, 0, clock.clone()).unwrap();
        store.set(key.clone(), value.clone(), Some(ttl));

        let ttl_ms = ttl * 1000;
        clock.set(before_ms.min(ttl_ms - 1));
        prop_assert_eq!(store.get(&key), Some(value));

        clock.set(ttl_ms + after_ms);
        prop_assert!(store.get(&key).is_none());
        prop_assert!(!store.has(&key));
    }
}

#[test]
fn test_expired_entry_still_counts_toward_size_until_observed() {
    let clock = Arc::new(ManualClock::new(0));
    let mut store = LruStore::with_clock(2, 0, clock.clone()).unwrap();

    store.set("short".to_string(), "1".to_string(), Some(1));
    store.set("long".to_string(), "2".to_string(), None);
    clock.advance(Duration::from_secs(2));

    // The expired entry is the LRU one, so it is the eviction victim
    store.set("new".to_string(), "3".to_string(), None);
    assert_eq!(store.keys(), vec!["new", "long"]);
}
