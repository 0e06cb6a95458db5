//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store and engine against arbitrary operation
//! sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{Cache, CacheStore};
use crate::config::CacheConfig;
use crate::error::CacheError;

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;

// == Strategies ==
/// Generates keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = u32> {
    any::<u32>()
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
    Flush,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Flush),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Counters match the outcome of every lookup, and flush never
    /// changes them.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store: CacheStore<String, u32> = CacheStore::new(TEST_MAX_SIZE);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let _ = store.set(key, value, Duration::ZERO);
                }
                CacheOp::Get { key } => {
                    match store.get(&key) {
                        Ok(_) => expected_hits += 1,
                        Err(_) => expected_misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
                CacheOp::Flush => store.flush(),
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    /// The store behaves like a plain map when nothing expires.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store: CacheStore<String, u32> = CacheStore::new(0);
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    prop_assert!(store.set(key.clone(), value, Duration::ZERO).is_ok());
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let expected = model.get(&key).copied().ok_or(CacheError::NotFound);
                    prop_assert_eq!(store.get(&key), expected);
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.remove(&key).is_some());
                }
                CacheOp::Flush => {
                    store.flush();
                    model.clear();
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
    }

    /// Storing then retrieving before expiry returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store: CacheStore<String, u32> = CacheStore::new(TEST_MAX_SIZE);

        store.set(key.clone(), value, Duration::from_secs(300)).unwrap();

        prop_assert_eq!(store.get(&key), Ok(value));
    }

    /// Overwriting a key keeps one entry holding the newer value.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store: CacheStore<String, u32> = CacheStore::new(TEST_MAX_SIZE);

        store.set(key.clone(), value1, Duration::ZERO).unwrap();
        store.set(key.clone(), value2, Duration::ZERO).unwrap();

        prop_assert_eq!(store.get(&key), Ok(value2));
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    /// The number of entries never exceeds `max_size`, new keys are
    /// rejected only when full, and overwrites are never rejected.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200),
        max_size in 1usize..20
    ) {
        let mut store: CacheStore<String, u32> = CacheStore::new(max_size);

        for (key, value) in entries {
            let existed = store.ttl(&key).is_ok();
            let len_before = store.len();

            match store.set(key, value, Duration::ZERO) {
                Ok(()) => {}
                Err(CacheError::CacheFull(limit)) => {
                    prop_assert_eq!(limit, max_size);
                    prop_assert!(!existed, "Overwrite must not be rejected");
                    prop_assert_eq!(len_before, max_size);
                }
                Err(other) => prop_assert!(false, "Unexpected error {:?}", other),
            }

            prop_assert!(
                store.len() <= max_size,
                "Cache size {} exceeds max {}",
                store.len(),
                max_size
            );
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    /// After the TTL elapses the first lookup reports `Expired`, later ones
    /// `NotFound`.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let mut store: CacheStore<String, u32> = CacheStore::new(TEST_MAX_SIZE);

        store.set(key.clone(), value, Duration::from_millis(10)).unwrap();
        prop_assert_eq!(store.get(&key), Ok(value));

        std::thread::sleep(Duration::from_millis(20));

        prop_assert_eq!(store.get(&key), Err(CacheError::Expired));
        prop_assert_eq!(store.get(&key), Err(CacheError::NotFound));
    }
}

// == Property Test for Concurrent Operation Correctness ==

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Concurrent writers on disjoint key ranges leave the last write of each
    /// key in place while readers poll.
    #[test]
    fn prop_concurrent_last_write_wins(
        writes in prop::collection::vec(
            prop::collection::vec((0u8..8, value_strategy(), any::<bool>()), 1..30),
            1..6
        )
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let config = CacheConfig::new(Duration::from_millis(5), 0);
            let cache = std::sync::Arc::new(Cache::<String, u32>::new(config).unwrap());

            // Expected final state per writer: last write wins, delete clears
            let mut expected: HashMap<String, u32> = HashMap::new();
            for (writer, ops) in writes.iter().enumerate() {
                for (slot, value, is_delete) in ops {
                    let key = format!("w{writer}-{slot}");
                    if *is_delete {
                        expected.remove(&key);
                    } else {
                        expected.insert(key, *value);
                    }
                }
            }

            let mut handles = Vec::new();
            for (writer, ops) in writes.into_iter().enumerate() {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    for (slot, value, is_delete) in ops {
                        let key = format!("w{writer}-{slot}");
                        if is_delete {
                            cache.delete(&key).await;
                        } else {
                            cache.set(key, value, Duration::ZERO).await.unwrap();
                        }
                    }
                }));
            }
            for reader in 0..2 {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    for i in 0..50 {
                        let _ = cache.get(&format!("w{}-{}", reader, i % 8)).await;
                        tokio::task::yield_now().await;
                    }
                }));
            }

            for handle in handles {
                handle.await.expect("Task should not panic");
            }

            prop_assert_eq!(cache.len().await, expected.len());
            for (key, value) in &expected {
                prop_assert_eq!(cache.get(key).await, Ok(*value));
            }

            cache.stop().await;
            Ok(())
        })?;
    }
}
