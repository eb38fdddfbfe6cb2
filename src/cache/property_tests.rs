//! Property-Based Tests for the cache and ring
//!
//! Uses proptest to check the store's byte bound and recency order, the
//! ring's stability under membership change and ByteView copy isolation.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{ByteView, LruStore};
use crate::cluster::{HashRing, DEFAULT_REPLICAS};

// == Strategies ==
/// Generates small keys so sequences revisit the same keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,24}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum StoreOp {
    Add { key: String, value: String },
    Get { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| StoreOp::Add { key, value }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
    ]
}

/// Reference model: keys ordered least to most recently used.
#[derive(Default)]
struct Model {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl Model {
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push(key.to_string());
    }

    fn bytes(&self) -> u64 {
        self.values
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // The byte count always equals the live entries' sizes and never
    // exceeds the budget; evictions always take the least recently used key.
    #[test]
    fn prop_lru_matches_model(
        max_bytes in 1u64..64,
        ops in prop::collection::vec(store_op_strategy(), 1..80)
    ) {
        let mut store: LruStore<String> = LruStore::new(max_bytes, None);
        let mut model = Model::default();

        for op in ops {
            match op {
                StoreOp::Add { key, value } => {
                    store.add(key.clone(), value.clone());
                    model.values.insert(key.clone(), value);
                    model.touch(&key);
                    while model.bytes() > max_bytes {
                        let oldest = model.order.remove(0);
                        model.values.remove(&oldest);
                    }
                }
                StoreOp::Get { key } => {
                    let got = store.get(&key).cloned();
                    prop_assert_eq!(got.as_ref(), model.values.get(&key));
                    if got.is_some() {
                        model.touch(&key);
                    }
                }
            }

            prop_assert!(store.bytes() <= max_bytes, "budget exceeded");
            prop_assert_eq!(store.bytes(), model.bytes());
            prop_assert_eq!(store.len(), model.values.len());
            prop_assert_eq!(store.oldest_key(), model.order.first().map(String::as_str));
        }
    }

    // Overwriting a key never changes the entry count.
    #[test]
    fn prop_overwrite_keeps_count(
        key in key_strategy(),
        v1 in value_strategy(),
        v2 in value_strategy()
    ) {
        let mut store: LruStore<String> = LruStore::new(0, None);
        store.add(key.clone(), v1);
        store.add(key.clone(), v2.clone());

        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(store.get(&key), Some(&v2));
        prop_assert_eq!(store.bytes(), (key.len() + v2.len()) as u64);
    }

    // Adding a node only moves keys onto the new node, and moves roughly
    // 1/N of them.
    #[test]
    fn prop_ring_add_remaps_minimally(node_count in 2usize..6) {
        let nodes: Vec<String> = (0..node_count)
            .map(|i| format!("http://10.0.0.{}:8001", i))
            .collect();
        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        ring.add(&nodes);

        let keys: Vec<String> = (0..2000).map(|i| format!("key-{}", i)).collect();
        let before: Vec<String> = keys
            .iter()
            .map(|k| ring.get(k).unwrap().to_string())
            .collect();

        let newcomer = "http://10.0.0.99:8001";
        ring.add([newcomer]);

        let mut moved = 0;
        for (key, old_owner) in keys.iter().zip(&before) {
            let new_owner = ring.get(key).unwrap();
            if new_owner != old_owner.as_str() {
                prop_assert_eq!(new_owner, newcomer);
                moved += 1;
            }
        }

        // Expected share is 1/(N+1); allow generous slack for hash skew
        let expected = keys.len() / (node_count + 1);
        prop_assert!(moved > 0);
        prop_assert!(moved < expected * 3, "moved {} of {}", moved, keys.len());
    }

    // Lookups are deterministic for a fixed node set.
    #[test]
    fn prop_ring_deterministic(key in "[a-zA-Z0-9]{1,32}") {
        let mut a = HashRing::new(DEFAULT_REPLICAS);
        let mut b = HashRing::new(DEFAULT_REPLICAS);
        a.add(["n1", "n2", "n3"]);
        b.add(["n3", "n1", "n2"]);

        prop_assert_eq!(a.get(&key), b.get(&key));
    }

    // Mutating a copy never shows through later reads.
    #[test]
    fn prop_byteview_copies_are_isolated(bytes in prop::collection::vec(any::<u8>(), 1..128)) {
        let view = ByteView::copy_from_slice(&bytes);

        let mut copy = view.byte_slice();
        prop_assert_eq!(&copy, &bytes);
        for b in copy.iter_mut() {
            *b = b.wrapping_add(1);
        }

        prop_assert_eq!(view.byte_slice(), bytes);
        prop_assert_eq!(view.len(), copy.len());
    }
}
