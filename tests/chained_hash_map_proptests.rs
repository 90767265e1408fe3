// ChainedHashMap property tests through the public API.
//
// Property 1: put/get round trip and load-factor bound.
//  - Model: std HashMap receiving the same puts.
//  - Invariant after each put: len() == model.len(), every model key reads
//    back its model value, and load_factor() <= max_load_factor().
//
// Property 2: deletion completeness.
//  - After remove(k) returns true: get(k) == None and len() dropped by one.
//  - remove(k) returns false exactly when the model lacks k.
//
// Property 3: update idempotence.
//  - put(k, v) twice in a row leaves len() unchanged after the second call.
use chained_hashmap::{ChainedHashMap, MapConfig};
use proptest::prelude::*;
use std::collections::HashMap;

proptest! {
    #[test]
    fn prop_round_trip_and_load_bound(
        buckets in 1usize..=32,
        lf in 1u32..=3,
        puts in proptest::collection::vec((0u16..300, any::<i64>()), 0..400),
    ) {
        let cfg = MapConfig::new(buckets, f64::from(lf));
        let mut m: ChainedHashMap<u16, i64> = ChainedHashMap::with_config(cfg).unwrap();
        let mut model: HashMap<u16, i64> = HashMap::new();

        for (k, v) in puts {
            prop_assert_eq!(m.put(k, v), model.insert(k, v));
            prop_assert_eq!(m.len(), model.len());
            prop_assert!(
                m.load_factor() <= m.max_load_factor(),
                "load {} > {}", m.load_factor(), m.max_load_factor()
            );
        }
        for (k, v) in &model {
            prop_assert_eq!(m.get(k), Some(v));
        }
    }
}

proptest! {
    #[test]
    fn prop_deletion_completeness(
        keys in proptest::collection::vec("[a-f]{1,3}", 0..80),
        removals in proptest::collection::vec("[a-f]{1,3}", 0..80),
    ) {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::new();
        let mut model: HashMap<String, usize> = HashMap::new();
        for (i, k) in keys.into_iter().enumerate() {
            m.put(k.clone(), i);
            model.insert(k, i);
        }
        for k in removals {
            let before = m.len();
            let removed = m.remove(k.as_str());
            prop_assert_eq!(removed, model.remove(&k).is_some());
            if removed {
                prop_assert_eq!(m.len(), before - 1);
            } else {
                prop_assert_eq!(m.len(), before);
            }
            prop_assert_eq!(m.get(k.as_str()), None);
        }
        prop_assert_eq!(m.len(), model.len());
    }
}

proptest! {
    #[test]
    fn prop_update_idempotence(
        seed in proptest::collection::vec((any::<u8>(), any::<u32>()), 0..60),
        k in any::<u8>(),
        v in any::<u32>(),
    ) {
        let mut m: ChainedHashMap<u8, u32> = seed.into_iter().collect();
        m.put(k, v);
        let len = m.len();
        prop_assert_eq!(m.put(k, v), Some(v));
        prop_assert_eq!(m.len(), len);
        prop_assert_eq!(m.get(&k), Some(&v));
    }
}
