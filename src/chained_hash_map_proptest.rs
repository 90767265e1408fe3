#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket-level invariants that the public API does not expose.

use crate::chained_hash_map::ChainedHashMap;
use crate::config::MapConfig;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    Remove(usize),
    Contains(String),
    Mutate(usize, i32),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_config() -> impl Strategy<Value = MapConfig> {
    // Integral load factors keep `len / bucket_count <= max_load_factor`
    // exact after every insert.
    (1usize..=16, 1u32..=4).prop_map(|(n, lf)| MapConfig::new(n, f64::from(lf)))
}

// Collision variant: a constant hasher puts every key in one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Structural invariants checked after every op:
// - every entry sits in the bucket its cached hash reduces to;
// - the per-bucket entry total equals `len`;
// - no key appears twice;
// - the load-factor bound holds.
fn check_structure<S: BuildHasher>(sut: &ChainedHashMap<Key, i32, S>) -> Result<(), TestCaseError> {
    let n = sut.bucket_count();
    prop_assert!(n >= 1);
    let mut total = 0usize;
    let mut keys = BTreeSet::new();
    for (i, bucket) in sut.buckets_for_test().iter().enumerate() {
        for e in bucket.iter() {
            prop_assert_eq!((e.hash % n as u64) as usize, i, "entry in wrong bucket");
            prop_assert!(keys.insert(e.key.clone()), "duplicate key {:?}", e.key);
            total += 1;
        }
    }
    prop_assert_eq!(total, sut.len());
    prop_assert!(sut.load_factor() <= sut.max_load_factor());
    Ok(())
}

fn run_state_machine<S: BuildHasher>(
    mut sut: ChainedHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut last_bucket_count = sut.bucket_count();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = key_from(&pool, i);
                let before = sut.bucket_count();
                let at_threshold = sut.load_factor() >= sut.max_load_factor();
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
                // Doubling happens exactly when the pre-insert load reached the threshold.
                let expected = if at_threshold { before * 2 } else { before };
                prop_assert_eq!(sut.bucket_count(), expected);
            }
            OpI::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                let before = sut.len();
                let removed = sut.remove(&k);
                prop_assert_eq!(removed, model.remove(&k).is_some());
                if removed {
                    prop_assert_eq!(sut.len(), before - 1);
                }
                prop_assert!(sut.get(&k).is_none());
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "get_mut parity: {:?} vs {:?}", s, m),
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
            OpI::Iterate => {
                let s_pairs: BTreeSet<_> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m_pairs: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s_pairs, m_pairs);
            }
        }

        // Grow-only: the bucket count never decreases.
        prop_assert!(sut.bucket_count() >= last_bucket_count);
        last_bucket_count = sut.bucket_count();

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut)?;
    }

    // No ghost entries once everything is removed.
    let keys: Vec<Key> = model.keys().cloned().collect();
    for k in &keys {
        prop_assert!(sut.remove(k));
    }
    prop_assert_eq!(sut.len(), 0);
    for s in &pool {
        prop_assert!(sut.get(s.as_str()).is_none());
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap,
// plus the structural and growth invariants above, for random configs.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), cfg in arb_config()) {
        let sut: ChainedHashMap<Key, i32> = ChainedHashMap::with_config(cfg).unwrap();
        run_state_machine(sut, pool, ops)?;
    }

    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), cfg in arb_config()) {
        let sut: ChainedHashMap<Key, i32, ConstBuildHasher> =
            ChainedHashMap::with_config_and_hasher(cfg, ConstBuildHasher).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}

// Property: from the default configuration, inserting `n` distinct keys
// leaves exactly the bucket count predicted by the doubling rule, and every
// key is retrievable.
proptest! {
    #[test]
    fn prop_growth_matches_doubling_rule(n in 0usize..400) {
        let mut sut: ChainedHashMap<usize, usize> = ChainedHashMap::new();
        let mut expected = 10usize;
        for k in 0..n {
            if k >= expected {
                expected *= 2;
            }
            sut.insert(k, k);
            prop_assert_eq!(sut.bucket_count(), expected);
        }
        for k in 0..n {
            prop_assert_eq!(sut.get(&k), Some(&k));
        }
    }
}
