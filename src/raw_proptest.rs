#![cfg(test)]

// Property tests for HashMap kept inside the crate so they can check the
// chain structure of the underlying table after every step.

use crate::{DefaultHashBuilder, HashMap, MapConfig};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, HashMap as StdHashMap};
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

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    RemoveMapping(usize, i32),
    Get(usize),
    Contains(String),
    ContainsValue(i32),
    Mutate(usize, i32),
    PutAll(Vec<(usize, i32)>),
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
        let small = -4i32..4;
        let op = prop_oneof![
            4 => (idx.clone(), small.clone()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => (idx.clone(), small.clone()).prop_map(|(i, v)| OpI::RemoveMapping(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => small.clone().prop_map(OpI::ContainsValue),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => proptest::collection::vec((idx.clone(), small.clone()), 0..12).prop_map(OpI::PutAll),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run<S: BuildHasher>(
    mut sut: HashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: StdHashMap<Key, i32> = StdHashMap::new();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.remove(k.0.as_str()), model.remove(&k));
            }
            OpI::RemoveMapping(i, v) => {
                let k = key_from(pool, i);
                let expected = (model.get(&k) == Some(&v)).then(|| (k.clone(), v));
                if expected.is_some() {
                    model.remove(&k);
                }
                prop_assert_eq!(sut.remove_mapping(&k, &v), expected);
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.get_key_value(&k), model.get_key_value(&k));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|m| *m == v));
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m),
                }
            }
            OpI::PutAll(pairs) => {
                let pairs: Vec<(Key, i32)> =
                    pairs.into_iter().map(|(i, v)| (key_from(pool, i), v)).collect();
                model.extend(pairs.iter().cloned());
                sut.put_all(pairs);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
            OpI::Iterate => {
                let s: BTreeMap<_, _> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeMap<_, _> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
                prop_assert_eq!(sut.iter().count(), sut.len());
            }
        }

        // Post-conditions after each op
        // 1) Every entry is reachable from the bucket its hash selects
        sut.raw().assert_chains_consistent();
        // 2) Capacity stays a power of two once allocated
        let cap = sut.capacity();
        prop_assert!(cap == 0 || cap.is_power_of_two());
        // 3) Size parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert/remove/get return exactly what the model returns.
// - remove_mapping only removes when the value matches.
// - put_all pre-sizing never loses or duplicates a key.
// - iter yields each live entry exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(HashMap::with_hasher(DefaultHashBuilder::default()), &pool, ops)?;
    }

    // Tiny initial table and low load factor so nearly every scenario resizes.
    #[test]
    fn prop_state_machine_small_table((pool, ops) in arb_scenario()) {
        let config = MapConfig::new().initial_capacity(1).load_factor(0.5);
        let sut = HashMap::with_config_and_hasher(config, std::collections::hash_map::RandomState::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        run(sut, &pool, ops)?;
    }

    // Seed switches on at 4 buckets, so resizes recompute stored hashes.
    #[test]
    fn prop_state_machine_seeded((pool, ops) in arb_scenario()) {
        let config = MapConfig::new().initial_capacity(2).alt_hashing_threshold(4);
        let sut = HashMap::with_config_and_hasher(config, std::collections::hash_map::RandomState::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        run(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
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

// Property: Same state-machine invariants as above, under worst-case
// collision behavior (constant hasher). Every key shares bucket 0, so every
// operation walks one long chain and every insert past the threshold
// doubles the table.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run(HashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
