// HashMap integration suite.
//
// Each test documents what behavior is being verified. The core invariants
// exercised:
// - Size: len() equals the number of distinct keys currently mapped.
// - Lookup: get(k) after insert(k, v) returns v until k is next mutated.
// - Growth: every key stays reachable across every resize step.
// - Degenerate hashing: constant hash codes cost speed, never correctness.
// - Contract violation: keys whose Eq and Hash disagree produce duplicates,
//   not a crash.
use chain_hashmap::{ConfigError, HashMap, MapConfig, DEFAULT_INITIAL_CAPACITY};
use std::collections::BTreeSet;
use std::hash::{BuildHasherDefault, Hash, Hasher};

// Test: insert/replace/get/remove round trip.
// Verifies: replace returns the old value and keeps len; remove then get is absent.
#[test]
fn insert_get_replace_remove() {
    let mut m = HashMap::new();
    assert_eq!(m.insert("k1".to_string(), 1), None);
    assert_eq!(m.insert("k2".to_string(), 2), None);
    assert_eq!(m.insert("k1".to_string(), 10), Some(1));
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("k1"), Some(&10));

    assert_eq!(m.remove("k1"), Some(10));
    assert_eq!(m.get("k1"), None);
    assert_eq!(m.len(), 1);

    // Removing an absent key leaves len unchanged.
    assert_eq!(m.remove("k1"), None);
    assert_eq!(m.len(), 1);
}

// Test: resize correctness well past the default threshold.
// Verifies: all earlier keys are retrievable after each insert; capacity doubles.
#[test]
fn every_key_survives_each_resize() {
    let mut m = HashMap::new();
    let mut last_capacity = 0;
    let mut growths = 0;
    for i in 0..2_000u32 {
        m.insert(i, i.wrapping_mul(31));
        if m.capacity() != last_capacity {
            if last_capacity != 0 {
                assert_eq!(m.capacity(), last_capacity * 2);
                growths += 1;
            }
            last_capacity = m.capacity();
            for j in 0..=i {
                assert_eq!(m.get(&j), Some(&j.wrapping_mul(31)), "key {j} lost at {i}");
            }
        }
    }
    assert!(growths >= 6);
    assert_eq!(m.len(), 2_000);
}

// Test: lazy inflation and initial capacity rounding.
// Verifies: no buckets before the first insert; requests round up to a power of two.
#[test]
fn capacity_is_lazy_and_rounded() {
    let mut m = HashMap::with_capacity(100);
    assert_eq!(m.capacity(), 0);
    m.insert(1u8, ());
    assert_eq!(m.capacity(), 128);
    assert_eq!(m.threshold(), 96);

    let mut d = HashMap::new();
    d.insert(1u8, ());
    assert_eq!(d.capacity(), DEFAULT_INITIAL_CAPACITY);
}

// Test: construction rejects bad load factors.
// Verifies: zero, negative, NaN and infinite load factors fail synchronously.
#[test]
fn illegal_load_factor_is_rejected() {
    for lf in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let err = HashMap::<u32, u32>::with_capacity_and_load_factor(16, lf).unwrap_err();
        assert!(matches!(err, ConfigError::IllegalLoadFactor(_)));
    }
    let err = HashMap::<u32, u32>::with_config(MapConfig::new().maximum_capacity(3)).unwrap_err();
    assert_eq!(err, ConfigError::IllegalMaximumCapacity(3));
    assert!(HashMap::<u32, u32>::with_capacity_and_load_factor(16, 4.0).is_ok());
}

// Test: growth stops at the configured ceiling.
// Verifies: inserts keep succeeding, chains just get longer.
#[test]
fn saturated_table_keeps_accepting_inserts() {
    let mut m = HashMap::with_config(MapConfig::new().maximum_capacity(8)).unwrap();
    for i in 0..500u32 {
        m.insert(i, ());
    }
    assert_eq!(m.capacity(), 8);
    assert_eq!(m.threshold(), usize::MAX);
    assert!(m.chain_stats().longest_chain >= 500 / 8);
    assert!((0..500).all(|i| m.contains_key(&i)));
}

#[derive(Default)]
struct ConstHasher;
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        7
    }
}
type Const = BuildHasherDefault<ConstHasher>;

// Test: degenerate hashing.
// Assumes: every key reports the same hash code.
// Verifies: get/remove stay correct; all entries share one chain.
#[test]
fn constant_hash_is_slow_but_correct() {
    let mut m: HashMap<u32, u32, Const> = HashMap::with_hasher(Const::default());
    for i in 0..200 {
        m.insert(i, i + 1);
    }
    let stats = m.chain_stats();
    assert_eq!(stats.occupied, 1);
    assert_eq!(stats.longest_chain, 200);
    for i in (0..200).step_by(3) {
        assert_eq!(m.remove(&i), Some(i + 1));
    }
    for i in 0..200 {
        let expected = (i % 3 != 0).then_some(i + 1);
        assert_eq!(m.get(&i).copied(), expected);
    }
}

// A key that claims equality with everything but hashes by its payload.
#[derive(Debug, Clone)]
struct Liar(u32);
impl PartialEq for Liar {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}
impl Eq for Liar {}
impl Hash for Liar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

// Test: Eq/Hash contract violation.
// Verifies: "equal" keys in different buckets are stored twice; nothing panics.
#[test]
fn inconsistent_eq_and_hash_yields_duplicates() {
    let mut m = HashMap::new();
    for i in 0..64 {
        m.insert(Liar(i), i);
    }
    assert!(m.len() > 1, "equal keys in different chains are not merged");
    assert!(m.len() <= 64);
    assert_eq!(m.iter().count(), m.len());
}

// Test: an absent key is an ordinary key.
// Verifies: None is stored, found and removed like any other key, and stays
// reachable while the table doubles around it.
#[test]
fn none_is_a_first_class_key() {
    let mut m: HashMap<Option<&str>, u32> = HashMap::new();
    m.insert(None, 0);
    m.insert(Some("a"), 1);
    assert_eq!(m.get(&None), Some(&0));
    assert_eq!(m.insert(None, 5), Some(0));
    assert_eq!(m.remove(&None), Some(5));
    assert!(!m.contains_key(&None));
    assert_eq!(m.len(), 1);

    let mut grown: HashMap<Option<u32>, u32> = HashMap::with_capacity(1);
    grown.insert(None, u32::MAX);
    let mut last_capacity = grown.capacity();
    let mut resizes = 0;
    for i in 0..500 {
        grown.insert(Some(i), i);
        if grown.capacity() != last_capacity {
            resizes += 1;
            last_capacity = grown.capacity();
            assert_eq!(grown.get(&None), Some(&u32::MAX), "None lost at {i}");
        }
    }
    assert!(resizes >= 5);
    assert_eq!(grown.remove(&None), Some(u32::MAX));
    assert_eq!(grown.len(), 500);
}

// Test: value-level queries.
#[test]
fn contains_value_and_entry() {
    let mut m = HashMap::new();
    m.insert('a', 1);
    m.insert('b', 2);
    assert!(m.contains_value(&2));
    assert!(!m.contains_value(&3));
    assert!(m.contains_entry(&'a', &1));
    assert!(!m.contains_entry(&'a', &2));
    assert_eq!(m.remove_mapping(&'a', &2), None);
    assert_eq!(m.remove_mapping(&'a', &1), Some(('a', 1)));
    assert_eq!(m.remove_entry(&'b'), Some(('b', 2)));
    assert!(m.is_empty());
}

// Test: bulk insert pre-sizes once.
// Verifies: extend with a known-size source allocates enough buckets up front.
#[test]
fn extend_presizes_from_source() {
    let mut m = HashMap::new();
    m.extend((0..1000u32).map(|i| (i, i)));
    assert_eq!(m.len(), 1000);
    // 1000 / 0.75 + 1 = 1334 -> 2048.
    assert_eq!(m.capacity(), 2048);
}

// Test: clear keeps the allocation and empties every view.
#[test]
fn clear_keeps_capacity() {
    let mut m: HashMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    let cap = m.capacity();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.capacity(), cap);
    assert_eq!(m.iter().next(), None);
    assert_eq!(m.get(&1), None);
}

// Test: equality ignores iteration order.
#[test]
fn equality_is_by_mapping() {
    let a: HashMap<u32, u32> = (0..50).map(|i| (i, i)).collect();
    let mut b = HashMap::with_capacity(1);
    for i in (0..50).rev() {
        b.insert(i, i);
    }
    assert_eq!(a, b);
    b.insert(0, 99);
    assert_ne!(a, b);
}

// Test: borrowing and owning iteration cover the same pairs.
#[test]
fn views_agree() {
    let m: HashMap<String, usize> = ["x", "yy", "zzz"].iter().map(|s| (s.to_string(), s.len())).collect();
    let keys: BTreeSet<&str> = m.keys().map(String::as_str).collect();
    assert_eq!(keys, BTreeSet::from(["x", "yy", "zzz"]));
    let sum: usize = m.values().sum();
    assert_eq!(sum, 6);
    let owned: BTreeSet<(String, usize)> = m.clone().into_iter().collect();
    let borrowed: BTreeSet<(String, usize)> = (&m).into_iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(owned, borrowed);
    assert_eq!(format!("{:?}", HashMap::<u8, u8>::new()), "{}");
}

// Test: get_mut changes the stored value without a structural change.
#[test]
fn get_mut_updates_in_place() {
    let mut m = HashMap::new();
    m.insert(1, vec![1]);
    m.get_mut(&1).unwrap().push(2);
    assert_eq!(m.get(&1), Some(&vec![1, 2]));
    assert_eq!(m.get_key_value(&1), Some((&1, &vec![1, 2])));
    let mut c = m.cursor();
    *m.get_mut(&1).unwrap() = vec![];
    assert_eq!(c.next_key(&m), Ok(Some(&1)));
}
