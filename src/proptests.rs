use crate::{BucketId, Error, ExtendibleHashTable, TableConfig};

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Checks every structural invariant of the table, panicking on the first
/// violation.
pub(crate) fn validate_table(t: &ExtendibleHashTable) {
    let g = t.global_depth();
    assert!(g <= t.max_global_depth(), "global depth above limit");
    assert_eq!(
        t.directory_len(),
        1usize << g,
        "directory length must be 2^global_depth"
    );

    let mut slots_by_bucket: HashMap<BucketId, Vec<usize>> = HashMap::new();
    for slot in 0..t.directory_len() {
        slots_by_bucket.entry(t.bucket_id(slot)).or_default().push(slot);
    }
    assert_eq!(
        slots_by_bucket.len(),
        t.bucket_count(),
        "every bucket must be referenced by the directory"
    );

    let mut seen: HashSet<i64> = HashSet::new();
    for (id, slots) in &slots_by_bucket {
        let bucket = t.bucket(slots[0]);
        let d = bucket.local_depth();
        assert!(d <= g, "local depth {d} above global depth {g}");

        // Fan-out: exactly the slots sharing the low `d` bits.
        let low = (1usize << d) - 1;
        let base = slots[0] & low;
        assert_eq!(
            slots.len(),
            1usize << (g - d),
            "bucket with local depth {d} must have 2^(g-d) slots"
        );
        for &slot in slots {
            assert_eq!(slot & low, base, "slot {slot} does not share low bits");
        }

        assert!(
            bucket.len() <= t.bucket_capacity(),
            "bucket over capacity: {} > {}",
            bucket.len(),
            t.bucket_capacity()
        );
        for &v in bucket.values() {
            assert!(seen.insert(v), "duplicate value {v}");
            assert_eq!(
                t.bucket_id(t.hash(v)),
                *id,
                "value {v} not in the bucket it routes to"
            );
        }
    }

    assert_eq!(seen.len(), t.len(), "stored value count must match len()");
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "-512i64..512")] i64),
    #[proptest(weight = 2)]
    Remove(#[proptest(strategy = "-512i64..512")] i64),
    #[proptest(weight = 2)]
    Find(#[proptest(strategy = "-512i64..512")] i64),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(
        depth in 0u32..=3,
        capacity in 1usize..=4,
        ops in prop::collection::vec(any::<Op>(), 0..=600),
    ) {
        // Values in -512..512 are distinct in their low 10 bits, so a depth
        // of 10 always separates them.
        let cfg = TableConfig::new(depth, capacity).max_global_depth(10);
        let mut t = ExtendibleHashTable::with_config(cfg).unwrap();
        let mut m: BTreeSet<i64> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    prop_assert_eq!(t.insert(v), Ok(m.insert(v)));
                    prop_assert!(t.find(v));
                }
                Op::Remove(v) => {
                    prop_assert_eq!(t.remove(v), m.remove(&v));
                    prop_assert!(!t.find(v));
                }
                Op::Find(v) => {
                    prop_assert_eq!(t.find(v), m.contains(&v));
                }
            }
            prop_assert_eq!(t.len(), m.len());
            prop_assert_eq!(t.directory_len(), 1usize << t.global_depth());
        }

        validate_table(&t);
        let got: BTreeSet<i64> = t.iter().collect();
        prop_assert_eq!(got, m);
    }

    #[test]
    fn prop_insert_idempotent(
        capacity in 1usize..=3,
        values in prop::collection::vec(-256i64..256, 1..=64),
    ) {
        let mut once = ExtendibleHashTable::new(0, capacity).unwrap();
        let mut twice = ExtendibleHashTable::new(0, capacity).unwrap();
        for &v in &values {
            once.insert(v).unwrap();
            twice.insert(v).unwrap();
            prop_assert_eq!(twice.insert(v), Ok(false));
        }
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_depth_limit_leaves_table_valid(
        capacity in 1usize..=2,
        max_depth in 0u32..=4,
        values in prop::collection::vec(any::<i64>(), 0..=200),
    ) {
        let cfg = TableConfig::new(0, capacity).max_global_depth(max_depth);
        let mut t = ExtendibleHashTable::with_config(cfg).unwrap();
        let mut m: BTreeSet<i64> = BTreeSet::new();

        for v in values {
            match t.insert(v) {
                Ok(inserted) => {
                    prop_assert_eq!(inserted, m.insert(v));
                }
                Err(Error::DepthLimit { value, max_global_depth }) => {
                    prop_assert_eq!(value, v);
                    prop_assert_eq!(max_global_depth, max_depth);
                    prop_assert!(!m.contains(&v));
                    prop_assert!(!t.find(v));
                }
                Err(e) => {
                    prop_assert!(false, "unexpected error: {}", e);
                }
            }
            prop_assert!(t.global_depth() <= max_depth);
        }

        validate_table(&t);
        let got: BTreeSet<i64> = t.iter().collect();
        prop_assert_eq!(got, m);
    }
}

#[test]
fn random_workload_against_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for capacity in [1usize, 2, 3, 8] {
        let mut t = ExtendibleHashTable::new(1, capacity).unwrap();
        let mut m: BTreeSet<i64> = BTreeSet::new();

        for _ in 0..20_000 {
            let v: i64 = rng.gen_range(-50_000..50_000);
            if rng.gen_bool(0.7) {
                assert_eq!(t.insert(v), Ok(m.insert(v)));
            } else {
                assert_eq!(t.remove(v), m.remove(&v));
            }
        }

        validate_table(&t);
        for v in -50_000i64..50_000 {
            assert_eq!(t.find(v), m.contains(&v), "mismatch at {v}");
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

// Heavy low-bit overlap: every pair shares at least one low bit.
const SMALL_SET: [i64; 6] = [0, 4, 8, 12, 2, -4];

#[test]
fn exhaustive_insert_order_small_set() {
    for capacity in 1..=3 {
        for_each_permutation(&SMALL_SET, |perm| {
            let mut t = ExtendibleHashTable::new(0, capacity).unwrap();
            for v in perm {
                assert_eq!(t.insert(v), Ok(true));
                validate_table(&t);
            }
            let got: BTreeSet<i64> = t.iter().collect();
            let expected: BTreeSet<i64> = SMALL_SET.iter().copied().collect();
            assert_eq!(got, expected);
        });
    }
}

#[test]
fn exhaustive_remove_order_small_set() {
    let mut base = ExtendibleHashTable::new(0, 2).unwrap();
    for v in SMALL_SET {
        base.insert(v).unwrap();
    }
    let depth = base.global_depth();

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base.clone();
        for v in perm {
            assert!(t.remove(v));
            assert!(!t.find(v));
            validate_table(&t);
        }
        assert!(t.is_empty());
        assert_eq!(t.global_depth(), depth);
    });
}
