use super::*;
use crate::tests::{CountingStrategy, validate};

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Clone, Debug)]
enum Op {
    Insert(u32),
    Remove(u32),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    // A narrow key space keeps buckets deep and forces repeated hits.
    let key = 0u32..256;
    let op = prop_oneof![
        55 => key.clone().prop_map(Op::Insert),
        45 => key.prop_map(Op::Remove),
    ];
    prop::collection::vec(op, 0..=600)
}

/// Expected `level-free` contents of each slot, ascending.
fn slot_contents(table: &Table<CountingStrategy>) -> Vec<Vec<u32>> {
    table
        .slots
        .iter()
        .map(|slot| match slot {
            Some(bucket) => bucket.entries().into_iter().map(|(_, k)| *k).collect(),
            None => Vec::new(),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_btreeset(ops in ops_strategy(), bit_width in 1u32..=4) {
        let strategy = CountingStrategy::new();
        let clones = Rc::clone(&strategy.clones);
        let destroys = Rc::clone(&strategy.destroys);

        let mut table = Table::new(strategy, bit_width);
        let mut model: BTreeSet<u32> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    let expected = if model.insert(k) { Outcome::Success } else { Outcome::AlreadyStored };
                    prop_assert_eq!(table.insert(&k), expected);
                }
                Op::Remove(k) => {
                    let expected = if model.remove(&k) { Outcome::Success } else { Outcome::NotStored };
                    prop_assert_eq!(table.remove(&k), expected);
                }
            }
            prop_assert_eq!(validate(&table), model.len());
            prop_assert!(table.bucket_count() <= table.slot_count());
        }

        let mask = (1u32 << bit_width) - 1;
        let mut expected = vec![Vec::new(); table.slot_count()];
        for &k in &model {
            expected[(k & mask) as usize].push(k);
        }
        prop_assert_eq!(slot_contents(&table), expected);

        let present = table.len();
        let destroyed_before = destroys.get();
        drop(table);
        prop_assert_eq!(destroys.get() - destroyed_before, present);
        prop_assert_eq!(destroys.get(), clones.get());
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

#[test]
fn exhaustive_remove_order_single_bucket() {
    // All keys share slot 0 with bit width 1.
    let keys: Vec<u32> = vec![40, 20, 60, 10, 30, 50, 70];

    for_each_permutation(&keys, |perm| {
        let mut table = Table::new(CountingStrategy::new(), 1);
        for k in &keys {
            assert_eq!(table.insert(k), Outcome::Success);
        }

        let mut remaining: BTreeSet<u32> = keys.iter().copied().collect();
        for k in perm {
            assert_eq!(table.remove(&k), Outcome::Success);
            remaining.remove(&k);
            assert_eq!(validate(&table), remaining.len());
            assert_eq!(slot_contents(&table)[0], remaining.iter().copied().collect::<Vec<_>>());
        }
        assert!(table.is_empty());
        assert_eq!(table.strategy().destroys.get(), keys.len());
    });
}

#[test]
fn exhaustive_insert_order_single_bucket() {
    let keys: Vec<u32> = vec![2, 4, 6, 8, 10, 12];

    for_each_permutation(&keys, |perm| {
        let mut table = Table::new(CountingStrategy::new(), 1);
        for k in &perm {
            assert_eq!(table.insert(k), Outcome::Success);
        }
        assert_eq!(validate(&table), keys.len());
        assert_eq!(slot_contents(&table)[0], keys);

        // the first key inserted is always the root
        let root = perm[0];
        let dump = table.dump().to_string();
        assert!(dump.contains(&format!("0-{root}")), "{dump}");
    });
}
