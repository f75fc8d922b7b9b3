#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can reach
// the engine and its consistency check without feature gates.

use crate::chain_table::ChainTable;
use crate::error::TableError;
use hashbrown::HashMap;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Put(i32, i32),
    PutIfAbsent(i32, i32),
    Remove(i32),
    Get(i32),
    Mutate(i32, i32),
    Clear,
    Iterate,
}

// Keys are drawn from a small pool so that updates, repeated removals and
// misses all happen often; a few wide keys exercise negative and high bits.
fn arb_key() -> impl Strategy<Value = i32> {
    prop_oneof![
        4 => 0i32..96,
        1 => any::<i32>(),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        6 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::PutIfAbsent(k, v)),
        3 => arb_key().prop_map(Op::Remove),
        3 => arb_key().prop_map(Op::Get),
        1 => (arb_key(), any::<i32>()).prop_map(|(k, d)| Op::Mutate(k, d)),
        1 => Just(Op::Clear),
        1 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..300)
}

fn run(
    sut: &mut ChainTable<i32, i32>,
    hash: fn(i32) -> u32,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<i32, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Put(k, v) => {
                let prev = sut.upsert(hash(k), k, v, |&s| s == k).map_err(fail)?;
                prop_assert_eq!(prev, model.insert(k, v));
            }
            Op::PutIfAbsent(k, v) => {
                let stored = *sut
                    .insert_if_absent(hash(k), k, v, |&s| s == k)
                    .map_err(fail)?;
                let expected = *model.entry(k).or_insert(v);
                prop_assert_eq!(stored, expected);
            }
            Op::Remove(k) => {
                let removed = sut.remove(hash(k), |&s| s == k);
                prop_assert_eq!(removed.map(|(_, v)| v), model.remove(&k));
            }
            Op::Get(k) => {
                prop_assert_eq!(sut.get(hash(k), |&s| s == k), model.get(&k));
                let found = sut.find(hash(k), |&s| s == k).is_some();
                prop_assert_eq!(found, model.contains_key(&k));
            }
            Op::Mutate(k, d) => {
                if let Some(v) = sut.get_mut(hash(k), |&s| s == k) {
                    *v = v.wrapping_add(d);
                }
                if let Some(v) = model.get_mut(&k) {
                    *v = v.wrapping_add(d);
                }
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
            Op::Iterate => {
                let seen: Vec<(i32, i32)> = sut.iter().map(|(&k, &v)| (k, v)).collect();
                let keys: BTreeSet<i32> = seen.iter().map(|&(k, _)| k).collect();
                prop_assert_eq!(keys.len(), seen.len(), "iteration repeated a key");
                for (k, v) in seen {
                    prop_assert_eq!(model.get(&k), Some(&v));
                }
                prop_assert_eq!(keys.len(), model.len());
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.capacity().is_power_of_two());
        prop_assert!(sut.len() <= sut.threshold());
    }
    sut.assert_consistent();
    Ok(())
}

fn fail(e: TableError) -> TestCaseError {
    TestCaseError::fail(e.to_string())
}

// Property: State-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - `upsert` returns the replaced value; `insert_if_absent` keeps the first.
// - `remove` returns the stored pair once and then misses.
// - `iter` yields each live entry exactly once.
// - Size parity after each op; every entry stays in its hash's bucket
//   across however many resizes the sequence triggers.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut = ChainTable::with_capacity(16);
        run(&mut sut, |k| k as u32, ops)?;
    }
}

// Property: Same invariants with every key hashed to one value, so the
// whole table is a single chain and equality alone resolves lookups.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(ops in arb_ops()) {
        let mut sut = ChainTable::with_capacity(16);
        run(&mut sut, |_| 0x5a5a_5a5a, ops)?;
    }
}
