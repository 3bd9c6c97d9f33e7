#![cfg(test)]

// Property tests for HashMap kept inside the crate so they can reach
// `validate` together with the free-list and resize paths.

use crate::error::CollectionError;
use crate::hash_map::HashMap;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::hash_map::RandomState;
use std::collections::{BTreeMap, HashMap as StdHashMap};
use std::hash::Hasher;

// Pool-indexed operations so shrinking moves toward earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Add(usize, i32),
    TryAdd(usize, i32),
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Add(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::TryAdd(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Low-entropy hasher: forces long shared chains so free-list reuse and
// unlinking from chain interiors are exercised constantly.
#[derive(Clone, Default)]
struct ModHasherBuilder;
struct ModHasher(u64);
impl BuildHasher for ModHasherBuilder {
    type Hasher = ModHasher;
    fn build_hasher(&self) -> ModHasher {
        ModHasher(0)
    }
}
impl Hasher for ModHasher {
    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = self.0.wrapping_add(u64::from(*b));
        }
    }
    fn finish(&self) -> u64 {
        self.0 % 3
    }
}

fn run_scenario<S: BuildHasher>(
    mut sut: HashMap<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: StdHashMap<String, i32> = StdHashMap::new();

    for op in ops {
        match op {
            Op::Add(i, v) => {
                let k = pool[i].clone();
                let existed = model.contains_key(&k);
                match sut.add(k.clone(), v) {
                    Ok(()) => {
                        prop_assert!(!existed, "add must fail on duplicate");
                        model.insert(k, v);
                    }
                    Err(CollectionError::DuplicateKey) => prop_assert!(existed),
                    Err(e) => return Err(TestCaseError::fail(format!("unexpected {e}"))),
                }
            }
            Op::TryAdd(i, v) => {
                let k = pool[i].clone();
                let existed = model.contains_key(&k);
                prop_assert_eq!(sut.try_add(k.clone(), v), !existed);
                model.entry(k).or_insert(v);
            }
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k.as_str()), model.remove(k));
                prop_assert!(!sut.contains_key(k.as_str()));
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
                prop_assert_eq!(sut.value(k.as_str()).ok(), model.get(k));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.validate().is_ok());
    }

    let got: BTreeMap<String, i32> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
    let expected: BTreeMap<String, i32> = model.into_iter().collect();
    prop_assert_eq!(got, expected);
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - `add` fails exactly on present keys; `try_add` never overwrites; `insert`
//   returns the previous value.
// - After `remove(k)`, `get(k)` is `None`; re-adding reuses a free slot.
// - `len` parity and structural validity after every step, across resizes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(HashMap::<String, i32, RandomState>::new(), pool, ops)?;
    }

    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(HashMap::with_hasher(ModHasherBuilder), pool, ops)?;
    }

    #[test]
    fn prop_round_trip_under_resize(n in 0usize..3_000, start in 0usize..16) {
        let mut m: HashMap<usize, usize> = HashMap::with_capacity(start);
        for i in 0..n {
            m.add(i, i ^ 0x5a5a).unwrap();
        }
        prop_assert_eq!(m.len(), n);
        prop_assert!(m.capacity() >= n);
        for i in 0..n {
            prop_assert_eq!(m.get(&i), Some(&(i ^ 0x5a5a)));
        }
    }
}
