#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can reach
// `validate`'s internals and the chain walker without extra features.

use crate::chain_table::ChainTable;
use crate::policy::{HashedPolicy, TablePolicy};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hasher;
use std::rc::Rc;

type Elem = (String, i32);

fn elem_key(e: &Elem) -> &str {
    &e.0
}

// Delegates to an inner policy and counts destroyed elements.
struct Counting<P> {
    inner: P,
    destroyed: Rc<Cell<usize>>,
}

impl<P> TablePolicy for Counting<P>
where
    P: TablePolicy<Elem = Elem, Key = str>,
{
    type Elem = Elem;
    type Key = str;
    fn key<'e>(&self, elem: &'e Elem) -> &'e str {
        self.inner.key(elem)
    }
    fn keys_equal(&self, a: &str, b: &str) -> bool {
        self.inner.keys_equal(a, b)
    }
    fn hash(&self, key: &str) -> u64 {
        self.inner.hash(key)
    }
    fn destroy(&self, elem: Elem) {
        self.destroyed.set(self.destroyed.get() + 1);
        self.inner.destroy(elem);
    }
}

// Pool-indexed operations so shrinking moves towards earlier keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Lookup(usize),
    Contains(String),
    KeySet,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=8, proptest::collection::vec("[a-z]{0,5}", 1..=12)).prop_flat_map(
        |(capacity, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
                2 => idx.clone().prop_map(OpI::Lookup),
                1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
                1 => Just(OpI::KeySet),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

// Model: std HashMap from key to the full element last inserted under it.
// After every op:
// - `validate` passes;
// - len/is_empty match the model;
// - capacity is the initial capacity times a power of two and, below the
//   ceiling, never smaller than len.
// At the end, teardown destroys exactly `len` elements.
fn run_scenario<P>(
    policy: P,
    capacity: usize,
    max_capacity: usize,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    P: TablePolicy<Elem = Elem, Key = str>,
{
    let destroyed = Rc::new(Cell::new(0));
    let mut sut = ChainTable::with_max_capacity(
        capacity,
        max_capacity,
        Counting {
            inner: policy,
            destroyed: destroyed.clone(),
        },
    );
    let mut model: HashMap<String, Elem> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let elem = (pool[i].clone(), v);
                let before_len = sut.len();
                let evicted = sut.insert(elem.clone());
                let prior = model.insert(pool[i].clone(), elem.clone());
                prop_assert_eq!(evicted.as_ref(), prior.as_ref());
                if prior.is_some() {
                    prop_assert_eq!(sut.len(), before_len, "overwrite keeps len");
                } else {
                    prop_assert_eq!(sut.len(), before_len + 1);
                }
                prop_assert_eq!(sut.lookup(pool[i].as_str()), Some(&elem));
            }
            OpI::Lookup(i) => {
                prop_assert_eq!(sut.lookup(pool[i].as_str()), model.get(&pool[i]));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            OpI::KeySet => {
                let s_keys: BTreeSet<String> = (0..sut.capacity())
                    .flat_map(|b| sut.chain(b).map(|(_, n)| n.elem.0.clone()))
                    .collect();
                let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        prop_assert_eq!(sut.validate(), Ok(()));
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.capacity() % capacity, 0);
        prop_assert!((sut.capacity() / capacity).is_power_of_two());
        if sut.capacity() < max_capacity {
            prop_assert!(sut.len() <= sut.capacity());
        }
    }

    prop_assert_eq!(destroyed.get(), 0, "evictions are not destroyed");
    let live = sut.len();
    drop(sut);
    prop_assert_eq!(destroyed.get(), live);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let policy: HashedPolicy<Elem, str> = HashedPolicy::new(elem_key);
        run_scenario(policy, capacity, crate::DEFAULT_MAX_CAPACITY, &pool, ops)?;
    }

    // A low ceiling keeps chains long once growth stops.
    #[test]
    fn prop_state_machine_with_ceiling((capacity, pool, ops) in arb_scenario()) {
        let policy: HashedPolicy<Elem, str> = HashedPolicy::new(elem_key);
        run_scenario(policy, capacity, capacity * 2, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl std::hash::BuildHasher for ConstBuildHasher {
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

// Property: same state-machine invariants with every key in one chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((capacity, pool, ops) in arb_scenario()) {
        let policy = HashedPolicy::with_hasher(elem_key as fn(&Elem) -> &str, ConstBuildHasher);
        run_scenario(policy, capacity, crate::DEFAULT_MAX_CAPACITY, &pool, ops)?;
    }
}
