//! ChainTable: separate-chaining hash table over a slot arena.

use crate::error::CreateError;
use crate::policy::TablePolicy;
use core::fmt;
use core::mem;
use log::{debug, trace};
use slotmap::SlotMap;

/// Growth stops once the bucket count reaches this many buckets.
pub const DEFAULT_MAX_CAPACITY: usize = (u32::MAX / 2) as usize;

slotmap::new_key_type! {
    pub(crate) struct NodeKey;
}

#[derive(Debug)]
pub(crate) struct Node<E> {
    pub(crate) elem: E,
    // Hash of the element's key, computed once on insertion.
    pub(crate) hash: u64,
    pub(crate) next: Option<NodeKey>,
}

#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// Hash table with separate chaining and automatic doubling.
///
/// Elements are owned by the table from `insert` until they are either
/// evicted by an insert under an equal key (and handed back) or destroyed
/// through [`TablePolicy::destroy`] when the table is dropped.
pub struct ChainTable<P: TablePolicy> {
    pub(crate) policy: P,
    // Chain heads; `buckets.len()` is the capacity.
    pub(crate) buckets: Vec<Option<NodeKey>>,
    pub(crate) nodes: SlotMap<NodeKey, Node<P::Elem>>,
    max_capacity: usize,
}

impl<P: TablePolicy> ChainTable<P> {
    /// Create an empty table with `capacity` buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, policy: P) -> Self {
        Self::with_max_capacity(capacity, DEFAULT_MAX_CAPACITY, policy)
    }

    /// Create an empty table whose capacity stops doubling once it reaches
    /// `max_capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_max_capacity(capacity: usize, max_capacity: usize, policy: P) -> Self {
        match Self::try_with_max_capacity(capacity, max_capacity, policy) {
            Ok(table) => table,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(capacity: usize, policy: P) -> Result<Self, CreateError> {
        Self::try_with_max_capacity(capacity, DEFAULT_MAX_CAPACITY, policy)
    }

    pub fn try_with_max_capacity(
        capacity: usize,
        max_capacity: usize,
        policy: P,
    ) -> Result<Self, CreateError> {
        if capacity == 0 {
            return Err(CreateError::ZeroCapacity);
        }
        let table = Self {
            policy,
            buckets: vec![None; capacity],
            nodes: SlotMap::with_key(),
            max_capacity,
        };
        table.debug_validate("create");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[inline]
    fn bucket_for(&self, hash: u64) -> usize {
        bucket_index(hash, self.capacity())
    }

    pub(crate) fn chain(&self, bucket: usize) -> Chain<'_, P::Elem> {
        Chain {
            nodes: &self.nodes,
            cur: self.buckets[bucket],
        }
    }

    fn find_in_bucket(&self, bucket: usize, hash: u64, key: &P::Key) -> Option<NodeKey> {
        self.chain(bucket)
            .find(|(_, node)| {
                node.hash == hash && self.policy.keys_equal(self.policy.key(&node.elem), key)
            })
            .map(|(k, _)| k)
    }

    /// Find the element stored under a key equal to `key`.
    pub fn lookup(&self, key: &P::Key) -> Option<&P::Elem> {
        let hash = self.policy.hash(key);
        let k = self.find_in_bucket(self.bucket_for(hash), hash, key)?;
        self.nodes.get(k).map(|node| &node.elem)
    }

    pub fn contains_key(&self, key: &P::Key) -> bool {
        self.lookup(key).is_some()
    }

    /// Insert `elem`, replacing any element stored under an equal key.
    ///
    /// Returns the replaced element, whose ownership passes back to the
    /// caller, or `None` if the key was new. A new key may double the
    /// capacity before this returns.
    #[must_use = "an evicted element is handed back to the caller"]
    pub fn insert(&mut self, elem: P::Elem) -> Option<P::Elem> {
        let hash = self.policy.hash(self.policy.key(&elem));
        let bucket = self.bucket_for(hash);

        if let Some(k) = self.find_in_bucket(bucket, hash, self.policy.key(&elem)) {
            let evicted = mem::replace(&mut self.nodes[k].elem, elem);
            self.debug_check_node(k, "insert (overwrite)");
            return Some(evicted);
        }

        // Prepend to the chain.
        let next = self.buckets[bucket];
        let k = self.nodes.insert(Node { elem, hash, next });
        self.buckets[bucket] = Some(k);

        self.grow_if_needed();
        self.debug_check_node(k, "insert");
        None
    }

    fn grow_if_needed(&mut self) {
        let capacity = self.capacity();
        if self.len() <= capacity {
            return;
        }
        if capacity >= self.max_capacity {
            trace!(
                "load factor above 1 with {} entries; growth ceiling of {} buckets reached",
                self.len(),
                self.max_capacity
            );
            return;
        }
        match capacity.checked_mul(2) {
            Some(new_capacity) => self.resize(new_capacity),
            None => trace!("doubling {capacity} buckets overflows; not growing"),
        }
    }

    /// Relink every node into a fresh bucket array of `new_capacity`.
    /// Elements stay where they are in the arena; only links change.
    fn resize(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity > 0);
        debug!(
            "resizing chain table from {} to {} buckets ({} entries)",
            self.capacity(),
            new_capacity,
            self.len()
        );

        let mut fresh: Vec<Option<NodeKey>> = vec![None; new_capacity];
        for head in self.buckets.iter().copied() {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                cur = node.next;
                let b = bucket_index(node.hash, new_capacity);
                node.next = fresh[b];
                fresh[b] = Some(k);
            }
        }
        self.buckets = fresh;

        self.debug_validate("resize");
    }

    /// Tear the table down, destroying every stored element once.
    pub fn destroy(self) {
        drop(self);
    }

    // Debug builds re-check the chain holding `node` after every insert.
    #[inline]
    fn debug_check_node(&self, node: NodeKey, op: &'static str) {
        if cfg!(debug_assertions) {
            let bucket = match self.nodes.get(node) {
                Some(n) => self.bucket_for(n.hash),
                None => panic!("{op}: inserted entry is missing from the arena"),
            };
            assert!(
                self.chain(bucket).any(|(k, _)| k == node),
                "{op}: inserted entry is not reachable from bucket {bucket}"
            );
            if let Err(err) = self.check_chain(bucket) {
                panic!("{op} left the table inconsistent: {err}");
            }
        }
        self.debug_validate(op);
    }

    #[inline]
    #[cfg_attr(
        not(all(debug_assertions, feature = "expensive-checks")),
        allow(unused_variables)
    )]
    fn debug_validate(&self, op: &'static str) {
        #[cfg(all(debug_assertions, feature = "expensive-checks"))]
        {
            if let Err(err) = self.validate() {
                panic!("{op} left the table inconsistent: {err}");
            }
        }
    }
}

impl<P: TablePolicy> Drop for ChainTable<P> {
    fn drop(&mut self) {
        let mut destroyed = 0usize;
        for head in mem::take(&mut self.buckets) {
            let mut cur = head;
            while let Some(node) = cur.and_then(|k| self.nodes.remove(k)) {
                cur = node.next;
                self.policy.destroy(node.elem);
                destroyed += 1;
            }
        }
        trace!("chain table dropped; destroyed {destroyed} elements");
    }
}

impl<P: TablePolicy> fmt::Debug for ChainTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("max_capacity", &self.max_capacity)
            .finish_non_exhaustive()
    }
}

/// Walks one bucket's chain, yielding each node with its arena key.
pub(crate) struct Chain<'a, E> {
    nodes: &'a SlotMap<NodeKey, Node<E>>,
    cur: Option<NodeKey>,
}

impl<'a, E> Iterator for Chain<'a, E> {
    type Item = (NodeKey, &'a Node<E>);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let node = self.nodes.get(k)?;
        self.cur = node.next;
        Some((k, node))
    }
}
