//! Element policies: how a table extracts, compares, hashes and disposes of
//! the elements it stores.

use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Behaviour a [`ChainTable`](crate::ChainTable) needs from its elements.
///
/// A policy is supplied once, at creation, and never replaced. Implementors
/// must keep `hash` consistent with `keys_equal`: keys that compare equal
/// must hash equally, otherwise lookups silently miss.
pub trait TablePolicy {
    /// Element stored in the table. The table owns it while it is stored.
    type Elem;
    /// Key projected out of an element.
    type Key: ?Sized;

    /// Project the key out of an element. Must be total.
    fn key<'e>(&self, elem: &'e Self::Elem) -> &'e Self::Key;

    /// Key equivalence. Must be reflexive, symmetric and transitive.
    fn keys_equal(&self, a: &Self::Key, b: &Self::Key) -> bool;

    fn hash(&self, key: &Self::Key) -> u64;

    /// Dispose of an element on teardown.
    ///
    /// The default drops the element. For non-owning element types
    /// (references, `Rc`, indices) that leaves the referent with the caller.
    /// Elements evicted by an overwriting insert are handed back to the
    /// caller and never pass through here.
    fn destroy(&self, elem: Self::Elem) {
        drop(elem);
    }
}

/// Policy for keys that are already `Eq + Hash`.
///
/// Keys are compared with `==` and hashed with `S`; elements are dropped on
/// teardown.
pub struct HashedPolicy<E, K: ?Sized, S = DefaultHashBuilder> {
    key_of: fn(&E) -> &K,
    hasher: S,
}

impl<E, K: ?Sized> HashedPolicy<E, K> {
    pub fn new(key_of: fn(&E) -> &K) -> Self {
        Self::with_hasher(key_of, DefaultHashBuilder::default())
    }
}

impl<E, K: ?Sized, S> HashedPolicy<E, K, S> {
    pub fn with_hasher(key_of: fn(&E) -> &K, hasher: S) -> Self {
        Self { key_of, hasher }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<E, K: ?Sized, S: Clone> Clone for HashedPolicy<E, K, S> {
    fn clone(&self) -> Self {
        Self::with_hasher(self.key_of, self.hasher.clone())
    }
}

impl<E, K: ?Sized, S> fmt::Debug for HashedPolicy<E, K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPolicy").finish_non_exhaustive()
    }
}

impl<E, K, S> TablePolicy for HashedPolicy<E, K, S>
where
    K: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Elem = E;
    type Key = K;

    #[inline]
    fn key<'e>(&self, elem: &'e E) -> &'e K {
        (self.key_of)(elem)
    }

    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a == b
    }

    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hasher.hash_one(key)
    }
}
