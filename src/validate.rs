//! Structural consistency checks for `ChainTable`.
//!
//! `validate` never mutates the table and never trusts the cached per-node
//! hash: membership is recomputed through the policy, so it also catches
//! keys whose hash changed after insertion.

use crate::chain_table::{bucket_index, ChainTable};
use crate::error::InvariantError;
use crate::policy::TablePolicy;

impl<P: TablePolicy> ChainTable<P> {
    /// Check every structural invariant of the table.
    ///
    /// Holds between any two public operations:
    /// - at least one bucket exists;
    /// - every chain link resolves to a stored entry and every chain ends;
    /// - each entry sits in the bucket its key hashes to, and its cached
    ///   hash matches the policy's;
    /// - the chains reach exactly the entries the table stores.
    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.buckets.is_empty() {
            return Err(InvariantError::ZeroCapacity);
        }
        let mut linked = 0usize;
        for bucket in 0..self.buckets.len() {
            linked += self.check_chain(bucket)?;
        }
        if linked != self.nodes.len() {
            return Err(InvariantError::SizeMismatch {
                stored: self.nodes.len(),
                linked,
            });
        }
        Ok(())
    }

    /// Check one chain and return its length.
    pub(crate) fn check_chain(&self, bucket: usize) -> Result<usize, InvariantError> {
        let capacity = self.buckets.len();
        let mut cur = self.buckets[bucket];
        let mut count = 0usize;
        while let Some(k) = cur {
            let node = self
                .nodes
                .get(k)
                .ok_or(InvariantError::DanglingLink { bucket })?;
            count += 1;
            // A chain longer than the arena must revisit a node.
            if count > self.nodes.len() {
                return Err(InvariantError::CyclicChain { bucket });
            }
            let actual = self.policy.hash(self.policy.key(&node.elem));
            let expected = bucket_index(actual, capacity);
            if expected != bucket {
                return Err(InvariantError::MisplacedEntry { bucket, expected });
            }
            if node.hash != actual {
                return Err(InvariantError::StaleHash {
                    bucket,
                    cached: node.hash,
                    actual,
                });
            }
            cur = node.next;
        }
        Ok(count)
    }
}
