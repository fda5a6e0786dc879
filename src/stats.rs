//! Chain distribution statistics (feature `stats`).

use crate::chain_table::ChainTable;
use crate::policy::TablePolicy;

/// Snapshot of how entries are spread over the buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    pub len: usize,
    pub capacity: usize,
    /// Buckets with a non-empty chain.
    pub occupied_buckets: usize,
    pub longest_chain: usize,
    /// `len / capacity`.
    pub load_factor: f64,
}

impl<P: TablePolicy> ChainTable<P> {
    pub fn stats(&self) -> TableStats {
        let mut occupied_buckets = 0;
        let mut longest_chain = 0;
        for bucket in 0..self.capacity() {
            let n = self.chain(bucket).count();
            if n > 0 {
                occupied_buckets += 1;
            }
            longest_chain = longest_chain.max(n);
        }
        TableStats {
            len: self.len(),
            capacity: self.capacity(),
            occupied_buckets,
            longest_chain,
            load_factor: self.len() as f64 / self.capacity() as f64,
        }
    }
}
