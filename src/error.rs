use thiserror::Error;

/// Rejected table construction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateError {
    #[error("table capacity must be greater than zero")]
    ZeroCapacity,
}

/// A structural inconsistency found by [`ChainTable::validate`](crate::ChainTable::validate).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    #[error("table has no buckets")]
    ZeroCapacity,
    #[error("chain at bucket {bucket} links to a node the table does not store")]
    DanglingLink { bucket: usize },
    #[error("chain at bucket {bucket} does not terminate")]
    CyclicChain { bucket: usize },
    #[error("entry stored in bucket {bucket} hashes to bucket {expected}")]
    MisplacedEntry { bucket: usize, expected: usize },
    #[error("entry in bucket {bucket} cached hash {cached:#x} but its key hashes to {actual:#x}")]
    StaleHash {
        bucket: usize,
        cached: u64,
        actual: u64,
    },
    #[error("table stores {stored} entries but its chains reach {linked}")]
    SizeMismatch { stored: usize, linked: usize },
}
