//! chain-table: a single-threaded hash table with separate chaining whose
//! element behaviour is supplied by a policy.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative container whose structural invariants can
//!   be stated precisely and checked at any point between operations.
//! - Pieces:
//!   - TablePolicy: the element contract (extract key, compare keys, hash
//!     a key, destroy an element). Supplied once at creation.
//!   - ChainTable<P>: bucket array of chain heads over a slot arena of
//!     nodes; insert-with-overwrite, lookup, doubling growth, teardown.
//!   - validate: one pure checker for every structural invariant, used by
//!     tests and by debug builds.
//!
//! Constraints
//! - Single-threaded; no interior mutability, so `&mut self` on insert
//!   rules out reentrant mutation.
//! - Entries sharing a bucket have no defined order.
//! - No removal and no iteration; entries leave the table only by being
//!   overwritten or by teardown.
//!
//! Ownership
//! - `insert` moves the element into the table. If an equal key was
//!   stored, the old element moves back out as `Some(evicted)`; the table
//!   never destroys an evicted element.
//! - Dropping the table passes each stored element to
//!   `TablePolicy::destroy` exactly once.
//!
//! Growth
//! - After an insert that adds an entry, if `len > capacity` and the
//!   capacity is below its ceiling, the capacity doubles once. Growth is
//!   not repeated to reach a target load factor.
//! - Resize relinks nodes by their cached hash; elements are not moved
//!   and the policy is not called.
//!
//! Contract violations
//! - Zero capacity through `new` panics; `try_new` reports it instead.
//! - Debug builds re-check the chain touched by each insert; with the
//!   `expensive-checks` feature they run the full `validate` after every
//!   mutation. Release builds run neither.

mod chain_table;
mod chain_table_proptest;
mod error;
mod policy;
#[cfg(feature = "stats")]
mod stats;
mod validate;

// Public surface
pub use chain_table::{ChainTable, DEFAULT_MAX_CAPACITY};
pub use error::{CreateError, InvariantError};
pub use policy::{HashedPolicy, TablePolicy};
#[cfg(feature = "stats")]
pub use stats::TableStats;
