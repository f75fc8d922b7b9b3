//! chain-maps: bucket-chained hash tables keyed by object identity or by
//! a primitive `i32`.
//!
//! Internal Design:
//!
//! Summary
//! - Both public tables share one engine and differ only in how they hash
//!   and compare keys.
//! - Layers:
//!   - ChainTable<K, V>: power-of-two bucket array whose chains link
//!     entries stored in a `SlotMap` arena. Callers pass a precomputed
//!     hash and an equality predicate; the engine never hashes.
//!   - IntTable<V>: `i32` keys, each key its own hash. Iterable and can
//!     export its key set.
//!   - IdentityTable<P, V>: pointer-like keys hashed and compared by the
//!     address they point at (`Address`, `IdentityKey`).
//!
//! Growth
//! - Capacity starts at the next power of two of the request (minimum 16,
//!   default 64, maximum 2^29). Inserting a new key when
//!   `len >= capacity * 3 / 4` doubles the bucket array first.
//! - Each entry caches its hash at insert. Resize relinks every entry into
//!   the new array by that hash, then publishes the array as its last step.
//! - At 2^29 buckets the threshold pins to `2^29 - 1` and the table keeps
//!   accepting keys above the load factor. Reaching the pinned threshold
//!   fails with `TableError::CapacityExhausted` and leaves the table as it
//!   was.
//!
//! Constraints
//! - Not thread-safe: tables are `!Sync`. All mutation takes `&mut self`.
//! - Removal unlinks and frees the entry; tables never shrink.
//! - Iteration order is bucket order, then chain order. Chains hold the
//!   newest entry first, and a resize reverses entries that stay together.
//! - Reentrancy: the only user code that runs inside the engine is
//!   `Address::address` on identity keys, equality predicates, and drop
//!   glue. Debug builds record the running engine operation and panic,
//!   naming both operations, if that code re-enters the same table.

mod chain_table_proptest;
mod error;
mod identity;
mod identity_table;
mod int_table;
mod reentrancy;

#[cfg(feature = "bench_internal")]
pub mod chain_table;
#[cfg(not(feature = "bench_internal"))]
mod chain_table;

// Public surface
pub use error::{Result, TableError};
pub use identity::{identity_hash, Address, IdentityKey};
pub use identity_table::IdentityTable;
pub use int_table::{IntTable, IntTableIter};
