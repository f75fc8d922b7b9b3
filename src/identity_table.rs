//! IdentityTable: values keyed by the address of a pointer-like key.

use crate::chain_table::ChainTable;
use crate::error::Result;
use crate::identity::{identity_hash, Address, IdentityKey};
use core::fmt;

/// Maps pointer-like keys to values, comparing keys by the address they
/// point at rather than by value.
///
/// The table owns its keys. Owning pointers (`Rc`, `Arc`, `Box`) or
/// borrowed `&'a T` keep the pointee alive, so an address cannot be reused
/// by another object while its entry is present. `NonNull` keys carry no
/// such guarantee; the caller must remove them before the pointee dies.
///
/// Lookups take any `Address`, so a table of `Rc<T>` answers queries made
/// with a plain `&T` to the same object. The query's own address is what
/// gets hashed: `get(&rc)` and `get(&obj)` with `obj: &T` reach the
/// object, while `get(&&rc)` hashes the local `Rc` handle and misses.
pub struct IdentityTable<P, V> {
    table: ChainTable<IdentityKey<P>, V>,
}

impl<P: Address, V> IdentityTable<P, V> {
    pub fn new() -> Self {
        Self {
            table: ChainTable::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: ChainTable::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn get<Q: Address + ?Sized>(&self, key: &Q) -> Option<&V> {
        let addr = key.address();
        self.table.get(identity_hash(addr), |k| k.address() == addr)
    }

    pub fn get_mut<Q: Address + ?Sized>(&mut self, key: &Q) -> Option<&mut V> {
        let addr = key.address();
        self.table.get_mut(identity_hash(addr), |k| k.address() == addr)
    }

    pub fn contains_key<Q: Address + ?Sized>(&self, key: &Q) -> bool {
        let addr = key.address();
        self.table
            .find(identity_hash(addr), |k| k.address() == addr)
            .is_some()
    }

    /// Stores `value` under `key`, replacing and returning any value
    /// already stored for the same address. The key already in the table
    /// is kept in that case and `key` is dropped.
    pub fn put(&mut self, key: P, value: V) -> Result<Option<V>> {
        let key = IdentityKey::new(key);
        let addr = key.address();
        self.table
            .upsert(identity_hash(addr), key, value, |k| k.address() == addr)
    }

    /// Stores `value` only if no entry exists for the key's address, and
    /// returns whichever value ends up stored.
    pub fn put_if_absent(&mut self, key: P, value: V) -> Result<&mut V> {
        let key = IdentityKey::new(key);
        let addr = key.address();
        self.table
            .insert_if_absent(identity_hash(addr), key, value, |k| k.address() == addr)
    }

    /// Removes the entry for the key's address and hands back the stored
    /// key and value.
    pub fn remove<Q: Address + ?Sized>(&mut self, key: &Q) -> Option<(P, V)> {
        let addr = key.address();
        self.table
            .remove(identity_hash(addr), |k| k.address() == addr)
            .map(|(k, v)| (k.into_inner(), v))
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<P: Address, V> Default for IdentityTable<P, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Address, V: fmt::Debug> fmt::Debug for IdentityTable<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.table.iter()).finish()
    }
}
