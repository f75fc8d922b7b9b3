//! IntTable: values keyed by `i32`, where the key is its own hash.

use crate::chain_table::{self, ChainTable};
use crate::error::Result;
use core::fmt;
use core::iter::FusedIterator;

#[inline]
fn int_hash(key: i32) -> u32 {
    key as u32
}

/// Maps `i32` keys to values.
///
/// Keys are placed by their own bit pattern, so sequential keys fill
/// sequential buckets. Iteration and [`IntTable::export_keys`] follow
/// bucket order, then chain order within a bucket; no other order is
/// guaranteed.
pub struct IntTable<V> {
    table: ChainTable<i32, V>,
}

impl<V> IntTable<V> {
    /// Creates a table with 64 buckets.
    pub fn new() -> Self {
        Self {
            table: ChainTable::new(),
        }
    }

    /// Creates a table with at least `capacity` buckets (a power of two,
    /// minimum 16, maximum 2^29).
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

    pub fn get(&self, key: i32) -> Option<&V> {
        self.table.get(int_hash(key), |&k| k == key)
    }

    pub fn get_mut(&mut self, key: i32) -> Option<&mut V> {
        self.table.get_mut(int_hash(key), |&k| k == key)
    }

    pub fn contains_key(&self, key: i32) -> bool {
        self.table.find(int_hash(key), |&k| k == key).is_some()
    }

    /// Stores `value` under `key` and returns the value it replaced.
    ///
    /// Fails with [`TableError::CapacityExhausted`](crate::TableError) only
    /// when a new key arrives after the table has stopped growing and used
    /// up its overload allowance. The table is unchanged in that case.
    pub fn put(&mut self, key: i32, value: V) -> Result<Option<V>> {
        self.table.upsert(int_hash(key), key, value, |&k| k == key)
    }

    /// Stores `value` only if `key` is absent. Returns the stored value,
    /// which is the existing one when the key was already present.
    pub fn put_if_absent(&mut self, key: i32, value: V) -> Result<&mut V> {
        self.table.insert_if_absent(int_hash(key), key, value, |&k| k == key)
    }

    pub fn remove(&mut self, key: i32) -> Option<V> {
        self.table.remove(int_hash(key), |&k| k == key).map(|(_, v)| v)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Every present key, exactly once, in iteration order.
    pub fn export_keys(&self) -> Box<[i32]> {
        self.table.iter().map(|(&k, _)| k).collect()
    }

    pub fn iter(&self) -> IntTableIter<'_, V> {
        IntTableIter {
            inner: self.table.iter(),
        }
    }
}

impl<V> Default for IntTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for IntTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(key, &value)` pairs of an `IntTable`.
pub struct IntTableIter<'a, V> {
    inner: chain_table::Iter<'a, i32, V>,
}

impl<'a, V> Iterator for IntTableIter<'a, V> {
    type Item = (i32, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IntTableIter<'_, V> {}
impl<V> FusedIterator for IntTableIter<'_, V> {}

impl<'a, V> IntoIterator for &'a IntTable<V> {
    type Item = (i32, &'a V);
    type IntoIter = IntTableIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
