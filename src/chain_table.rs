//! ChainTable: bucket-chained engine shared by `IntTable` and `IdentityTable`.
//!
//! Entries live in a `SlotMap` arena and are chained by slot key, so a
//! bucket head and every `next` link is a small `Copy` value. The arena
//! owns the free list; removal splices a slot out of its chain and frees
//! it. Callers pass the hash and an equality predicate, in the style of
//! `hashbrown::HashTable`; the engine itself never hashes a key.

use crate::error::{Result, TableError};
use crate::reentrancy::{ActiveOp, ChainOp};
use core::iter::FusedIterator;
use slotmap::{DefaultKey, SlotMap};

/// Largest bucket array a table will ever allocate.
pub const MAXIMUM_CAPACITY: usize = 1 << 29;
pub const MINIMUM_CAPACITY: usize = 16;
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug)]
struct Entry<K, V> {
    hash: u32,
    key: K,
    value: V,
    next: Option<DefaultKey>,
}

/// Bucket count a table starts with for a requested capacity.
#[inline]
pub fn capacity_for(requested: usize, max_capacity: usize) -> usize {
    if requested > max_capacity {
        max_capacity
    } else {
        requested.max(MINIMUM_CAPACITY).next_power_of_two()
    }
}

/// Entry count at which the next insert of a new key grows the table.
#[inline]
pub fn growth_threshold(capacity: usize) -> usize {
    capacity / 4 * 3
}

pub struct ChainTable<K, V> {
    buckets: Box<[Option<DefaultKey>]>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    threshold: usize,
    max_capacity: usize,
    active: ActiveOp,
}

impl<K, V> ChainTable<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_max_capacity(capacity, MAXIMUM_CAPACITY)
    }

    /// Like `with_capacity`, but growth stops at `max_capacity` buckets
    /// instead of `MAXIMUM_CAPACITY`.
    pub fn with_max_capacity(capacity: usize, max_capacity: usize) -> Self {
        debug_assert!(max_capacity.is_power_of_two() && max_capacity >= MINIMUM_CAPACITY);
        let capacity = capacity_for(capacity, max_capacity);
        Self {
            buckets: empty_buckets(capacity),
            slots: SlotMap::with_key(),
            threshold: growth_threshold(capacity),
            max_capacity,
            active: ActiveOp::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[cfg(any(test, feature = "bench_internal"))]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// True once growth has hit `max_capacity` and the threshold is pinned.
    pub fn at_ceiling(&self) -> bool {
        self.threshold == self.max_capacity - 1
    }

    #[inline]
    fn bucket_index(&self, hash: u32) -> usize {
        hash as usize & (self.buckets.len() - 1)
    }

    pub fn find<F>(&self, hash: u32, mut eq: F) -> Option<DefaultKey>
    where
        F: FnMut(&K) -> bool,
    {
        let _op = self.active.begin(ChainOp::Find);
        let mut cursor = self.buckets[self.bucket_index(hash)];
        while let Some(k) = cursor {
            let entry = &self.slots[k];
            if entry.hash == hash && eq(&entry.key) {
                return Some(k);
            }
            cursor = entry.next;
        }
        None
    }

    pub fn get<F>(&self, hash: u32, eq: F) -> Option<&V>
    where
        F: FnMut(&K) -> bool,
    {
        let k = self.find(hash, eq)?;
        self.slots.get(k).map(|e| &e.value)
    }

    pub fn get_mut<F>(&mut self, hash: u32, eq: F) -> Option<&mut V>
    where
        F: FnMut(&K) -> bool,
    {
        let k = self.find(hash, eq)?;
        self.slots.get_mut(k).map(|e| &mut e.value)
    }

    /// Links a new entry at the head of its bucket. The caller guarantees
    /// no entry for `key` is present.
    pub fn insert(&mut self, hash: u32, key: K, value: V) -> Result<DefaultKey> {
        if self.slots.len() >= self.threshold {
            self.grow()?;
        }
        let _op = self.active.begin(ChainOp::Insert);
        let index = self.bucket_index(hash);
        let next = self.buckets[index];
        let k = self.slots.insert(Entry {
            hash,
            key,
            value,
            next,
        });
        self.buckets[index] = Some(k);
        Ok(k)
    }

    /// Overwrites the value of a present key, or inserts a new entry.
    /// Returns the replaced value.
    pub fn upsert<F>(&mut self, hash: u32, key: K, value: V, eq: F) -> Result<Option<V>>
    where
        F: FnMut(&K) -> bool,
    {
        if let Some(k) = self.find(hash, eq) {
            let old = core::mem::replace(&mut self.slots[k].value, value);
            return Ok(Some(old));
        }
        self.insert(hash, key, value)?;
        Ok(None)
    }

    /// Returns the stored value for a present key untouched, or inserts
    /// `value` and returns it.
    pub fn insert_if_absent<F>(&mut self, hash: u32, key: K, value: V, eq: F) -> Result<&mut V>
    where
        F: FnMut(&K) -> bool,
    {
        let k = match self.find(hash, eq) {
            Some(k) => k,
            None => self.insert(hash, key, value)?,
        };
        Ok(&mut self.slots[k].value)
    }

    pub fn remove<F>(&mut self, hash: u32, mut eq: F) -> Option<(K, V)>
    where
        F: FnMut(&K) -> bool,
    {
        let _op = self.active.begin(ChainOp::Remove);
        let index = self.bucket_index(hash);
        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[index];
        while let Some(k) = cursor {
            let entry = &self.slots[k];
            let next = entry.next;
            if entry.hash == hash && eq(&entry.key) {
                match prev {
                    Some(p) => self.slots[p].next = next,
                    None => self.buckets[index] = next,
                }
                let entry = self.slots.remove(k)?;
                return Some((entry.key, entry.value));
            }
            prev = cursor;
            cursor = next;
        }
        None
    }

    /// Drops every entry and starts over with an empty bucket array of the
    /// same length. The old arena is dropped whole rather than drained.
    pub fn clear(&mut self) {
        let _op = self.active.begin(ChainOp::Clear);
        self.buckets = empty_buckets(self.buckets.len());
        self.slots = SlotMap::with_key();
    }

    fn grow(&mut self) -> Result<()> {
        let _op = self.active.begin(ChainOp::Grow);
        let size = self.slots.len();
        if size < self.threshold {
            return Ok(());
        }
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity << 1;
        if new_capacity > self.max_capacity {
            if self.at_ceiling() {
                log::error!(
                    "chain table capacity exhausted at {old_capacity} buckets ({size} entries)"
                );
                return Err(TableError::CapacityExhausted {
                    capacity: old_capacity,
                });
            }
            log::warn!(
                "chain table reached {old_capacity} buckets; accepting entries past the load factor"
            );
            self.threshold = self.max_capacity - 1;
            return Ok(());
        }

        let mask = new_capacity - 1;
        let mut buckets = empty_buckets(new_capacity);
        for i in (0..old_capacity).rev() {
            let mut cursor = self.buckets[i];
            while let Some(k) = cursor {
                let entry = &mut self.slots[k];
                cursor = entry.next;
                let index = entry.hash as usize & mask;
                entry.next = buckets[index];
                buckets[index] = Some(k);
            }
        }

        self.threshold = growth_threshold(new_capacity);
        // Publish the relinked array last.
        self.buckets = buckets;
        log::debug!(
            "chain table resized: {old_capacity} -> {new_capacity} buckets ({size} entries)"
        );
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: &self.buckets,
            slots: &self.slots,
            cursor: 0,
            current: None,
            remaining: self.slots.len(),
        }
    }
}

impl<K, V> Default for ChainTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_buckets(capacity: usize) -> Box<[Option<DefaultKey>]> {
    vec![None; capacity].into_boxed_slice()
}

/// Walks buckets left to right and each chain front to back, fetching the
/// next non-empty bucket only once the current chain is exhausted.
pub struct Iter<'a, K, V> {
    buckets: &'a [Option<DefaultKey>],
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    cursor: usize,
    current: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        loop {
            if let Some(k) = self.current {
                let entry = &slots[k];
                self.current = entry.next;
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            if self.cursor >= self.buckets.len() {
                return None;
            }
            self.current = self.buckets[self.cursor];
            self.cursor += 1;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
impl<K, V> ChainTable<K, V> {
    /// Walks every chain and checks placement and size accounting.
    pub(crate) fn assert_consistent(&self) {
        let mask = self.buckets.len() - 1;
        assert!(self.buckets.len().is_power_of_two());
        let mut reachable = 0;
        for (i, head) in self.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(k) = cursor {
                let entry = &self.slots[k];
                assert_eq!(entry.hash as usize & mask, i, "entry in wrong bucket");
                reachable += 1;
                cursor = entry.next;
            }
        }
        assert_eq!(reachable, self.slots.len());
    }
}
