//! A hash table with a fixed number of buckets.
//!
//! Collisions are resolved by chaining: every bucket holds the records whose key hashes
//! into it, in insertion order. The table never grows, so a crowded table degrades
//! towards a linear scan.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use tracing::debug;

use crate::error::ContainerError;

/// A record that carries its own key.
pub trait Keyed {
    type Key: Eq + Hash;

    fn key(&self) -> &Self::Key;
}

pub struct ChainedHashTable<V: Keyed, S = RandomState> {
    buckets: Vec<Vec<V>>,
    hasher: S,
    len: usize,
}

impl<V: Keyed> ChainedHashTable<V> {
    pub fn new(bucket_count: usize) -> Self {
        Self::with_hasher(bucket_count, RandomState::new())
    }
}

impl<V: Keyed, S: BuildHasher> ChainedHashTable<V, S> {
    /// `bucket_count` is clamped to at least one bucket.
    pub fn with_hasher(bucket_count: usize, hasher: S) -> Self {
        let bucket_count = bucket_count.max(1);
        Self {
            buckets: (0..bucket_count).map(|_| Vec::new()).collect(),
            hasher,
            len: 0,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_of(&self, key: &V::Key) -> usize {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Appends `value` to the chain of its bucket.
    /// Fails without touching the table if a record with the same key is already stored.
    pub fn add_record(&mut self, value: V) -> Result<(), ContainerError> {
        let bucket = self.bucket_of(value.key());
        let chain = &mut self.buckets[bucket];

        if chain.iter().any(|record| record.key() == value.key()) {
            return Err(ContainerError::DuplicateRecord);
        }

        chain.push(value);
        self.len += 1;
        debug!(bucket, chain_len = chain.len(), "record added");
        Ok(())
    }

    pub fn get_record(&self, key: &V::Key) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|record| record.key() == key)
    }

    pub fn get_record_mut(&mut self, key: &V::Key) -> Option<&mut V> {
        let bucket = self.bucket_of(key);
        self.buckets[bucket]
            .iter_mut()
            .find(|record| record.key() == key)
    }

    pub fn contains_key(&self, key: &V::Key) -> bool {
        self.get_record(key).is_some()
    }

    /// Unlinks the record stored under `key` and hands it back; `None` if there was none.
    pub fn remove_record(&mut self, key: &V::Key) -> Option<V> {
        let bucket = self.bucket_of(key);
        let chain = &mut self.buckets[bucket];
        let position = chain.iter().position(|record| record.key() == key)?;

        self.len -= 1;
        Some(chain.remove(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.buckets.iter().flatten()
    }
}
