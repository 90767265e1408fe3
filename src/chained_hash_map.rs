//! ChainedHashMap: separate-chaining map with load-factor driven doubling.

use crate::bucket::{Bucket, Entry};
use crate::bucket_array::BucketArray;
use crate::config::{ConfigError, MapConfig};
use crate::hashing::make_hash;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// A hash map that resolves collisions by chaining entries inside buckets.
///
/// Before every insertion the map compares `len / bucket_count` with its
/// maximum load factor; once the threshold is reached the bucket count
/// doubles and every entry is redistributed. The check runs before the key
/// lookup, so overwriting an existing key at the threshold grows the table
/// too. The map never shrinks.
///
/// Each entry caches its `u64` hash, so `K: Hash` runs once per insertion
/// and never during a rehash.
pub struct ChainedHashMap<K, V, S = RandomState> {
    hasher: S,
    buckets: BucketArray<K, V>,
    len: usize,
    max_load_factor: f64,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainedHashMap<K, V> {
    /// Ten buckets, maximum load factor 1.0, `RandomState` hashing.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_config(config: MapConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, S> Default for ChainedHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(MapConfig::default(), hasher)
    }

    /// Rejects a zero bucket count and any max load factor that is not a
    /// finite positive number.
    pub fn with_config_and_hasher(config: MapConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate().map_err(|e| {
            log::warn!("rejecting map configuration {:?}: {}", config, e);
            e
        })?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: MapConfig, hasher: S) -> Self {
        log::debug!(
            "new chained map: {} buckets, max load factor {}",
            config.initial_bucket_count,
            config.max_load_factor
        );
        Self {
            hasher,
            buckets: BucketArray::with_bucket_count(config.initial_bucket_count),
            len: 0,
            max_load_factor: config.max_load_factor,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Same as [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.bucket_count()
    }

    /// `len / bucket_count`.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.bucket_count() as f64
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    #[cfg(test)]
    pub(crate) fn buckets_for_test(&self) -> &BucketArray<K, V> {
        &self.buckets
    }

    /// Remove every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        let g = self.reentrancy.enter();
        let old = self.buckets.take_entries();
        self.len = 0;
        drop(g);
        // Destructors of K/V run outside the critical section.
        drop(old);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            entries: Default::default(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            buckets: self.buckets.iter_mut(),
            entries: Default::default(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, v)| v)
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Insert or overwrite. Returns the previous value when `key` was
    /// already present; the stored key is kept in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter();
        Self::grow_if_loaded(&mut self.buckets, self.len, self.max_load_factor);

        let hash = make_hash(&self.hasher, &key);
        let i = self.buckets.index_for(hash);
        let bucket = self.buckets.bucket_mut(i);
        match bucket.find(hash, &key) {
            Some(pos) => Some(core::mem::replace(&mut bucket.entry_mut(pos).value, value)),
            None => {
                bucket.append(Entry { key, value, hash });
                self.len += 1;
                log::trace!("new entry in bucket {} (len {})", i, self.len);
                None
            }
        }
    }

    /// Same as [`insert`](Self::insert).
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    /// Double the bucket count when the pre-insertion load has reached the
    /// threshold. Doubling halves the load, so one step always suffices.
    fn grow_if_loaded(buckets: &mut BucketArray<K, V>, len: usize, max_load_factor: f64) {
        let old_count = buckets.bucket_count();
        if (len as f64 / old_count as f64) < max_load_factor {
            return;
        }
        let new_count = old_count.saturating_mul(2);
        log::debug!(
            "rehash: {} -> {} buckets for {} entries",
            old_count,
            new_count,
            len
        );
        buckets.rebuild(new_count);
        debug_assert_eq!(buckets.entry_count(), len);
    }

    fn locate<Q>(&self, q: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = make_hash(&self.hasher, q);
        let i = self.buckets.index_for(hash);
        self.buckets.bucket(i).find(hash, q).map(|pos| (i, pos))
    }

    /// Only the bucket `q` hashes to is scanned.
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let (i, pos) = self.locate(q)?;
        let e = self.buckets.bucket(i).entry(pos);
        Some((&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let (i, pos) = self.locate(q)?;
        Some(&mut self.buckets.bucket_mut(i).entry_mut(pos).value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// Returns true if an entry was removed. Never shrinks the table.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        // The removed pair is dropped here, after the guard is released.
        self.remove_entry(q).is_some()
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let (i, pos) = self.locate(q)?;
        let entry = self.buckets.bucket_mut(i).remove_at(pos);
        self.len -= 1;
        log::trace!("removed entry from bucket {} (len {})", i, self.len);
        Some((entry.key, entry.value))
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Bucket<K, V>>,
    entries: core::slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.entries.next() {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            self.entries = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)` in bucket order.
pub struct IterMut<'a, K, V> {
    buckets: core::slice::IterMut<'a, Bucket<K, V>>,
    entries: core::slice::IterMut<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.entries.next() {
                self.remaining -= 1;
                return Some((&e.key, &mut e.value));
            }
            self.entries = self.buckets.next()?.iter_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over `(K, V)`.
pub struct IntoIter<K, V> {
    buckets: std::vec::IntoIter<Bucket<K, V>>,
    entries: std::vec::IntoIter<Entry<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.entries.next() {
                self.remaining -= 1;
                return Some((e.key, e.value));
            }
            self.entries = self.buckets.next()?.into_entries();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for ChainedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.len,
            buckets: self.buckets.into_buckets(),
            entries: Default::default(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
