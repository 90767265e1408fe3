//! Bucket: the chain of entries that share one bucket index.

use core::borrow::Borrow;

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

/// Entries in insertion order. Order carries no meaning for the map, but
/// removal keeps the remaining entries contiguous.
#[derive(Debug)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Position of the first entry whose key equals `q`. The cached hash is
    /// compared first so `Eq` only runs on likely matches.
    pub(crate) fn find<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries
            .iter()
            .position(|e| e.hash == hash && e.key.borrow() == q)
    }

    /// Caller guarantees the key is not already present.
    pub(crate) fn append(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    pub(crate) fn remove_at(&mut self, pos: usize) -> Entry<K, V> {
        self.entries.remove(pos)
    }

    /// Entry at a position returned by `find`. Panics if out of range.
    pub(crate) fn entry(&self, pos: usize) -> &Entry<K, V> {
        &self.entries[pos]
    }

    pub(crate) fn entry_mut(&mut self, pos: usize) -> &mut Entry<K, V> {
        &mut self.entries[pos]
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Entry<K, V>> {
        self.entries.iter_mut()
    }

    pub(crate) fn into_entries(self) -> std::vec::IntoIter<Entry<K, V>> {
        self.entries.into_iter()
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
