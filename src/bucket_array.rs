//! BucketArray: the fixed-length bucket storage and its rebuild-at-new-size.

use crate::bucket::Bucket;
use crate::hashing::index_for;

#[derive(Debug)]
pub(crate) struct BucketArray<K, V> {
    buckets: Vec<Bucket<K, V>>,
}

fn empty_buckets<K, V>(bucket_count: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(bucket_count);
    buckets.resize_with(bucket_count, Bucket::new);
    buckets
}

impl<K, V> BucketArray<K, V> {
    /// `bucket_count` must be at least 1; `MapConfig::validate` enforces it
    /// before any array is built.
    pub(crate) fn with_bucket_count(bucket_count: usize) -> Self {
        debug_assert!(bucket_count >= 1);
        Self {
            buckets: empty_buckets(bucket_count),
        }
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn index_for(&self, hash: u64) -> usize {
        index_for(hash, self.bucket_count())
    }

    pub(crate) fn bucket(&self, index: usize) -> &Bucket<K, V> {
        &self.buckets[index]
    }

    pub(crate) fn bucket_mut(&mut self, index: usize) -> &mut Bucket<K, V> {
        &mut self.buckets[index]
    }

    /// Total entries across all buckets. O(bucket_count).
    pub(crate) fn entry_count(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Replace the storage with `new_bucket_count` empty buckets and move
    /// every entry to the bucket its cached hash reduces to under the new
    /// count. Never calls `K: Hash` or `K: Eq`.
    pub(crate) fn rebuild(&mut self, new_bucket_count: usize) {
        debug_assert!(new_bucket_count >= 1);
        let old = core::mem::replace(&mut self.buckets, empty_buckets(new_bucket_count));
        for bucket in old {
            for entry in bucket.into_entries() {
                let i = index_for(entry.hash, new_bucket_count);
                self.buckets[i].append(entry);
            }
        }
    }

    /// Empty every bucket, keeping the bucket count. Returns the old storage
    /// so the caller decides when the entries' destructors run.
    pub(crate) fn take_entries(&mut self) -> Vec<Bucket<K, V>> {
        let count = self.bucket_count();
        core::mem::replace(&mut self.buckets, empty_buckets(count))
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Bucket<K, V>> {
        self.buckets.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Bucket<K, V>> {
        self.buckets.iter_mut()
    }

    pub(crate) fn into_buckets(self) -> std::vec::IntoIter<Bucket<K, V>> {
        self.buckets.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::Entry;

    fn fill(arr: &mut BucketArray<u64, u64>, hashes: &[u64]) {
        for &h in hashes {
            let i = arr.index_for(h);
            arr.bucket_mut(i).append(Entry {
                key: h,
                value: h * 10,
                hash: h,
            });
        }
    }

    #[test]
    fn new_array_has_requested_empty_buckets() {
        let arr: BucketArray<u64, u64> = BucketArray::with_bucket_count(10);
        assert_eq!(arr.bucket_count(), 10);
        assert_eq!(arr.entry_count(), 0);
        assert!(arr.iter().all(|b| b.len() == 0));
    }

    /// Invariant: after rebuild, every entry sits at `hash % new_count` and
    /// no entry is lost or duplicated.
    #[test]
    fn rebuild_redistributes_by_new_count() {
        let hashes: Vec<u64> = (0..37).map(|i| i * 7 + 3).collect();
        let mut arr = BucketArray::with_bucket_count(4);
        fill(&mut arr, &hashes);
        assert_eq!(arr.entry_count(), hashes.len());

        arr.rebuild(8);
        assert_eq!(arr.bucket_count(), 8);
        assert_eq!(arr.entry_count(), hashes.len());
        for (i, bucket) in arr.iter().enumerate() {
            for e in bucket.iter() {
                assert_eq!((e.hash % 8) as usize, i);
                assert_eq!(e.value, e.key * 10);
            }
        }
        for &h in &hashes {
            let i = arr.index_for(h);
            assert!(arr.bucket(i).find(h, &h).is_some(), "lost {h}");
        }
    }

    #[test]
    fn take_entries_keeps_bucket_count() {
        let mut arr = BucketArray::with_bucket_count(5);
        fill(&mut arr, &[1, 2, 3, 6]);
        let old = arr.take_entries();
        assert_eq!(old.iter().map(Bucket::len).sum::<usize>(), 4);
        assert_eq!(arr.bucket_count(), 5);
        assert_eq!(arr.entry_count(), 0);
    }
}
