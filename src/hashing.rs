//! Hash capability: key -> `u64` through the map's `BuildHasher`, and the
//! reduction of that hash onto a bucket index.

use core::hash::{BuildHasher, Hash};

/// Hash `q` with the map's hasher. Equal keys must hash equal; the map
/// relies on `K: Hash + Eq` upholding that contract.
#[inline]
pub(crate) fn make_hash<S, Q>(hasher: &S, q: &Q) -> u64
where
    S: BuildHasher,
    Q: ?Sized + Hash,
{
    hasher.hash_one(q)
}

/// Reduce a hash into `[0, bucket_count)`. The hash is unsigned, so every
/// bit pattern (including ones with the top bit set) lands in range.
#[inline]
pub(crate) fn index_for(hash: u64, bucket_count: usize) -> usize {
    debug_assert!(bucket_count >= 1, "bucket_count must be positive");
    (hash % bucket_count as u64) as usize
}
