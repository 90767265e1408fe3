//! chained-hashmap: a single-threaded hash map that resolves collisions by
//! separate chaining and grows by doubling when a load-factor threshold is
//! reached.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, verifiable chained table where each layer owns one
//!   invariant.
//! - Layers:
//!   - `hashing`: turns a key into a `u64` through the map's `BuildHasher`
//!     and reduces a hash onto a bucket index (`hash % bucket_count`, all
//!     unsigned).
//!   - `Bucket<K, V>`: ordered chain of entries sharing an index; linear
//!     find, append, order-preserving removal. No duplicate check.
//!   - `BucketArray<K, V>`: `bucket_count >= 1` buckets; rebuilds itself at
//!     a new count by moving every entry to its new index.
//!   - `ChainedHashMap<K, V, S>`: public API. Owns the array, the element
//!     count and the max load factor; enforces key uniqueness and decides
//!     when to rehash.
//!
//! Growth policy
//! - Before every insertion, if `len / bucket_count >= max_load_factor`,
//!   the bucket count doubles. The check precedes the key lookup, so an
//!   overwrite at the threshold grows the table as well.
//! - Doubling halves the load, so a single rehash always restores the
//!   bound; rehash is never re-entered.
//! - Removal never shrinks the table.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash computed at insertion. Rehash reduces
//!   the stored hash against the new count and never calls `K: Hash` or
//!   `K: Eq`, so it cannot unwind halfway through user code.
//! - Lookups compare the stored hash before calling `K: Eq`.
//!
//! Reentrancy policy
//! - Single-threaded: no internal synchronization. The map is `Send` (when
//!   its contents are) and `!Sync`; wrap it in a lock to share it.
//! - Public methods that call `K: Hash`/`K: Eq` hold a debug-only
//!   reentrancy guard. Re-entering the same map from those impls panics in
//!   debug builds and is a no-op check in release builds.
//! - Removed keys and values are dropped after the guard is released, so
//!   their `Drop` may use the map again.
//!
//! Errors
//! - Missing keys are `None`/`false`, never errors.
//! - Construction validates `MapConfig` and returns `ConfigError` for a zero
//!   bucket count or a non-finite or non-positive max load factor.
//! - Allocation failure aborts, as with any std collection.
//!
//! Logging
//! - Uses the `log` facade: `debug!` on construction and every rehash,
//!   `warn!` on a rejected configuration, `trace!` per entry insert/remove.

mod bucket;
mod bucket_array;
mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
mod hashing;
mod reentrancy;

// Public surface
pub use chained_hash_map::{ChainedHashMap, IntoIter, Iter, IterMut};
pub use config::{ConfigError, MapConfig, DEFAULT_BUCKET_COUNT, DEFAULT_MAX_LOAD_FACTOR};
