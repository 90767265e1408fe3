//! Debug-only reentrancy detection for `ChainedHashMap`.
//!
//! Public map methods that run user code (`K: Hash`, `K: Eq`) hold a guard
//! for their whole critical section. A nested entry on the same map, for
//! example from an `Eq` impl that reads the map through a raw pointer while
//! a bucket is being probed, panics in debug builds. Release builds keep
//! only a zero-sized marker.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map depth tracker. `Send` but `!Sync` in every build profile, which
/// matches the map's contract: move it between threads, share it only
/// behind an external lock.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    _not_sync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            _not_sync: PhantomData,
        }
    }

    /// Enter a critical section. Debug builds panic if one is already open.
    #[inline]
    pub(crate) fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(
                d == 0,
                "reentrancy detected: ChainedHashMap accessed from within its own Hash/Eq call"
            );
            self.depth.set(d + 1);
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// Closes the critical section on drop.
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_sections_are_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter();
        }
        let _g = r.enter();
    }

    #[test]
    fn tracker_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<DebugReentrancy>();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_section_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g1 = r.enter();
            let _g2 = r.enter();
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }

    /// The guard of a panicking section is dropped during unwind, so the
    /// tracker is usable afterwards.
    #[cfg(debug_assertions)]
    #[test]
    fn depth_recovers_after_panic() {
        let r = DebugReentrancy::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g1 = r.enter();
            let _g2 = r.enter();
        }));
        let _g = r.enter();
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nesting_is_a_noop_in_release() {
        let r = DebugReentrancy::new();
        let _g1 = r.enter();
        let _g2 = r.enter();
    }
}
