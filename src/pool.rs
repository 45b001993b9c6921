//! Crate `pool` implements the recyclable typed-array pool spec.md 4.B
//! names: cell masks are acquired and released in strict LIFO order per
//! search subtree (spec.md section 5), so a free-list keyed by buffer
//! length is enough — there is never a need to coalesce or compact.

/// Handle returned by [`Pool::acquire`]. Opaque to callers; only the pool
/// that issued it can resolve it back to a buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Handle(usize);

struct Slot {
    buf: Vec<u64>,
    live: bool,
}

/// A per-board pool of zeroed `u64` buffers, reused across search
/// snapshots. `elementWidth` in the spec's contract is folded into the
/// buffer length the caller requests: a pool buffer is always a flat
/// `[u64]`, and narrower element widths are the caller's view into it.
#[derive(Default)]
pub struct Pool {
    slots: Vec<Slot>,
    free_by_len: std::collections::HashMap<usize, Vec<usize>>,
}

impl Pool {
    pub fn new() -> Pool {
        Pool::default()
    }

    /// Returns a handle to an all-zero buffer of `len` `u64` words. Reuses
    /// a released buffer of the same length if one is free, otherwise
    /// allocates fresh. The returned buffer is always zeroed regardless
    /// of which path produced it.
    pub fn acquire(&mut self, len: usize) -> Handle {
        if let Some(idx) = self.free_by_len.get_mut(&len).and_then(|v| v.pop()) {
            let slot = &mut self.slots[idx];
            debug_assert!(!slot.live);
            for word in slot.buf.iter_mut() {
                *word = 0;
            }
            slot.live = true;
            return Handle(idx);
        }
        self.slots.push(Slot {
            buf: vec![0u64; len],
            live: true,
        });
        Handle(self.slots.len() - 1)
    }

    /// Returns the handle's buffer to the free list. Panics (a bug, not a
    /// recoverable error) on double-release, matching the spec's
    /// `InternalInvariant` handling.
    pub fn release(&mut self, handle: Handle) {
        let slot = &mut self.slots[handle.0];
        assert!(slot.live, "pool: double release of handle {:?}", handle);
        slot.live = false;
        self.free_by_len.entry(slot.buf.len()).or_default().push(handle.0);
    }

    pub fn view(&self, handle: Handle) -> &[u64] {
        let slot = &self.slots[handle.0];
        debug_assert!(slot.live);
        &slot.buf
    }

    pub fn view_mut(&mut self, handle: Handle) -> &mut [u64] {
        let slot = &mut self.slots[handle.0];
        debug_assert!(slot.live);
        &mut slot.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_returns_zeroed_buffer() {
        let mut pool = Pool::new();
        let h = pool.acquire(4);
        assert_eq!(pool.view(h), &[0, 0, 0, 0]);
    }

    #[test]
    fn released_buffer_is_reused_and_rezeroed() {
        let mut pool = Pool::new();
        let h1 = pool.acquire(2);
        pool.view_mut(h1)[0] = 42;
        pool.release(h1);
        let h2 = pool.acquire(2);
        assert_eq!(h1, h2);
        assert_eq!(pool.view(h2), &[0, 0]);
    }

    #[test]
    #[should_panic(expected = "double release")]
    fn double_release_panics() {
        let mut pool = Pool::new();
        let h = pool.acquire(1);
        pool.release(h);
        pool.release(h);
    }
}
