//! ContextTracker: fixed-length history of call sites and its content-addressed hash.

use iopredict_core::hashing;
use iopredict_core::types::{CallStackId, ContextHash};

/// Ring buffer of the last `capacity` call-stack ids.
///
/// The hash is always taken over the canonical oldest-to-newest order, starting
/// at the write cursor and wrapping, so two trackers with the same history hash
/// identically whatever their physical rotation.
#[derive(Debug, Clone)]
pub struct ContextTracker {
    ring: Vec<u64>,
    cursor: usize,
    /// Canonical-order buffer reused across observations.
    ordered: Vec<u64>,
    current: ContextHash,
    seed: u64,
}

impl ContextTracker {
    /// Create a tracker holding `context_size` call sites, all initially zero.
    ///
    /// A size of zero is treated as one.
    pub fn new(context_size: u32, seed: u64) -> Self {
        let capacity = context_size.max(1) as usize;
        Self {
            ring: vec![0; capacity],
            cursor: 0,
            ordered: vec![0; capacity],
            current: ContextHash::UNSET,
            seed,
        }
    }

    /// Push `call_stack` into the window and return the new context hash.
    pub fn observe(&mut self, call_stack: CallStackId) -> ContextHash {
        let capacity = self.ring.len();
        self.ring[self.cursor] = call_stack.get();
        self.cursor = (self.cursor + 1) % capacity;

        let (newer, older) = self.ring.split_at(self.cursor);
        let split = older.len();
        self.ordered[..split].copy_from_slice(older);
        self.ordered[split..].copy_from_slice(newer);

        self.current = hashing::context_hash(&self.ordered, self.seed);
        self.current
    }

    /// The window oldest-to-newest.
    pub fn canonical(&self) -> Vec<CallStackId> {
        let (newer, older) = self.ring.split_at(self.cursor);
        older
            .iter()
            .chain(newer.iter())
            .map(|&raw| CallStackId(raw))
            .collect()
    }

    /// Hash computed by the last `observe`, `UNSET` before the first one.
    pub fn current(&self) -> ContextHash {
        self.current
    }

    pub fn capacity(&self) -> usize {
        self.ring.len()
    }

    /// Heap bytes owned by the tracker.
    pub fn heap_bytes(&self) -> usize {
        (self.ring.capacity() + self.ordered.capacity()) * std::mem::size_of::<u64>()
    }
}
