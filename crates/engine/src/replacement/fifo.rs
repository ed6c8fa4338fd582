//! First-In, First-Out (FIFO) replacement.
//!
//! Evicts the oldest line in a set regardless of how recently it was
//! accessed, operating as a per-set round-robin pointer. Cheapest
//! bookkeeping of the available policies; weak under strong temporal
//! locality.

use super::ReplacementPolicy;

/// FIFO tracker state.
#[derive(Debug)]
pub struct FifoPolicy {
    /// Next way to reclaim, per set.
    next_way: Vec<usize>,
    ways: usize,
}

impl FifoPolicy {
    /// Creates a tracker for `sets` sets of `ways` ways.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            next_way: vec![0; sets],
            ways,
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    /// Advances the pointer past a way that was just (re)filled.
    ///
    /// Touching a way that is not at the pointer changes nothing: FIFO
    /// ignores recency by construction.
    fn touch(&mut self, set: usize, way: usize) {
        if self.next_way[set] == way {
            self.next_way[set] = (way + 1) % self.ways;
        }
    }

    /// Returns the current round-robin pointer for the set.
    fn evict(&mut self, set: usize) -> usize {
        self.next_way[set]
    }
}
