//! Pseudo-LRU (PLRU) replacement.
//!
//! Approximates LRU with one usage bit per way (a flattened form of the
//! classic tree encoding). Touching a way sets its bit; when every way's
//! bit is set, all but the touched way's are cleared. The eviction
//! choice is the lowest-indexed way with a clear bit. Much cheaper than
//! full LRU at the cost of occasional premature evictions.

use super::ReplacementPolicy;

/// PLRU tracker state.
#[derive(Debug)]
pub struct PlruPolicy {
    /// Usage-bit word per set.
    usage: Vec<u64>,
    ways: usize,
}

impl PlruPolicy {
    /// Creates a tracker for `sets` sets of `ways` ways.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            usage: vec![0; sets],
            ways,
        }
    }
}

impl ReplacementPolicy for PlruPolicy {
    /// Sets the touched way's usage bit, resetting the word when it
    /// saturates.
    fn touch(&mut self, set: usize, way: usize) {
        let mask = 1 << way;
        self.usage[set] |= mask;

        let all_ones = (1 << self.ways) - 1;
        if (self.usage[set] & all_ones) == all_ones {
            self.usage[set] = mask;
        }
    }

    /// Returns the lowest-indexed way whose usage bit is clear.
    fn evict(&mut self, set: usize) -> usize {
        for way in 0..self.ways {
            if (self.usage[set] >> way) & 1 == 0 {
                return way;
            }
        }
        0
    }
}
