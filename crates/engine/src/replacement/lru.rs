//! Least Recently Used (LRU) replacement.
//!
//! Maintains one usage stack per set. A touched way moves to the top
//! (most-recently-used position); the bottom of the stack is the
//! eviction choice. With N ways, a line survives the next N-1 evictions
//! after being touched, which is exactly the ordering the controller's
//! external contract is tested against.

use super::ReplacementPolicy;

/// LRU tracker state.
#[derive(Debug)]
pub struct LruPolicy {
    /// One usage stack per set; index 0 is MRU, the last index is LRU.
    usage: Vec<Vec<usize>>,
}

impl LruPolicy {
    /// Creates a tracker for `sets` sets of `ways` ways.
    ///
    /// Initial order is way 0 most recent through way N-1 least recent;
    /// invalid-way preference makes the initial order irrelevant in
    /// practice.
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut usage = Vec::with_capacity(sets);
        for _ in 0..sets {
            usage.push((0..ways).collect());
        }
        Self { usage }
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Moves the touched way to the MRU position, shifting the rest down.
    fn touch(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&w| w == way) {
            let _ = stack.remove(pos);
        }
        stack.insert(0, way);
    }

    /// Returns the way at the bottom of the usage stack.
    fn evict(&mut self, set: usize) -> usize {
        self.usage[set].last().copied().unwrap_or(0)
    }
}
