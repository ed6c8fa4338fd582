//! Replacement tracking and victim selection.
//!
//! Implements per-set recency bookkeeping for the controller's
//! first-fill-before-evict policy.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (the verified contract).
//! - `Plru`: Pseudo-LRU (usage bits).
//! - `Fifo`: First-In, First-Out (round-robin).

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Pseudo-LRU (usage-bit) replacement policy.
pub mod plru;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use plru::PlruPolicy;

use crate::config::ReplacementPolicy as PolicyKind;

/// Trait for replacement trackers.
///
/// Trackers own per-set recency state, independent across sets. The
/// controller calls [`ReplacementPolicy::touch`] exactly once per
/// completed request (hit or post-fill) and [`ReplacementPolicy::victim`]
/// once per miss.
pub trait ReplacementPolicy: Send + Sync {
    /// Marks a way most-recently-used within its set.
    fn touch(&mut self, set: usize, way: usize);

    /// The policy's own eviction choice for a fully occupied set.
    fn evict(&mut self, set: usize) -> usize;

    /// Selects the way to reclaim for a miss.
    ///
    /// Any invalid way is reclaimed before a valid line is sacrificed;
    /// only a fully occupied set falls through to the policy's eviction
    /// choice. `valid` is indexed by way.
    fn victim(&mut self, set: usize, valid: &[bool]) -> usize {
        valid
            .iter()
            .position(|v| !*v)
            .map_or_else(|| self.evict(set), |way| way)
    }
}

/// Constructs the tracker selected by the configuration.
pub fn from_kind(kind: PolicyKind, sets: usize, ways: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Lru => Box::new(LruPolicy::new(sets, ways)),
        PolicyKind::Plru => Box::new(PlruPolicy::new(sets, ways)),
        PolicyKind::Fifo => Box::new(FifoPolicy::new(sets, ways)),
    }
}
