//! Cache statistics collection and reporting.
//!
//! This module tracks behavioral counters for the engine. It provides:
//! 1. **Traffic:** Requests, hits, misses, and the derived hit rate.
//! 2. **Backing store:** Fill and write-back bursts and words moved.
//! 3. **Timing:** Total ticks and ticks lost to backing-store stalls.

/// Behavioral counters for one controller instance.
///
/// All counters are updated by the controller only; callers read them
/// through [`crate::controller::CacheController::stats`].
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Total ticks the controller has been stepped.
    pub ticks: u64,
    /// Requests accepted.
    pub requests: u64,
    /// Requests that hit a resident line.
    pub hits: u64,
    /// Requests that required a fill.
    pub misses: u64,
    /// Dirty victim lines written back before reuse.
    pub writebacks: u64,
    /// Lines filled from the backing store.
    pub fills: u64,
    /// Ticks on which the backing store withheld readiness.
    pub stall_ticks: u64,
    /// Words read from the backing store (fill traffic).
    pub words_read: u64,
    /// Words written to the backing store (write-back traffic).
    pub words_written: u64,
}

impl CacheStats {
    /// Fraction of requests that hit, in `[0, 1]`; zero when no requests
    /// have been serviced.
    pub fn hit_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.requests as f64
        }
    }

    /// Renders a human-readable summary block.
    pub fn report(&self) -> String {
        format!(
            "cache statistics\n\
             ----------------\n\
             ticks          {:>12}\n\
             requests       {:>12}\n\
             hits           {:>12}\n\
             misses         {:>12}\n\
             hit rate       {:>11.1}%\n\
             writebacks     {:>12}\n\
             fills          {:>12}\n\
             words read     {:>12}\n\
             words written  {:>12}\n\
             stall ticks    {:>12}",
            self.ticks,
            self.requests,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.writebacks,
            self.fills,
            self.words_read,
            self.words_written,
            self.stall_ticks,
        )
    }
}
