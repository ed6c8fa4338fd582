//! Caller-visible error types.
//!
//! The engine's error taxonomy is narrow: the only runtime-recoverable
//! failure is a backing store that never acknowledges an exchange.
//! Protocol violations (misaligned request addresses, short store
//! payloads, out-of-range backing exchanges) indicate a caller or
//! backing-store bug and fail loudly via assertions instead of being
//! surfaced as `Err` values.

use thiserror::Error;

/// Errors reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The backing store withheld readiness for the configured number of
    /// consecutive ticks while a burst was in flight.
    ///
    /// No data is fabricated: the request remains unanswered and the
    /// in-flight burst is left where it stalled.
    #[error("backing store unresponsive for {ticks} ticks while servicing line {addr:#x}")]
    BackingStoreTimeout {
        /// Line address of the request being serviced.
        addr: u64,
        /// Consecutive stalled ticks observed before giving up.
        ticks: u64,
    },
}
