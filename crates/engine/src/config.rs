//! Configuration for the cache engine.
//!
//! This module defines the structures and enums used to parameterize the
//! controller. It provides:
//! 1. **Defaults:** Baseline geometry constants (sets, ways, line size).
//! 2. **Structures:** `CacheConfig` and the derived, sanitized `Geometry`.
//! 3. **Enums:** Replacement policy selection.
//!
//! Configuration is supplied via JSON (e.g. from the CLI) or use
//! `CacheConfig::default()`.

use serde::Deserialize;

use crate::xfer::WORD_BYTES;

/// Default configuration constants for the cache engine.
///
/// These values define the baseline geometry when not explicitly
/// overridden in a configuration file. They match the observed hardware
/// configuration: 64-byte lines (one 512-bit transfer) and 2 ways.
pub mod defaults {
    /// Default number of sets (16 KiB total with the default ways and
    /// line size).
    pub const SETS: usize = 128;

    /// Default associativity (2 ways).
    pub const WAYS: usize = 2;

    /// Default cache line size in bytes.
    ///
    /// Matches the 512-bit backing-store transfer width (16 words of 4 bytes).
    pub const LINE_BYTES: usize = 64;

    /// Default bound on consecutive stalled ticks before `submit` reports
    /// a backing-store timeout.
    pub const STALL_LIMIT: u64 = 10_000;
}

/// Maximum line size in bytes.
///
/// The store byte mask is a single `u64` with one bit per line byte, so a
/// line can hold at most 64 bytes.
pub const MAX_LINE_BYTES: usize = 64;

/// Maximum associativity.
///
/// The response way field is two bits wide in the source hardware, so a
/// set holds at most 4 ways.
pub const MAX_WAYS: usize = 4;

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which way to evict when a new
/// line must be installed in a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the way that was accessed least recently. This is the
    /// policy the controller's external contract is verified against.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Pseudo-LRU (tree-based) replacement policy.
    ///
    /// Approximates LRU using per-set usage bits for lower hardware
    /// overhead.
    #[serde(alias = "Plru")]
    Plru,
    /// First In First Out replacement policy.
    ///
    /// Evicts the oldest line in the set (round-robin).
    #[serde(alias = "Fifo")]
    Fifo,
}

/// Cache engine configuration.
///
/// All fields have defaults, so a partial JSON document (or `{}`) is a
/// valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of sets.
    pub sets: usize,
    /// Associativity (ways per set); clamped to [`MAX_WAYS`].
    pub ways: usize,
    /// Line size in bytes; must be a multiple of the 4-byte transfer word
    /// and at most [`MAX_LINE_BYTES`].
    pub line_bytes: usize,
    /// Victim selection policy.
    pub policy: ReplacementPolicy,
    /// Bound on consecutive stalled ticks before `submit` gives up with a
    /// timeout error. `None` waits forever, matching the raw hardware
    /// handshake.
    pub stall_limit: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sets: defaults::SETS,
            ways: defaults::WAYS,
            line_bytes: defaults::LINE_BYTES,
            policy: ReplacementPolicy::default(),
            stall_limit: Some(defaults::STALL_LIMIT),
        }
    }
}

impl CacheConfig {
    /// Derives the sanitized geometry for this configuration.
    ///
    /// Zero-valued fields fall back to their defaults and the way count
    /// is clamped to [`MAX_WAYS`], mirroring how the rest of the engine
    /// guards against degenerate configs.
    ///
    /// # Panics
    ///
    /// Panics if `line_bytes` is not a multiple of the transfer word or
    /// exceeds [`MAX_LINE_BYTES`]; the byte mask cannot describe such a
    /// line.
    pub fn geometry(&self) -> Geometry {
        let sets = if self.sets == 0 { defaults::SETS } else { self.sets };
        let ways = if self.ways == 0 {
            1
        } else {
            self.ways.min(MAX_WAYS)
        };
        let line_bytes = if self.line_bytes == 0 {
            defaults::LINE_BYTES
        } else {
            self.line_bytes
        };
        assert!(
            line_bytes <= MAX_LINE_BYTES && line_bytes % WORD_BYTES == 0,
            "line_bytes {line_bytes} must be a multiple of {WORD_BYTES} and at most {MAX_LINE_BYTES}"
        );

        Geometry {
            sets,
            ways,
            line_bytes,
        }
    }
}

/// Sanitized cache geometry shared by the line store and the controller.
///
/// Addresses are plain byte addresses; a line address is the address with
/// the offset bits cleared. Set indexing and tag extraction use the same
/// divide/modulo scheme throughout the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Number of sets.
    pub sets: usize,
    /// Ways per set.
    pub ways: usize,
    /// Line size in bytes.
    pub line_bytes: usize,
}

impl Geometry {
    /// Returns the set index for a byte address.
    pub fn set_index(&self, addr: u64) -> usize {
        ((addr as usize) / self.line_bytes) % self.sets
    }

    /// Returns the tag for a byte address (line address bits above the
    /// set index).
    pub fn tag(&self, addr: u64) -> u64 {
        addr / (self.line_bytes * self.sets) as u64
    }

    /// Reconstructs the line byte address a (set, tag) pair maps to.
    ///
    /// Used to recover a victim's original address for write-back.
    pub fn line_addr(&self, set: usize, tag: u64) -> u64 {
        (tag * self.sets as u64 + set as u64) * self.line_bytes as u64
    }

    /// Number of word exchanges in one line burst.
    pub fn words_per_line(&self) -> usize {
        self.line_bytes / WORD_BYTES
    }
}
