//! Physical line storage.
//!
//! This module owns the cache memory proper: per-way data, tag, valid and
//! dirty bits for every set. It provides:
//! 1. **Lookup:** Linear valid+tag scan within a set.
//! 2. **Access:** Borrowing a line's bytes and metadata by (set, way).
//! 3. **Install:** Overwriting a way with a freshly fetched clean line.
//!
//! The store never chooses ways and never evicts; victim selection and
//! write-back ordering belong to the controller and the replacement
//! tracker.

use crate::config::{Geometry, MAX_WAYS};

/// Per-line metadata: tag, validity, and dirty bit.
#[derive(Debug, Clone, Default)]
pub struct LineMeta {
    /// Line address bits above the set index.
    pub tag: u64,
    /// Whether the way holds a line at all.
    pub valid: bool,
    /// Whether the line was modified since it was filled.
    pub dirty: bool,
}

/// Preallocated storage for every (set, way) slot.
///
/// Metadata lives in a flat `Vec` indexed `set * ways + way`; line bytes
/// live in one flat arena sliced the same way. Nothing allocates after
/// construction.
#[derive(Debug)]
pub struct LineStore {
    geom: Geometry,
    meta: Vec<LineMeta>,
    data: Vec<u8>,
}

impl LineStore {
    /// Creates an empty store with all ways invalid.
    pub fn new(geom: Geometry) -> Self {
        let slots = geom.sets * geom.ways;
        Self {
            geom,
            meta: vec![LineMeta::default(); slots],
            data: vec![0; slots * geom.line_bytes],
        }
    }

    fn slot(&self, set: usize, way: usize) -> usize {
        debug_assert!(set < self.geom.sets && way < self.geom.ways);
        set * self.geom.ways + way
    }

    /// Finds the way holding `tag` in `set`, if any.
    pub fn lookup(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.geom.ways;
        (0..self.geom.ways).find(|&way| {
            let m = &self.meta[base + way];
            m.valid && m.tag == tag
        })
    }

    /// Metadata of one slot.
    pub fn meta(&self, set: usize, way: usize) -> &LineMeta {
        &self.meta[self.slot(set, way)]
    }

    /// Borrows a line's bytes.
    pub fn line(&self, set: usize, way: usize) -> &[u8] {
        let start = self.slot(set, way) * self.geom.line_bytes;
        &self.data[start..start + self.geom.line_bytes]
    }

    /// Mutably borrows a line's bytes.
    ///
    /// The caller is responsible for marking the line dirty when it
    /// modifies resident data.
    pub fn line_mut(&mut self, set: usize, way: usize) -> &mut [u8] {
        let start = self.slot(set, way) * self.geom.line_bytes;
        &mut self.data[start..start + self.geom.line_bytes]
    }

    /// Installs a freshly fetched line into a way, valid and clean.
    ///
    /// # Panics
    ///
    /// Panics if `line` is not exactly one line long.
    pub fn install(&mut self, set: usize, way: usize, tag: u64, line: &[u8]) {
        assert_eq!(
            line.len(),
            self.geom.line_bytes,
            "install requires one full line"
        );
        let slot = self.slot(set, way);
        self.meta[slot] = LineMeta {
            tag,
            valid: true,
            dirty: false,
        };
        let start = slot * self.geom.line_bytes;
        self.data[start..start + self.geom.line_bytes].copy_from_slice(line);
    }

    /// Marks a resident line modified.
    pub fn mark_dirty(&mut self, set: usize, way: usize) {
        let slot = self.slot(set, way);
        debug_assert!(self.meta[slot].valid, "dirty bit on an invalid way");
        self.meta[slot].dirty = true;
    }

    /// Validity of every way in a set, indexed by way.
    ///
    /// Returned as a fixed array so the miss path stays allocation-free;
    /// only the first `ways` entries are meaningful.
    pub fn valid_ways(&self, set: usize) -> [bool; MAX_WAYS] {
        let base = set * self.geom.ways;
        let mut valid = [false; MAX_WAYS];
        for (way, slot) in valid.iter_mut().enumerate().take(self.geom.ways) {
            *slot = self.meta[base + way].valid;
        }
        valid
    }
}
