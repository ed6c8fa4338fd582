//! Request and response channel types.
//!
//! This module defines the signal bundles exchanged with the controller:
//! 1. **Request:** Operation, line-aligned address, store payload and byte mask.
//! 2. **Response:** Hit/miss status, way used, resulting line contents.
//! 3. **Requester:** Opaque (unit, strand) tags echoed back untouched.
//!
//! One request is in flight at a time and every accepted request produces
//! exactly one response, in request order.

/// Cache operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Read one full line.
    Load,
    /// Merge masked bytes into one full line.
    Store,
}

/// Completion status of a serviced request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The line was already resident.
    Hit,
    /// The line was fetched from the backing store.
    Miss,
}

/// Opaque requester identity.
///
/// The controller never interprets these fields; they are echoed verbatim
/// in the response so a multi-unit caller can route completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requester {
    /// Requesting unit id.
    pub unit: u8,
    /// Requesting strand id within the unit.
    pub strand: u8,
}

/// One cache request.
///
/// `addr` must be line-aligned. For stores, `data` carries one full line
/// and `mask` selects which of its bytes are written (bit `i` governs
/// byte `i`; 1 = write, 0 = preserve). Loads carry no payload.
#[derive(Debug, Clone)]
pub struct Request {
    /// Operation kind.
    pub op: Op,
    /// Line-aligned byte address.
    pub addr: u64,
    /// Store payload; empty for loads.
    pub data: Vec<u8>,
    /// Store byte mask; ignored for loads.
    pub mask: u64,
    /// Opaque requester tags, echoed in the response.
    pub requester: Requester,
}

impl Request {
    /// Builds a load request for the line at `addr`.
    pub fn load(addr: u64) -> Self {
        Self {
            op: Op::Load,
            addr,
            data: Vec::new(),
            mask: 0,
            requester: Requester::default(),
        }
    }

    /// Builds a masked store request for the line at `addr`.
    pub fn store(addr: u64, data: Vec<u8>, mask: u64) -> Self {
        Self {
            op: Op::Store,
            addr,
            data,
            mask,
            requester: Requester::default(),
        }
    }

    /// Attaches requester tags.
    pub fn with_requester(mut self, requester: Requester) -> Self {
        self.requester = requester;
        self
    }
}

/// One cache response.
///
/// Carries the full resulting line contents: the line as fetched for
/// loads, or the post-merge line for stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Hit or miss.
    pub status: Status,
    /// Echoed requester tags.
    pub requester: Requester,
    /// Echoed operation kind.
    pub op: Op,
    /// True iff the request was a store (the line was modified).
    pub update: bool,
    /// The way the line occupies after this operation.
    pub way: usize,
    /// Full resulting line contents.
    pub data: Vec<u8>,
}

/// Merges `src` into `dst` under a byte mask.
///
/// Byte `i` of `dst` becomes `src[i]` when mask bit `i` is set and is
/// preserved otherwise. Both slices must be the same length (at most 64
/// bytes, one mask bit per byte).
///
/// # Panics
///
/// Panics if the slice lengths differ.
pub fn merge_masked(dst: &mut [u8], src: &[u8], mask: u64) {
    assert_eq!(
        dst.len(),
        src.len(),
        "masked merge requires equal-length lines"
    );
    for (i, byte) in dst.iter_mut().enumerate() {
        if (mask >> i) & 1 == 1 {
            *byte = src[i];
        }
    }
}
