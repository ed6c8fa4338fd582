//! Backing-store abstraction.
//!
//! This module defines the word-granular handshake between the transfer
//! engine and whatever sits behind the cache. It provides:
//! 1. **Trait:** One 32-bit word per exchange with an explicit
//!    ready/acknowledge signal (`None` = not ready this tick).
//! 2. **Ram:** An always-ready in-memory store mapped at a base address.
//!
//! A real block device, a test double, or a driver-backed store can all
//! satisfy the trait interchangeably; the engine re-offers a refused
//! exchange on the next tick and never reorders words within a burst.

/// Trait for synchronous word-granular backing stores.
///
/// An implementation returning `None` signals "not ready"; the caller
/// retries the identical exchange later. Implementations must never
/// acknowledge an exchange without actually performing it.
pub trait BackingStore: Send + Sync {
    /// Offers a read of the word at `addr`. Returns the data when the
    /// store accepts the exchange this tick.
    fn read_word(&mut self, addr: u64) -> Option<u32>;

    /// Offers a write of `word` to `addr`. Returns `Some(())` when the
    /// store accepts the exchange this tick.
    fn write_word(&mut self, addr: u64, word: u32) -> Option<()>;
}

/// Always-ready in-memory backing store.
///
/// A flat byte buffer mapped at `base`, word-addressed little-endian.
/// Exchanges outside the mapped range are a protocol violation (the
/// controller derives burst addresses from request and victim line
/// addresses, so an out-of-range word means a caller bug) and panic.
#[derive(Debug, Clone)]
pub struct Ram {
    data: Vec<u8>,
    base: u64,
}

impl Ram {
    /// Creates `size` bytes of zeroed storage mapped at `base`.
    pub fn new(size: usize, base: u64) -> Self {
        Self {
            data: vec![0; size],
            base,
        }
    }

    /// Loads a byte image at an offset from the base address.
    ///
    /// Bytes that would land past the end of the buffer are clipped.
    pub fn load(&mut self, image: &[u8], offset: usize) {
        if offset >= self.data.len() {
            return;
        }
        let end = (offset + image.len()).min(self.data.len());
        self.data[offset..end].copy_from_slice(&image[..end - offset]);
    }

    /// Borrows `len` bytes starting at absolute address `addr`.
    ///
    /// # Panics
    ///
    /// Panics if the range is not fully mapped.
    pub fn slice(&self, addr: u64, len: usize) -> &[u8] {
        let offset = self.offset_of(addr, len);
        &self.data[offset..offset + len]
    }

    /// Mapped size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store maps zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn offset_of(&self, addr: u64, len: usize) -> usize {
        assert!(
            addr >= self.base && (addr - self.base) as usize + len <= self.data.len(),
            "backing exchange at {addr:#x} outside mapped RAM"
        );
        (addr - self.base) as usize
    }
}

impl BackingStore for Ram {
    fn read_word(&mut self, addr: u64) -> Option<u32> {
        let offset = self.offset_of(addr, 4);
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[offset..offset + 4]);
        Some(u32::from_le_bytes(bytes))
    }

    fn write_word(&mut self, addr: u64, word: u32) -> Option<()> {
        let offset = self.offset_of(addr, 4);
        self.data[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
        Some(())
    }
}
