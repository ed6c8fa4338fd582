//! Recording mock backing store.
//!
//! Wraps a flat byte buffer with the word-exchange handshake and records
//! every accepted exchange in order, so tests can assert burst addressing
//! and write-back-before-fill ordering. Stalls can be injected (refuse
//! every Nth offer) and the store can be made permanently unresponsive
//! for timeout tests.

use l2sim_core::backing::BackingStore;

/// Direction of one recorded exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusDir {
    /// The cache read a word (fill traffic).
    Read,
    /// The cache wrote a word (write-back traffic).
    Write,
}

/// One accepted word exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusEvent {
    /// Absolute byte address of the word.
    pub addr: u64,
    /// Exchange direction.
    pub dir: BusDir,
    /// The word that moved.
    pub word: u32,
}

/// Backing store double with an exchange trace.
pub struct TraceStore {
    mem: Vec<u8>,
    base: u64,
    /// Every accepted exchange, in order.
    pub events: Vec<BusEvent>,
    stall_every: Option<u64>,
    offers: u64,
    dead: bool,
}

impl TraceStore {
    /// Creates `size` zeroed bytes mapped at `base`.
    pub fn new(size: usize, base: u64) -> Self {
        Self {
            mem: vec![0; size],
            base,
            events: Vec::new(),
            stall_every: None,
            offers: 0,
            dead: false,
        }
    }

    /// Refuses every `n`th exchange offer.
    pub fn with_stall_every(mut self, n: u64) -> Self {
        self.stall_every = Some(n);
        self
    }

    /// Never acknowledges any exchange.
    pub fn unresponsive(mut self) -> Self {
        self.dead = true;
        self
    }

    /// Flips responsiveness at runtime (e.g. to prove the hit path never
    /// consults the backing store).
    pub fn set_unresponsive(&mut self, dead: bool) {
        self.dead = dead;
    }

    /// Writes `image` at an offset from the base address.
    pub fn load(&mut self, image: &[u8], offset: usize) {
        self.mem[offset..offset + image.len()].copy_from_slice(image);
    }

    /// Borrows `len` bytes starting at absolute address `addr`.
    pub fn slice(&self, addr: u64, len: usize) -> &[u8] {
        let offset = (addr - self.base) as usize;
        &self.mem[offset..offset + len]
    }

    /// Recorded exchanges in one direction.
    pub fn events_in(&self, dir: BusDir) -> Vec<BusEvent> {
        self.events.iter().copied().filter(|e| e.dir == dir).collect()
    }

    /// Clears the exchange trace (the memory contents stay).
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn ready(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.offers += 1;
        match self.stall_every {
            Some(n) => self.offers % n != 0,
            None => true,
        }
    }

    fn offset_of(&self, addr: u64) -> usize {
        assert!(
            addr >= self.base && (addr - self.base) as usize + 4 <= self.mem.len(),
            "exchange at {addr:#x} outside mock range"
        );
        (addr - self.base) as usize
    }
}

impl BackingStore for TraceStore {
    fn read_word(&mut self, addr: u64) -> Option<u32> {
        if !self.ready() {
            return None;
        }
        let offset = self.offset_of(addr);
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.mem[offset..offset + 4]);
        let word = u32::from_le_bytes(bytes);
        self.events.push(BusEvent {
            addr,
            dir: BusDir::Read,
            word,
        });
        Some(word)
    }

    fn write_word(&mut self, addr: u64, word: u32) -> Option<()> {
        if !self.ready() {
            return None;
        }
        let offset = self.offset_of(addr);
        self.mem[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
        self.events.push(BusEvent {
            addr,
            dir: BusDir::Write,
            word,
        });
        Some(())
    }
}
