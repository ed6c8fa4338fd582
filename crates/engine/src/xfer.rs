//! Backing-store transfer engine.
//!
//! Drives burst exchanges with the backing store for fills and
//! write-backs: one line is `line_bytes / 4` sequentially addressed
//! 32-bit word exchanges, little-endian, at most one exchange attempt
//! per tick. The engine holds at most one burst and has no retry logic
//! of its own; a refused exchange is simply re-offered on the next tick.
//!
//! Ordering between a victim write-back and the subsequent fill is the
//! controller's responsibility: it starts the fill burst only after the
//! write-back burst has fully completed.

use tracing::{debug, trace};

use crate::backing::BackingStore;

/// Size of one transfer word in bytes.
pub const WORD_BYTES: usize = 4;

/// Direction of a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Fill: backing store to line buffer.
    Read,
    /// Write-back: line buffer to backing store.
    Write,
}

/// Outcome of one [`TransferEngine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// No burst in flight.
    Idle,
    /// The backing store refused the exchange; nothing moved.
    Stalled,
    /// One word was exchanged; the burst continues.
    Advanced,
    /// One word was exchanged and the burst is complete.
    Done,
}

/// One in-flight burst.
#[derive(Debug)]
struct Burst {
    dir: Direction,
    line_addr: u64,
    cursor: usize,
    buf: Vec<u8>,
}

/// Word-at-a-time burst engine.
#[derive(Debug)]
pub struct TransferEngine {
    line_bytes: usize,
    burst: Option<Burst>,
}

impl TransferEngine {
    /// Creates an idle engine for `line_bytes`-byte lines.
    ///
    /// # Panics
    ///
    /// Panics if `line_bytes` is not a whole number of transfer words.
    pub fn new(line_bytes: usize) -> Self {
        assert!(
            line_bytes % WORD_BYTES == 0,
            "line size must be a multiple of the transfer word"
        );
        Self {
            line_bytes,
            burst: None,
        }
    }

    /// Whether no burst is in flight.
    pub fn idle(&self) -> bool {
        self.burst.is_none()
    }

    /// Starts a write-back burst of `line` to `line_addr`.
    ///
    /// # Panics
    ///
    /// Panics if a burst is already in flight or `line` is not exactly
    /// one line long.
    pub fn begin_writeback(&mut self, line_addr: u64, line: &[u8]) {
        assert!(self.burst.is_none(), "burst already in flight");
        assert_eq!(line.len(), self.line_bytes, "write-back needs a full line");
        debug!(addr = format_args!("{line_addr:#x}"), "begin write-back burst");
        self.burst = Some(Burst {
            dir: Direction::Write,
            line_addr,
            cursor: 0,
            buf: line.to_vec(),
        });
    }

    /// Starts a fill burst from `line_addr` into a fresh line buffer.
    ///
    /// # Panics
    ///
    /// Panics if a burst is already in flight.
    pub fn begin_fill(&mut self, line_addr: u64) {
        assert!(self.burst.is_none(), "burst already in flight");
        debug!(addr = format_args!("{line_addr:#x}"), "begin fill burst");
        self.burst = Some(Burst {
            dir: Direction::Read,
            line_addr,
            cursor: 0,
            buf: vec![0; self.line_bytes],
        });
    }

    /// Offers the next word exchange to the backing store.
    ///
    /// At most one word moves per call. A completed burst stays parked
    /// until [`TransferEngine::finish`] collects it.
    pub fn step<B: BackingStore>(&mut self, backing: &mut B) -> Progress {
        let words = self.line_bytes / WORD_BYTES;
        let Some(burst) = self.burst.as_mut() else {
            return Progress::Idle;
        };

        let addr = burst.line_addr + (burst.cursor * WORD_BYTES) as u64;
        let span = burst.cursor * WORD_BYTES..(burst.cursor + 1) * WORD_BYTES;
        let exchanged = match burst.dir {
            Direction::Write => {
                let mut bytes = [0u8; WORD_BYTES];
                bytes.copy_from_slice(&burst.buf[span]);
                backing.write_word(addr, u32::from_le_bytes(bytes)).is_some()
            }
            Direction::Read => match backing.read_word(addr) {
                Some(word) => {
                    burst.buf[span].copy_from_slice(&word.to_le_bytes());
                    true
                }
                None => false,
            },
        };

        if !exchanged {
            trace!(addr = format_args!("{addr:#x}"), "exchange refused");
            return Progress::Stalled;
        }

        burst.cursor += 1;
        if burst.cursor == words {
            debug!(
                addr = format_args!("{:#x}", burst.line_addr),
                dir = ?burst.dir,
                "burst complete"
            );
            Progress::Done
        } else {
            Progress::Advanced
        }
    }

    /// Collects a completed burst's line buffer and returns the engine
    /// to idle. For write-backs the buffer is the victim data already
    /// persisted and can be discarded.
    ///
    /// # Panics
    ///
    /// Panics if no burst is in flight or the burst is unfinished.
    pub fn finish(&mut self) -> Vec<u8> {
        let Some(burst) = self.burst.take() else {
            panic!("finish with no burst in flight");
        };
        assert_eq!(
            burst.cursor * WORD_BYTES,
            self.line_bytes,
            "finish before the burst completed"
        );
        burst.buf
    }
}
