//! Set-associative write-back L2 cache controller model.
//!
//! This crate implements a tick-accurate software model of an L2 cache
//! controller with the following:
//! 1. **Line store:** Per-way data, tag, valid, and dirty state for every set.
//! 2. **Replacement:** LRU (plus PLRU and FIFO) victim tracking with
//!    first-fill-before-evict preference for invalid ways.
//! 3. **Transfers:** Word-at-a-time burst fills and write-backs over a
//!    ready/acknowledge backing-store handshake.
//! 4. **Controller:** An explicit finite-state machine servicing one
//!    load/store request at a time, with masked stores and strict
//!    write-back-before-fill ordering.
//! 5. **Ambient:** Serde configuration, statistics, and tracing events.

/// Backing-store handshake trait and the in-memory `Ram` store.
pub mod backing;
/// Request/response channel types and the byte-mask merge.
pub mod channel;
/// Configuration structures, defaults, and derived geometry.
pub mod config;
/// The request/response controller state machine.
pub mod controller;
/// Caller-visible error types.
pub mod error;
/// Replacement trackers (LRU, PLRU, FIFO).
pub mod replacement;
/// Behavioral statistics counters.
pub mod stats;
/// Physical line storage (tags, flags, data arena).
pub mod store;
/// Burst transfer engine for fills and write-backs.
pub mod xfer;

/// Word-granular backing-store handshake; implement this to put the cache
/// in front of real storage.
pub use crate::backing::{BackingStore, Ram};
/// Request/response channel vocabulary.
pub use crate::channel::{Op, Request, Requester, Response, Status};
/// Root configuration type; use `CacheConfig::default()` or deserialize
/// from JSON.
pub use crate::config::CacheConfig;
/// The controller; construct with `CacheController::new` and drive with
/// `offer`/`tick`/`take_response` or `submit`.
pub use crate::controller::CacheController;
/// Errors surfaced by the `submit` driver.
pub use crate::error::CacheError;
