//! Request/response controller.
//!
//! The top-level finite-state machine. It provides:
//! 1. **Admission:** One request in flight; acceptance only while idle.
//! 2. **Hit path:** Recency touch, masked store merge, immediate response.
//! 3. **Miss path:** Victim selection, dirty write-back strictly before
//!    the fill burst, clean install, post-fill store merge.
//! 4. **Driving:** A `tick` single-step and a `submit` convenience loop
//!    with an optional backing-store stall bound.
//!
//! Each tick performs exactly one unit of work: a lookup, one word
//! exchange attempt, or a return to idle. Hits never touch the transfer
//! engine.

use tracing::debug;

use crate::backing::BackingStore;
use crate::channel::{Op, Request, Response, Status, merge_masked};
use crate::config::{CacheConfig, Geometry};
use crate::error::CacheError;
use crate::replacement::{self, ReplacementPolicy};
use crate::stats::CacheStats;
use crate::store::LineStore;
use crate::xfer::{Progress, TransferEngine};

/// Controller state.
///
/// `EvictWriteback` and `Fill` are only entered on a miss; a dirty victim
/// forces the write-back to complete in full before any fill traffic, so
/// the victim's data is persisted before its way is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No request pending.
    Idle,
    /// A request was accepted; the set will be queried next tick.
    Lookup,
    /// Draining a dirty victim to the backing store.
    EvictWriteback,
    /// Fetching the requested line from the backing store.
    Fill,
    /// Response staged; returning to idle.
    Complete,
}

/// Set-associative write-back cache controller.
///
/// Owns the line store, the replacement tracker, the transfer engine,
/// and the backing store; none of them are externally visible except
/// through the request/response channel and the statistics counters.
pub struct CacheController<B: BackingStore> {
    geom: Geometry,
    store: LineStore,
    policy: Box<dyn ReplacementPolicy>,
    engine: TransferEngine,
    backing: B,
    state: State,
    pending: Option<Request>,
    victim_way: usize,
    response: Option<Response>,
    stall_limit: Option<u64>,
    stats: CacheStats,
}

impl<B: BackingStore> CacheController<B> {
    /// Creates a controller over `backing` with all ways invalid.
    pub fn new(config: &CacheConfig, backing: B) -> Self {
        let geom = config.geometry();
        Self {
            geom,
            store: LineStore::new(geom),
            policy: replacement::from_kind(config.policy, geom.sets, geom.ways),
            engine: TransferEngine::new(geom.line_bytes),
            backing,
            state: State::Idle,
            pending: None,
            victim_way: 0,
            response: None,
            stall_limit: config.stall_limit,
            stats: CacheStats::default(),
        }
    }

    /// Whether a new request would be accepted this tick.
    ///
    /// Asserted exactly while the controller is idle and the previous
    /// response has been collected.
    pub fn ready(&self) -> bool {
        self.state == State::Idle && self.response.is_none()
    }

    /// Offers a request; returns whether it was accepted.
    ///
    /// # Panics
    ///
    /// Panics on protocol violations: a non-line-aligned address, or a
    /// store payload that is not exactly one line. These are caller bugs,
    /// not runtime conditions.
    pub fn offer(&mut self, request: Request) -> bool {
        if !self.ready() {
            return false;
        }
        assert!(
            request.addr % self.geom.line_bytes as u64 == 0,
            "request address {:#x} is not line-aligned",
            request.addr
        );
        if request.op == Op::Store {
            assert_eq!(
                request.data.len(),
                self.geom.line_bytes,
                "store payload must be one full line"
            );
        }
        debug!(
            op = ?request.op,
            addr = format_args!("{:#x}", request.addr),
            "request accepted"
        );
        self.stats.requests += 1;
        self.pending = Some(request);
        self.state = State::Lookup;
        true
    }

    /// Advances the controller by one tick.
    ///
    /// Exactly one of: resolve the lookup, offer one word exchange to the
    /// backing store, or return from `Complete` to `Idle`.
    pub fn tick(&mut self) {
        self.stats.ticks += 1;
        match self.state {
            State::Idle => {}
            State::Lookup => self.lookup(),
            State::EvictWriteback => self.advance_writeback(),
            State::Fill => self.advance_fill(),
            State::Complete => self.state = State::Idle,
        }
    }

    /// Collects the staged response, if one is ready.
    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }

    /// Drives a request to completion: offers it, ticks until the
    /// response arrives, and drains the terminal state.
    ///
    /// When a stall bound is configured, a backing store that withholds
    /// readiness for that many consecutive ticks yields
    /// [`CacheError::BackingStoreTimeout`]; no data is fabricated and the
    /// burst is left where it stalled.
    ///
    /// # Panics
    ///
    /// Panics if called while another request is in flight.
    pub fn submit(&mut self, request: Request) -> Result<Response, CacheError> {
        let addr = request.addr;
        assert!(self.offer(request), "submit while a request is in flight");

        let mut stalled: u64 = 0;
        loop {
            let stalls_before = self.stats.stall_ticks;
            self.tick();
            if let Some(response) = self.take_response() {
                // Drain Complete back to Idle so the next offer succeeds.
                self.tick();
                return Ok(response);
            }
            if self.stats.stall_ticks > stalls_before {
                stalled += 1;
                if let Some(limit) = self.stall_limit {
                    if stalled >= limit {
                        return Err(CacheError::BackingStoreTimeout {
                            addr,
                            ticks: stalled,
                        });
                    }
                }
            } else {
                stalled = 0;
            }
        }
    }

    /// Behavioral counters for this controller.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Borrows the backing store.
    pub fn backing(&self) -> &B {
        &self.backing
    }

    /// Mutably borrows the backing store.
    pub fn backing_mut(&mut self) -> &mut B {
        &mut self.backing
    }

    fn lookup(&mut self) {
        let Some(request) = self.pending.take() else {
            self.state = State::Idle;
            return;
        };
        let set = self.geom.set_index(request.addr);
        let tag = self.geom.tag(request.addr);

        if let Some(way) = self.store.lookup(set, tag) {
            self.stats.hits += 1;
            self.policy.touch(set, way);
            if request.op == Op::Store {
                merge_masked(self.store.line_mut(set, way), &request.data, request.mask);
                self.store.mark_dirty(set, way);
            }
            debug!(set, way, "hit");
            self.stage_response(request, Status::Hit, set, way);
            return;
        }

        self.stats.misses += 1;
        let valid = self.store.valid_ways(set);
        let way = self.policy.victim(set, &valid[..self.geom.ways]);
        self.victim_way = way;

        let meta = self.store.meta(set, way);
        if meta.valid && meta.dirty {
            self.stats.writebacks += 1;
            let victim_addr = self.geom.line_addr(set, meta.tag);
            debug!(
                set,
                way,
                victim = format_args!("{victim_addr:#x}"),
                "miss, dirty victim"
            );
            self.engine
                .begin_writeback(victim_addr, self.store.line(set, way));
            self.state = State::EvictWriteback;
        } else {
            debug!(set, way, "miss, clean victim");
            self.engine.begin_fill(request.addr);
            self.state = State::Fill;
        }
        self.pending = Some(request);
    }

    fn advance_writeback(&mut self) {
        match self.engine.step(&mut self.backing) {
            Progress::Stalled => self.stats.stall_ticks += 1,
            Progress::Advanced => self.stats.words_written += 1,
            Progress::Done => {
                self.stats.words_written += 1;
                let _ = self.engine.finish();
                // Victim data is persisted; fill traffic may now begin.
                let Some(addr) = self.pending.as_ref().map(|r| r.addr) else {
                    self.state = State::Idle;
                    return;
                };
                self.engine.begin_fill(addr);
                self.state = State::Fill;
            }
            Progress::Idle => {}
        }
    }

    fn advance_fill(&mut self) {
        match self.engine.step(&mut self.backing) {
            Progress::Stalled => self.stats.stall_ticks += 1,
            Progress::Advanced => self.stats.words_read += 1,
            Progress::Done => {
                self.stats.words_read += 1;
                self.stats.fills += 1;
                let line = self.engine.finish();
                let Some(request) = self.pending.take() else {
                    self.state = State::Idle;
                    return;
                };
                let set = self.geom.set_index(request.addr);
                let tag = self.geom.tag(request.addr);
                let way = self.victim_way;

                self.store.install(set, way, tag, &line);
                self.policy.touch(set, way);
                if request.op == Op::Store {
                    merge_masked(self.store.line_mut(set, way), &request.data, request.mask);
                    self.store.mark_dirty(set, way);
                }
                self.stage_response(request, Status::Miss, set, way);
            }
            Progress::Idle => {}
        }
    }

    fn stage_response(&mut self, request: Request, status: Status, set: usize, way: usize) {
        self.response = Some(Response {
            status,
            requester: request.requester,
            op: request.op,
            update: request.op == Op::Store,
            way,
            data: self.store.line(set, way).to_vec(),
        });
        self.state = State::Complete;
    }
}
