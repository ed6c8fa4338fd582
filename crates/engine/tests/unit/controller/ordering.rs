//! Write-back-before-fill ordering.
//!
//! For a miss that evicts a dirty line, the write-back burst to the
//! victim's address must complete in full before any read burst for the
//! new line begins; the victim's data would otherwise be lost.

use l2sim_core::{CacheController, Request};

use super::backing;
use crate::common::mocks::BusDir;
use crate::common::{pattern_line, set_stride, small_config};

#[test]
fn dirty_writeback_completes_before_the_fill_starts() {
    let config = small_config();
    let stride = set_stride(&config);
    let mut store = backing();
    store.load(&pattern_line(0x01, 64), 0);
    let mut cache = CacheController::new(&config, store);

    // Dirty one way, occupy the other, then force the dirty eviction.
    let dirty_line = pattern_line(0xd0, 64);
    let _ = cache
        .submit(Request::store(0, dirty_line.clone(), u64::MAX))
        .unwrap();
    let _ = cache.submit(Request::load(stride)).unwrap();
    cache.backing_mut().clear_events();

    let fill_addr = 2 * stride;
    let _ = cache.submit(Request::load(fill_addr)).unwrap();

    let events = &cache.backing().events;
    let last_write = events
        .iter()
        .rposition(|e| e.dir == BusDir::Write)
        .expect("eviction must produce write traffic");
    let first_read = events
        .iter()
        .position(|e| e.dir == BusDir::Read)
        .expect("miss must produce fill traffic");
    assert!(
        last_write < first_read,
        "write-back must fully precede the fill burst"
    );

    // The write burst covers the victim's 16 word addresses in order and
    // carries the last-stored data.
    let writes = cache.backing().events_in(BusDir::Write);
    assert_eq!(writes.len(), 16);
    for (i, event) in writes.iter().enumerate() {
        assert_eq!(event.addr, (i * 4) as u64);
    }
    assert_eq!(cache.backing().slice(0, 64), &dirty_line[..]);

    // The fill burst covers the requested line's addresses.
    let reads = cache.backing().events_in(BusDir::Read);
    assert_eq!(reads.len(), 16);
    for (i, event) in reads.iter().enumerate() {
        assert_eq!(event.addr, fill_addr + (i * 4) as u64);
    }
}

#[test]
fn writeback_then_fill_takes_one_word_per_tick() {
    let config = small_config();
    let stride = set_stride(&config);
    let mut cache = CacheController::new(&config, backing());

    let _ = cache
        .submit(Request::store(0, vec![0xffu8; 64], u64::MAX))
        .unwrap();
    let _ = cache.submit(Request::load(stride)).unwrap();

    // Lookup (1) + write-back (16) + fill (16) = 33 ticks.
    assert!(cache.offer(Request::load(2 * stride)));
    let mut ticks = 0;
    let response = loop {
        cache.tick();
        ticks += 1;
        if let Some(r) = cache.take_response() {
            break r;
        }
        assert!(ticks < 64, "miss with eviction failed to resolve");
    };
    assert_eq!(ticks, 33);
    assert_eq!(response.status, l2sim_core::Status::Miss);
}
