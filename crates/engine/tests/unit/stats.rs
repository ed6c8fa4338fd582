//! Statistics unit tests.

use l2sim_core::stats::CacheStats;

#[test]
fn hit_rate_is_zero_without_requests() {
    let stats = CacheStats::default();
    assert!(stats.hit_rate().abs() < f64::EPSILON);
}

#[test]
fn hit_rate_is_hits_over_requests() {
    let stats = CacheStats {
        requests: 8,
        hits: 6,
        misses: 2,
        ..CacheStats::default()
    };
    assert!((stats.hit_rate() - 0.75).abs() < 1e-9);
}

#[test]
fn report_names_every_counter() {
    let report = CacheStats::default().report();
    for field in [
        "ticks",
        "requests",
        "hits",
        "misses",
        "hit rate",
        "writebacks",
        "fills",
        "words read",
        "words written",
        "stall ticks",
    ] {
        assert!(report.contains(field), "report is missing {field}");
    }
}
