//! Shared helpers for the engine test suite.


use l2sim_core::CacheConfig;

/// Builds one line filled with a repeating byte pattern.
pub fn pattern_line(seed: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| seed.wrapping_add(i as u8)).collect()
}

/// The default configuration: 128 sets, 2 ways, 64-byte lines, LRU.
pub fn default_config() -> CacheConfig {
    CacheConfig::default()
}

/// A small configuration that forces set conflicts quickly: 4 sets,
/// 2 ways, 64-byte lines.
pub fn small_config() -> CacheConfig {
    CacheConfig {
        sets: 4,
        ways: 2,
        ..CacheConfig::default()
    }
}

/// Byte distance between two addresses that share a set, for a config.
pub fn set_stride(config: &CacheConfig) -> u64 {
    let geom = config.geometry();
    (geom.sets * geom.line_bytes) as u64
}
