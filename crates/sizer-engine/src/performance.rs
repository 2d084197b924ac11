//! Memory capacity → published data/log performance target.
//!
//! Below 8 TiB the target is a step function over memory bands, each
//! upper bound exclusive. Above it, the published guidance names a
//! handful of ultra-large SKUs by exact memory size; anything else
//! falls into the nearest band at or below it.

use sizer_core::PerformanceTarget;

/// (exclusive upper bound in GiB, target) for the regular bands.
const BANDS: &[(u32, PerformanceTarget)] = &[
    (1024, PerformanceTarget::new(425, 3000, 275, 3000)),
    (2048, PerformanceTarget::new(600, 5000, 300, 4000)),
    (4096, PerformanceTarget::new(800, 12000, 300, 4000)),
    (8192, PerformanceTarget::new(1200, 20000, 400, 5000)),
];

/// Exact memory sizes of named ultra-large SKUs.
const ULTRA_LARGE: &[(u32, PerformanceTarget)] = &[
    (11400, PerformanceTarget::new(1200, 20000, 400, 5000)),
    (14902, PerformanceTarget::new(2000, 40000, 600, 10000)),
    (15200, PerformanceTarget::new(2000, 60000, 600, 10000)),
    (23088, PerformanceTarget::new(2000, 60000, 600, 10000)),
    (30400, PerformanceTarget::new(2000, 80000, 600, 10000)),
];

/// (inclusive lower bound in GiB, target) above the regular bands,
/// highest first.
const ULTRA_BANDS: &[(u32, PerformanceTarget)] = &[
    (30400, PerformanceTarget::new(2000, 80000, 600, 10000)),
    (15200, PerformanceTarget::new(2000, 60000, 600, 10000)),
];

const ULTRA_DEFAULT: PerformanceTarget = PerformanceTarget::new(1200, 20000, 400, 5000);

/// Resolve the performance target for a memory size in GiB.
pub fn resolve_performance(memory_gib: u32) -> PerformanceTarget {
    if let Some((_, target)) = BANDS.iter().find(|(upper, _)| memory_gib < *upper) {
        return *target;
    }

    if let Some((_, target)) = ULTRA_LARGE.iter().find(|(exact, _)| memory_gib == *exact) {
        return *target;
    }

    ULTRA_BANDS
        .iter()
        .find(|(lower, _)| memory_gib >= *lower)
        .map(|(_, target)| *target)
        .unwrap_or(ULTRA_DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(dm: u32, di: u32, lm: u32, li: u32) -> PerformanceTarget {
        PerformanceTarget::new(dm, di, lm, li)
    }

    #[test]
    fn regular_bands() {
        assert_eq!(resolve_performance(0), t(425, 3000, 275, 3000));
        assert_eq!(resolve_performance(512), t(425, 3000, 275, 3000));
        assert_eq!(resolve_performance(1792), t(600, 5000, 300, 4000));
        assert_eq!(resolve_performance(3892), t(800, 12000, 300, 4000));
        assert_eq!(resolve_performance(5700), t(1200, 20000, 400, 5000));
    }

    #[test]
    fn upper_edges_are_exclusive() {
        assert_eq!(resolve_performance(1023), t(425, 3000, 275, 3000));
        assert_eq!(resolve_performance(1024), t(600, 5000, 300, 4000));
        assert_eq!(resolve_performance(2047), t(600, 5000, 300, 4000));
        assert_eq!(resolve_performance(2048), t(800, 12000, 300, 4000));
        assert_eq!(resolve_performance(4096), t(1200, 20000, 400, 5000));
        assert_eq!(resolve_performance(8191), t(1200, 20000, 400, 5000));
    }

    #[test]
    fn named_ultra_large_sizes() {
        assert_eq!(resolve_performance(11400), t(1200, 20000, 400, 5000));
        assert_eq!(resolve_performance(14902), t(2000, 40000, 600, 10000));
        assert_eq!(resolve_performance(15200), t(2000, 60000, 600, 10000));
        assert_eq!(resolve_performance(23088), t(2000, 60000, 600, 10000));
        assert_eq!(resolve_performance(30400), t(2000, 80000, 600, 10000));
    }

    #[test]
    fn unnamed_large_sizes_use_bands() {
        assert_eq!(resolve_performance(8192), t(1200, 20000, 400, 5000));
        assert_eq!(resolve_performance(12000), t(1200, 20000, 400, 5000));
        assert_eq!(resolve_performance(15199), t(1200, 20000, 400, 5000));
        assert_eq!(resolve_performance(20000), t(2000, 60000, 600, 10000));
        assert_eq!(resolve_performance(30399), t(2000, 60000, 600, 10000));
        assert_eq!(resolve_performance(40000), t(2000, 80000, 600, 10000));
    }

    #[test]
    fn resolution_is_pure() {
        for m in (0..40_000).step_by(97) {
            assert_eq!(resolve_performance(m), resolve_performance(m));
        }
    }

    #[test]
    fn regular_bands_never_decrease() {
        let mut prev = resolve_performance(0);
        for m in 0..8192 {
            let cur = resolve_performance(m);
            assert!(cur.data_iops >= prev.data_iops, "data iops fell at {m}");
            prev = cur;
        }
    }
}
