//! Memoized bin masks and day-range resolutions.
//!
//! Both are pure functions of their arguments, so a cache stampede at worst
//! recomputes the same value twice; no coordination beyond the mutex is
//! needed. Bounds stay in the low hundreds since wind ranges and date ranges
//! repeat heavily across interactive requests.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

use wind_common::{day_range_indices, WindBinEdges};

const BIN_MASK_CAPACITY: usize = 256;
const DAY_RANGE_CAPACITY: usize = 512;

/// Key for a bin mask: the query bounds, bit-exact.
type BinMaskKey = (u64, u64);

/// Caches for derived query masks.
pub struct MaskCache {
    bin_masks: Mutex<LruCache<BinMaskKey, Arc<Vec<bool>>>>,
    day_ranges: Mutex<LruCache<(String, String), (usize, usize, bool)>>,
}

impl Default for MaskCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskCache {
    pub fn new() -> Self {
        Self {
            bin_masks: Mutex::new(LruCache::new(
                NonZeroUsize::new(BIN_MASK_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
            day_ranges: Mutex::new(LruCache::new(
                NonZeroUsize::new(DAY_RANGE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    /// The overlap bin mask for `[wind_min, wind_max]`, memoized.
    pub fn bin_mask(&self, bins: &WindBinEdges, wind_min: f64, wind_max: f64) -> Arc<Vec<bool>> {
        let key = (wind_min.to_bits(), wind_max.to_bits());
        if let Some(mask) = lock(&self.bin_masks).get(&key) {
            return Arc::clone(mask);
        }
        let mask = Arc::new(bins.overlap_mask(wind_min, wind_max));
        lock(&self.bin_masks).put(key, Arc::clone(&mask));
        mask
    }

    /// Resolved `(start_idx, end_idx, wraps)` for a date range, memoized.
    pub fn day_range(&self, start_date: &str, end_date: &str) -> (usize, usize, bool) {
        let key = (start_date.to_string(), end_date.to_string());
        if let Some(&range) = lock(&self.day_ranges).get(&key) {
            return range;
        }
        let range = day_range_indices(start_date, end_date);
        lock(&self.day_ranges).put(key, range);
        range
    }
}

// Cached values are recomputable, so a poisoned lock is recovered.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_mask_memoized() {
        let cache = MaskCache::new();
        let bins = WindBinEdges::new(vec![0.0, 5.0, 10.0, 100.0]).unwrap();
        let first = cache.bin_mask(&bins, 5.0, 10.0);
        let second = cache.bin_mask(&bins, 5.0, 10.0);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, vec![false, true, false]);
    }

    #[test]
    fn test_day_range_memoized() {
        let cache = MaskCache::new();
        assert_eq!(cache.day_range("11-01", "02-28").2, true);
        assert_eq!(cache.day_range("11-01", "02-28").2, true);
        assert_eq!(cache.day_range("01-01", "12-31").2, false);
    }
}
