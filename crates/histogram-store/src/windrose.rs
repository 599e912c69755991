//! Per-spot 2D wind-rose files behind a bounded LRU cache.
//!
//! One spot's worth of daily (strength × direction) matrices is already
//! large, so the 2D histograms stay file-backed and are loaded per spot on
//! demand. The cache bound keeps memory flat no matter how many spots a
//! session touches; eviction order is a latency tradeoff, not a semantic one.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use lru::LruCache;

use crate::config::DataPaths;
use crate::error::Result;
use crate::formats::WindRoseRecord;

/// In-memory form of one spot's wind-rose file.
#[derive(Debug)]
pub struct WindRose {
    pub spot_id: String,
    pub strength_bins: Vec<f64>,
    pub direction_bins: Vec<f64>,
    /// "MM-DD" day slot → (strength × direction) counts.
    pub daily_counts: BTreeMap<String, Vec<Vec<f32>>>,
}

/// Hit/miss counters for the wind-rose cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindRoseCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// File-backed repository of per-spot wind roses.
pub struct WindRoseStore {
    paths: DataPaths,
    cache: Mutex<LruCache<String, Arc<WindRose>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl WindRoseStore {
    pub fn new(paths: DataPaths) -> Self {
        let capacity = NonZeroUsize::new(paths.windrose_cache_size.max(1))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            paths,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Load (or fetch from cache) the wind rose for one spot.
    ///
    /// Returns `Ok(None)` when the spot has no wind-rose file.
    pub fn get(&self, spot_id: &str) -> Result<Option<Arc<WindRose>>> {
        if let Some(rose) = self.lock_cache().get(spot_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(Arc::clone(rose)));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let path = self.paths.windrose_file(spot_id);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        let record: WindRoseRecord = serde_json::from_reader(BufReader::new(file))?;
        let rose = Arc::new(WindRose {
            spot_id: record.spot_id,
            strength_bins: record.strength_bins,
            direction_bins: record.direction_bins,
            daily_counts: record.daily_counts,
        });
        tracing::debug!(spot_id, path = %path.display(), "loaded wind rose");

        self.lock_cache().put(spot_id.to_string(), Arc::clone(&rose));
        Ok(Some(rose))
    }

    // Cache contents are pure functions of the files on disk, so a poisoned
    // lock can be recovered rather than propagated.
    fn lock_cache(&self) -> std::sync::MutexGuard<'_, LruCache<String, Arc<WindRose>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cache statistics for monitoring.
    pub fn cache_stats(&self) -> WindRoseCacheStats {
        WindRoseCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock_cache().len(),
        }
    }
}
