//! High-level wind statistics service.
//!
//! `WindStatsService` is the composition root: it owns the volume store, the
//! spot table, the wind-rose repository and the derived-mask caches, and
//! exposes every query contract behind plain method calls. Construct one at
//! process start and share it (`Arc`) across concurrent queries — everything
//! it holds is immutable after load except the bounded memo caches.
//!
//! # Example
//!
//! ```rust,ignore
//! use histogram_store::DataPaths;
//! use wind_stats::{SpotFilterQuery, WindStatsService};
//!
//! let service = WindStatsService::new(DataPaths::from_env())?;
//!
//! let windy = service.filter_spots(
//!     &SpotFilterQuery::new()
//!         .with_wind_range(15.0, 30.0)
//!         .with_date_range("05-01", "09-30")
//!         .with_min_percentage(60.0),
//! )?;
//! ```

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

use histogram_store::{
    DataPaths, HistogramStore, HistogramVolume, SpotRecord, SpotTable, SustainedWindVolume,
    WindRoseCacheStats, WindRoseStore,
};
use wind_common::{range_slots, INFINITY_SENTINEL_KNOTS};

use crate::error::{Result, StatsError};
use crate::masks::MaskCache;
use crate::percentage::{fleet_percentages, percentage_of_row, spot_percentage};
use crate::query::{DailyHistograms, DailyPercentages, SpotFilterQuery, SpotStats};
use crate::smoothing::smoothed_histograms;
use crate::sustained::sustained_percentages;
use crate::windrose::{aggregate, WindRoseSummary};

const FILTER_CACHE_CAPACITY: usize = 128;

/// The query-engine facade.
pub struct WindStatsService {
    store: HistogramStore,
    spots: SpotTable,
    windrose: WindRoseStore,
    masks: MaskCache,
    filter_cache: Mutex<LruCache<String, Arc<Vec<SpotStats>>>>,
}

impl WindStatsService {
    /// Create the service. The spot table is loaded eagerly (it is small and
    /// required); volumes load lazily on first query.
    pub fn new(paths: DataPaths) -> Result<Self> {
        let spots = SpotTable::load(&paths.spots_file)?;
        let windrose = WindRoseStore::new(paths.clone());
        let store = HistogramStore::new(paths);
        Ok(Self {
            store,
            spots,
            windrose,
            masks: MaskCache::new(),
            filter_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(FILTER_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        })
    }

    /// Build from already-loaded parts; used by tests and custom wiring.
    pub fn with_parts(store: HistogramStore, spots: SpotTable, windrose: WindRoseStore) -> Self {
        Self {
            store,
            spots,
            windrose,
            masks: MaskCache::new(),
            filter_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(FILTER_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    // ========================================================================
    // Spot metadata
    // ========================================================================

    /// Look up one spot by id.
    pub fn spot(&self, spot_id: &str) -> Result<SpotRecord> {
        self.spots
            .spot(spot_id)
            .ok_or_else(|| StatsError::SpotNotFound(spot_id.to_string()))
    }

    /// All spots, in table order.
    pub fn all_spots(&self) -> Vec<SpotRecord> {
        self.spots.all()
    }

    /// Sorted distinct countries with at least one spot.
    pub fn countries(&self) -> Vec<String> {
        self.spots.countries()
    }

    // ========================================================================
    // Kiteable percentage
    // ========================================================================

    /// Fraction of time (percent) wind at `spot_id` falls inside
    /// `[wind_min, wind_max]` over the date range.
    ///
    /// `Err(NoObservations)` when the range holds histogram rows but no
    /// observations — deliberately distinct from a valid `0.0`.
    pub fn kiteable_percentage(
        &self,
        spot_id: &str,
        wind_min: f64,
        wind_max: f64,
        start_date: &str,
        end_date: &str,
    ) -> Result<f64> {
        let volume = self.histograms()?;
        let spot = volume
            .spot_index(spot_id)
            .ok_or_else(|| StatsError::SpotNotFound(spot_id.to_string()))?;
        let bin_mask = self.masks.bin_mask(volume.bins(), wind_min, wind_max);
        let (start_idx, end_idx, wraps) = self.masks.day_range(start_date, end_date);
        spot_percentage(&volume, spot, &bin_mask, start_idx, end_idx, wraps)
            .ok_or(StatsError::NoObservations)
    }

    /// Filter the whole fleet. Results are sorted by kiteable percentage
    /// descending (ties keep spot-axis order) and cached by the full
    /// parameter tuple.
    pub fn filter_spots(&self, query: &SpotFilterQuery) -> Result<Vec<SpotStats>> {
        let key = query.cache_key();
        if let Some(cached) = lock(&self.filter_cache).get(&key) {
            tracing::debug!(key, "filter cache hit");
            return Ok(cached.as_ref().clone());
        }

        let results = Arc::new(self.run_filter(query)?);
        lock(&self.filter_cache).put(key, Arc::clone(&results));
        Ok(results.as_ref().clone())
    }

    fn run_filter(&self, query: &SpotFilterQuery) -> Result<Vec<SpotStats>> {
        let volume = self.histograms()?;
        let bin_mask = self
            .masks
            .bin_mask(volume.bins(), query.wind_min, query.wind_max);
        let (start_idx, end_idx, wraps) = self
            .masks
            .day_range(&query.start_date, &query.end_date);

        let fleet = fleet_percentages(&volume, &bin_mask, start_idx, end_idx, wraps);

        let country_mask = query
            .country
            .as_deref()
            .map(|country| self.spots.country_mask(country));
        let name_mask = query.name.as_deref().map(|name| self.spots.name_mask(name));

        // The sustained criterion needs its own volume; its spot axis may be
        // ordered differently from the strength volume's.
        let sustained = match query.sustained_wind_min.filter(|&t| t > 0.0) {
            Some(threshold) => {
                let volume = self.sustained_volume()?;
                let percentages =
                    sustained_percentages(&volume, threshold, start_idx, end_idx, wraps);
                Some((volume, percentages))
            }
            None => None,
        };

        let mut results = Vec::new();
        for (idx, spot_id) in volume.spot_ids().iter().enumerate() {
            // Zero-data spots are excluded here, via the metadata join.
            if !fleet.has_data[idx] || fleet.percentages[idx] < query.min_percentage {
                continue;
            }
            let Some(row) = self.spots.index_of(spot_id) else {
                continue;
            };
            if let Some(mask) = &country_mask {
                if !mask[row] {
                    continue;
                }
            }
            if let Some(mask) = &name_mask {
                if !mask[row] {
                    continue;
                }
            }
            if let Some((sustained_volume, percentages)) = &sustained {
                let Some(s_idx) = sustained_volume.volume().spot_index(spot_id) else {
                    continue;
                };
                if percentages[s_idx] < query.sustained_days_min {
                    continue;
                }
            }
            results.push(SpotStats {
                spot: self.spots.record(row),
                kiteable_percentage: round1(fleet.percentages[idx]),
            });
        }

        // Stable sort: equal percentages keep spot-axis order.
        results.sort_by(|a, b| b.kiteable_percentage.total_cmp(&a.kiteable_percentage));
        Ok(results)
    }

    // ========================================================================
    // Sustained wind
    // ========================================================================

    /// Mean "% of days with sustained wind at/above the threshold" over the
    /// date range, for every spot; index-aligned with
    /// [`Self::sustained_spot_ids`].
    pub fn sustained_percentages(
        &self,
        threshold_knots: f64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<f64>> {
        let volume = self.sustained_volume()?;
        let (start_idx, end_idx, wraps) = self.masks.day_range(start_date, end_date);
        Ok(sustained_percentages(
            &volume,
            threshold_knots,
            start_idx,
            end_idx,
            wraps,
        ))
    }

    /// Spot ids aligned with [`Self::sustained_percentages`] output.
    pub fn sustained_spot_ids(&self) -> Result<Vec<String>> {
        Ok(self.sustained_volume()?.volume().spot_ids().to_vec())
    }

    /// Single-spot variant of [`Self::sustained_percentages`].
    pub fn sustained_percentage(
        &self,
        spot_id: &str,
        threshold_knots: f64,
        start_date: &str,
        end_date: &str,
    ) -> Result<f64> {
        let volume = self.sustained_volume()?;
        let spot = volume
            .volume()
            .spot_index(spot_id)
            .ok_or_else(|| StatsError::SpotNotFound(spot_id.to_string()))?;
        let (start_idx, end_idx, wraps) = self.masks.day_range(start_date, end_date);
        let percentages =
            sustained_percentages(&volume, threshold_knots, start_idx, end_idx, wraps);
        Ok(percentages[spot])
    }

    // ========================================================================
    // Daily histograms
    // ========================================================================

    /// Raw per-day bin vectors for one spot over the date range.
    pub fn daily_histograms(
        &self,
        spot_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DailyHistograms> {
        let volume = self.histograms()?;
        let spot = volume
            .spot_index(spot_id)
            .ok_or_else(|| StatsError::SpotNotFound(spot_id.to_string()))?;
        let (start_idx, end_idx, wraps) = self.masks.day_range(start_date, end_date);

        let days = wind_common::days_of_year();
        let mut daily = BTreeMap::new();
        for slot in range_slots(start_idx, end_idx, wraps) {
            let counts = volume
                .day_counts(spot, slot)
                .iter()
                .map(|&c| c as f64)
                .collect();
            daily.insert(days[slot].clone(), counts);
        }

        Ok(DailyHistograms {
            spot_id: spot_id.to_string(),
            bins: volume.bins().sanitized(),
            daily,
        })
    }

    /// Moving-average smoothed per-day bin vectors for one spot.
    pub fn smoothed_daily_histograms(
        &self,
        spot_id: &str,
        start_date: &str,
        end_date: &str,
        window_weeks: u32,
    ) -> Result<DailyHistograms> {
        let volume = self.histograms()?;
        let spot = volume
            .spot_index(spot_id)
            .ok_or_else(|| StatsError::SpotNotFound(spot_id.to_string()))?;
        let (start_idx, end_idx, wraps) = self.masks.day_range(start_date, end_date);
        let daily = smoothed_histograms(&volume, spot, start_idx, end_idx, wraps, window_weeks);
        Ok(DailyHistograms {
            spot_id: spot_id.to_string(),
            bins: volume.bins().sanitized(),
            daily,
        })
    }

    /// Per-day kiteable percentage for one spot, optionally over the
    /// smoothed histograms. Days with no observations report 0 in this
    /// per-day view (the aggregate path reports `NoObservations` instead).
    pub fn daily_kiteable_percentage(
        &self,
        spot_id: &str,
        wind_min: f64,
        wind_max: f64,
        start_date: &str,
        end_date: &str,
        smoothed: bool,
        window_weeks: u32,
    ) -> Result<DailyPercentages> {
        let histograms = if smoothed {
            self.smoothed_daily_histograms(spot_id, start_date, end_date, window_weeks)?
        } else {
            self.daily_histograms(spot_id, start_date, end_date)?
        };

        let volume = self.histograms()?;
        let bin_mask = self.masks.bin_mask(volume.bins(), wind_min, wind_max);

        let daily = histograms
            .daily
            .into_iter()
            .map(|(day, counts)| {
                let pct = percentage_of_row(&counts, &bin_mask).unwrap_or(0.0);
                (day, round1(pct))
            })
            .collect();

        Ok(DailyPercentages {
            spot_id: spot_id.to_string(),
            wind_min,
            wind_max: wind_max.min(INFINITY_SENTINEL_KNOTS),
            daily,
        })
    }

    // ========================================================================
    // Wind rose
    // ========================================================================

    /// Aggregated, normalized wind rose for one spot and date range.
    pub fn windrose(
        &self,
        spot_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<WindRoseSummary> {
        let rose = self
            .windrose
            .get(spot_id)?
            .ok_or_else(|| StatsError::WindRoseUnavailable(spot_id.to_string()))?;
        Ok(aggregate(&rose, start_date, end_date))
    }

    /// Wind-rose cache statistics for monitoring.
    pub fn windrose_cache_stats(&self) -> WindRoseCacheStats {
        self.windrose.cache_stats()
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn histograms(&self) -> Result<Arc<HistogramVolume>> {
        self.store
            .histograms()
            .ok_or(StatsError::HistogramsUnavailable)
    }

    fn sustained_volume(&self) -> Result<Arc<SustainedWindVolume>> {
        self.store
            .sustained()
            .ok_or(StatsError::SustainedUnavailable)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// Filter results are pure functions of the query, so a poisoned cache lock
// is recovered rather than propagated.
fn lock<'a>(
    cache: &'a Mutex<LruCache<String, Arc<Vec<SpotStats>>>>,
) -> MutexGuard<'a, LruCache<String, Arc<Vec<SpotStats>>>> {
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(74.949), 74.9);
        assert_eq!(round1(74.95), 75.0);
        assert_eq!(round1(0.0), 0.0);
    }
}
