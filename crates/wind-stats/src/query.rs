//! Query and result types for the statistics service.
//!
//! `SpotFilterQuery` is a fluent builder over the full filter parameter
//! tuple. Parameter validation (date format, bounds) belongs to the
//! transport layer wrapping this crate; the types here only carry defaults
//! and the cache key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use histogram_store::SpotRecord;
use wind_common::INFINITY_SENTINEL_KNOTS;

/// Parameters for the whole-fleet spot filter.
///
/// # Example
///
/// ```rust
/// use wind_stats::SpotFilterQuery;
///
/// let query = SpotFilterQuery::new()
///     .with_wind_range(15.0, 30.0)
///     .with_date_range("11-01", "02-28")
///     .in_country("ES")
///     .with_min_percentage(60.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotFilterQuery {
    /// Lower wind bound in knots.
    pub wind_min: f64,
    /// Upper wind bound in knots; at or above 100 means unbounded.
    pub wind_max: f64,
    /// "MM-DD" range start.
    pub start_date: String,
    /// "MM-DD" range end; earlier than `start_date` wraps the year.
    pub end_date: String,
    /// Exact country-code match, when set.
    pub country: Option<String>,
    /// Case-insensitive name substring, when set.
    pub name: Option<String>,
    /// Keep spots whose kiteable percentage is at least this.
    pub min_percentage: f64,
    /// Sustained-wind threshold in knots; `> 0` activates the criterion.
    pub sustained_wind_min: Option<f64>,
    /// Minimum "% of days with sustained wind at/above the threshold".
    pub sustained_days_min: f64,
}

impl Default for SpotFilterQuery {
    fn default() -> Self {
        Self {
            wind_min: 0.0,
            wind_max: INFINITY_SENTINEL_KNOTS,
            start_date: "01-01".to_string(),
            end_date: "12-31".to_string(),
            country: None,
            name: None,
            min_percentage: 75.0,
            sustained_wind_min: None,
            sustained_days_min: 0.0,
        }
    }
}

impl SpotFilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wind-speed window in knots.
    pub fn with_wind_range(mut self, wind_min: f64, wind_max: f64) -> Self {
        self.wind_min = wind_min;
        self.wind_max = wind_max;
        self
    }

    /// Set the "MM-DD" date range; start after end wraps the year.
    pub fn with_date_range(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = start_date.into();
        self.end_date = end_date.into();
        self
    }

    /// Keep only spots in this country (exact code match).
    pub fn in_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Keep only spots whose name contains this substring.
    pub fn name_contains(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the kiteable-percentage floor.
    pub fn with_min_percentage(mut self, min_percentage: f64) -> Self {
        self.min_percentage = min_percentage;
        self
    }

    /// Activate the sustained-wind criterion: at least `days_min` percent of
    /// days with sustained wind at/above `threshold_knots`.
    pub fn with_sustained(mut self, threshold_knots: f64, days_min: f64) -> Self {
        self.sustained_wind_min = Some(threshold_knots);
        self.sustained_days_min = days_min;
        self
    }

    /// Stable key over the full parameter tuple for result caching.
    pub(crate) fn cache_key(&self) -> String {
        format!(
            "{:x}|{:x}|{}|{}|{}|{}|{:x}|{}|{:x}",
            self.wind_min.to_bits(),
            self.wind_max.to_bits(),
            self.start_date,
            self.end_date,
            self.country.as_deref().unwrap_or(""),
            self.name.as_deref().unwrap_or(""),
            self.min_percentage.to_bits(),
            self.sustained_wind_min.map(f64::to_bits).unwrap_or(0),
            self.sustained_days_min.to_bits(),
        )
    }
}

/// One spot that passed the filter, with its computed statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotStats {
    #[serde(flatten)]
    pub spot: SpotRecord,
    /// Kiteable percentage over the requested ranges, one-decimal rounded.
    pub kiteable_percentage: f64,
}

/// Per-day bin vectors for one spot, raw or smoothed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyHistograms {
    pub spot_id: String,
    /// Bin edges with the open upper edge sanitized to the 100 sentinel.
    pub bins: Vec<f64>,
    /// "MM-DD" slot → bin counts (means, for the smoothed variant).
    pub daily: BTreeMap<String, Vec<f64>>,
}

/// Per-day kiteable percentages for one spot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPercentages {
    pub spot_id: String,
    pub wind_min: f64,
    /// Upper bound clamped to the 100 sentinel for transport.
    pub wind_max: f64,
    /// "MM-DD" slot → percentage, one-decimal rounded; days with no
    /// observations report 0 in this per-day view.
    pub daily: BTreeMap<String, f64>,
}
