//! Query engines over precomputed wind histograms.
//!
//! Answers "is wind condition X kiteable at spot Y, how often, and when"
//! from dense per-spot, per-day-of-year histogram volumes built offline:
//!
//! - kiteable percentage for one spot or the whole fleet (sum counts over
//!   the day range, divide once),
//! - sustained-wind day percentages (mean of per-day percentages — the
//!   opposite aggregation order, kept deliberately separate),
//! - moving-average smoothing of daily histograms,
//! - 2D wind-rose aggregation,
//! - the multi-criteria spot filter tying them together.
//!
//! [`WindStatsService`] is the entry point; the engine modules are also
//! public for callers that already hold a volume.

pub mod error;
pub mod masks;
pub mod percentage;
pub mod query;
pub mod service;
pub mod smoothing;
pub mod sustained;
pub mod windrose;

pub use error::{Result, StatsError};
pub use masks::MaskCache;
pub use percentage::{fleet_percentages, spot_percentage, FleetPercentages};
pub use query::{DailyHistograms, DailyPercentages, SpotFilterQuery, SpotStats};
pub use service::WindStatsService;
pub use smoothing::smoothed_histograms;
pub use sustained::{
    accumulate_sustained_counts, daily_max_sustained, max_sustained, sustained_percentages,
};
pub use windrose::{aggregate, WindRoseSummary};
