//! Persisted-state access for the wind statistics engine.
//!
//! This crate owns the read side of the offline ETL output:
//!
//! - the dense 1D-strength histogram volume `(spots, 366 days, bins)` and its
//!   day-axis prefix sums, enabling O(bins) range sums per spot regardless of
//!   range length,
//! - the sustained-wind volume, keyed the same way but counting historical
//!   calendar-days per bin,
//! - the spot metadata table as parallel arrays for vectorized filtering,
//! - per-spot 2D (strength × direction) wind-rose files behind a bounded LRU
//!   cache.
//!
//! Everything is loaded once and shared read-only; the only serving-path
//! mutation is cache population.

pub mod config;
pub mod error;
pub mod formats;
pub mod spots;
pub mod store;
pub mod testdata;
pub mod volume;
pub mod windrose;

pub use config::DataPaths;
pub use error::{Result, StoreError};
pub use formats::{
    HistogramVolumeRecord, SpotRecord, SpotTableRecord, SustainedVolumeRecord, WindRoseRecord,
};
pub use spots::SpotTable;
pub use store::HistogramStore;
pub use volume::{HistogramVolume, SustainedWindVolume};
pub use windrose::{WindRose, WindRoseCacheStats, WindRoseStore};
