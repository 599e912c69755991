//! Common types and utilities shared across the wind statistics workspace.

pub mod bins;
pub mod calendar;

pub use bins::{BinEdgesError, WindBinEdges, INFINITY_SENTINEL_KNOTS};
pub use calendar::{
    approx_day_number, circular_day_distance, day_index, day_mask, day_range_indices,
    days_of_year, range_slots, DAYS_PER_YEAR,
};
