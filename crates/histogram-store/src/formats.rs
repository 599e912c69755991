//! Serialized record shapes for the persisted ETL output.
//!
//! The files keep the day axis as explicit "MM-DD" strings and bin edges with
//! the 100-knot sentinel for the open upper edge. These shapes exist only at
//! the storage boundary; they are converted once on load into the dense
//! in-memory representation in [`crate::volume`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The single 3D strength-histogram volume file.
///
/// `data[s][d][b]` is the count of hourly observations at spot `s`, calendar
/// day `days[d]`, wind-speed bin `b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramVolumeRecord {
    /// Spot identifiers, index-aligned with the first data axis.
    pub spot_ids: Vec<String>,
    /// Bin edges in knots, open upper edge stored as the 100 sentinel.
    pub bins: Vec<f64>,
    /// "MM-DD" day slots, index-aligned with the second data axis.
    pub days: Vec<String>,
    /// Dense counts, shape `(spot_ids.len(), days.len(), bins.len() - 1)`.
    pub data: Vec<Vec<Vec<f32>>>,
}

/// The sustained-wind volume file.
///
/// Same shape convention as [`HistogramVolumeRecord`], but `data[s][d][b]`
/// counts historical calendar-days whose max sustained wind fell in bin `b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SustainedVolumeRecord {
    pub spot_ids: Vec<String>,
    pub bins: Vec<f64>,
    pub days: Vec<String>,
    /// Qualifying consecutive-hour duration used by the producer.
    pub sustained_hours: u32,
    pub data: Vec<Vec<Vec<f32>>>,
}

/// One row of the spot metadata table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRecord {
    pub spot_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
}

/// The spot metadata table file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotTableRecord {
    pub spots: Vec<SpotRecord>,
}

/// One per-spot 2D wind-rose file.
///
/// `daily_counts[day][s][d]` is the observation count at strength bin `s`,
/// direction bin `d`. Direction is "wind blowing toward", 0° = north,
/// increasing clockwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindRoseRecord {
    pub spot_id: String,
    /// Strength bin edges in knots, sentinel convention as elsewhere.
    pub strength_bins: Vec<f64>,
    /// Direction bin edges in degrees.
    pub direction_bins: Vec<f64>,
    /// "MM-DD" day slot → (strength × direction) count matrix.
    pub daily_counts: BTreeMap<String, Vec<Vec<f32>>>,
}
