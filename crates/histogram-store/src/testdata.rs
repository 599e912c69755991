//! Synthetic fixture generation for unit and integration tests.
//!
//! Fixtures are tiny (a handful of spots, a few bins) but always span the
//! full 366-slot calendar, since every volume does.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use wind_common::{calendar, DAYS_PER_YEAR};

use crate::formats::{
    HistogramVolumeRecord, SpotRecord, SpotTableRecord, SustainedVolumeRecord, WindRoseRecord,
};

/// Build a full-calendar volume record where
/// `data[s][d][b] = fill(spot, day_slot, bin)`.
pub fn volume_record(
    spot_ids: &[&str],
    bins: Vec<f64>,
    fill: impl Fn(usize, usize, usize) -> f32,
) -> HistogramVolumeRecord {
    let num_bins = bins.len() - 1;
    let data = (0..spot_ids.len())
        .map(|s| {
            (0..DAYS_PER_YEAR)
                .map(|d| (0..num_bins).map(|b| fill(s, d, b)).collect())
                .collect()
        })
        .collect();
    HistogramVolumeRecord {
        spot_ids: spot_ids.iter().map(|s| s.to_string()).collect(),
        bins,
        days: calendar::days_of_year().to_vec(),
        data,
    }
}

/// Sustained-wind variant of [`volume_record`].
pub fn sustained_record(
    spot_ids: &[&str],
    bins: Vec<f64>,
    sustained_hours: u32,
    fill: impl Fn(usize, usize, usize) -> f32,
) -> SustainedVolumeRecord {
    let base = volume_record(spot_ids, bins, fill);
    SustainedVolumeRecord {
        spot_ids: base.spot_ids,
        bins: base.bins,
        days: base.days,
        sustained_hours,
        data: base.data,
    }
}

/// One spot-table row.
pub fn spot(
    id: &str,
    name: &str,
    latitude: f64,
    longitude: f64,
    country: Option<&str>,
) -> SpotRecord {
    SpotRecord {
        spot_id: id.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        country: country.map(|c| c.to_string()),
    }
}

/// A spot-table record from rows.
pub fn spot_table(spots: Vec<SpotRecord>) -> SpotTableRecord {
    SpotTableRecord { spots }
}

/// A wind-rose record with a constant-valued matrix on the given days.
pub fn windrose_record(
    spot_id: &str,
    days: &[&str],
    strength_bins: usize,
    direction_bins: usize,
    value: f32,
) -> WindRoseRecord {
    let matrix = vec![vec![value; direction_bins]; strength_bins];
    let daily_counts: BTreeMap<String, Vec<Vec<f32>>> = days
        .iter()
        .map(|d| (d.to_string(), matrix.clone()))
        .collect();
    WindRoseRecord {
        spot_id: spot_id.to_string(),
        // Edges are one longer than the bin count.
        strength_bins: (0..=strength_bins).map(|i| i as f64 * 5.0).collect(),
        direction_bins: (0..=direction_bins)
            .map(|i| i as f64 * (360.0 / direction_bins as f64))
            .collect(),
        daily_counts,
    }
}

/// Serialize a record to a JSON file, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, record: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_vec(record)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
