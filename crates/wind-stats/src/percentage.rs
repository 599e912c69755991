//! The kiteable-percentage engine.
//!
//! Percentage of hourly observations whose wind speed fell in the requested
//! bins, over a (possibly wrapping) day range: raw counts are summed across
//! the whole range first, then divided once. The sustained-wind engine
//! aggregates in the opposite order (mean of per-day percentages); the two
//! must not share a codepath.
//!
//! Range sums come from the volume's prefix arrays, so one spot costs
//! O(num_bins) and the whole fleet O(num_spots × num_bins), independent of
//! how many days the range covers.

use rayon::prelude::*;

use histogram_store::HistogramVolume;

/// Whole-fleet percentages, index-aligned with the volume's spot axis.
///
/// Spots with a zero total report `0.0` with `has_data == false` so the
/// filter keeps a sortable number for every spot and excludes no-data spots
/// explicitly rather than through NaN propagation.
#[derive(Debug, Clone)]
pub struct FleetPercentages {
    pub percentages: Vec<f64>,
    pub has_data: Vec<bool>,
}

/// Percentage for one spot, or `None` when the range holds no observations.
pub fn spot_percentage(
    volume: &HistogramVolume,
    spot: usize,
    bin_mask: &[bool],
    start_idx: usize,
    end_idx: usize,
    wraps: bool,
) -> Option<f64> {
    let sums = volume.range_sum_spot(spot, start_idx, end_idx, wraps);
    percentage_of_row(&sums, bin_mask)
}

/// Percentages for every spot in one pass over the prefix sums.
pub fn fleet_percentages(
    volume: &HistogramVolume,
    bin_mask: &[bool],
    start_idx: usize,
    end_idx: usize,
    wraps: bool,
) -> FleetPercentages {
    let sums = volume.range_sum_all(start_idx, end_idx, wraps);
    let (percentages, has_data) = sums
        .par_chunks(volume.num_bins())
        .map(|row| match percentage_of_row(row, bin_mask) {
            Some(pct) => (pct, true),
            None => (0.0, false),
        })
        .unzip();
    FleetPercentages {
        percentages,
        has_data,
    }
}

/// Percentage of one bin-sum row falling inside the mask.
pub fn percentage_of_row(row: &[f64], bin_mask: &[bool]) -> Option<f64> {
    let total: f64 = row.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let in_range: f64 = row
        .iter()
        .zip(bin_mask)
        .filter_map(|(&count, &selected)| selected.then_some(count))
        .sum();
    Some(100.0 * in_range / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use histogram_store::testdata;
    use wind_common::{day_index, WindBinEdges};

    /// One spot, counts [2, 3, 4, 1] on a single day (06-15), zero elsewhere.
    fn single_day_volume() -> HistogramVolume {
        let day = day_index("06-15").unwrap();
        let counts = [2.0f32, 3.0, 4.0, 1.0];
        testdata::volume_record(&["s"], vec![0.0, 5.0, 10.0, 15.0, 100.0], move |_, d, b| {
            if d == day {
                counts[b]
            } else {
                0.0
            }
        })
        .try_into_volume()
        .unwrap()
    }

    #[test]
    fn test_fully_contained_bin() {
        let v = single_day_volume();
        let mask = v.bins().overlap_mask(5.0, 10.0);
        let pct = spot_percentage(&v, 0, &mask, 0, 365, false).unwrap();
        assert!((pct - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_overlap_counts_fully() {
        let v = single_day_volume();
        let mask = v.bins().overlap_mask(7.0, 12.0);
        let pct = spot_percentage(&v, 0, &mask, 0, 365, false).unwrap();
        assert!((pct - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_range_is_no_observations() {
        let v = single_day_volume();
        let mask = v.bins().overlap_mask(0.0, 100.0);
        // January only: the single observation day is in June.
        let end = day_index("01-31").unwrap();
        assert!(spot_percentage(&v, 0, &mask, 0, end, false).is_none());
    }

    #[test]
    fn test_percentage_bounds() {
        let v = testdata::volume_record(&["s"], vec![0.0, 5.0, 10.0, 100.0], |_, d, b| {
            ((d * 7 + b * 3) % 5) as f32
        })
        .try_into_volume()
        .unwrap();
        let bins = WindBinEdges::new(vec![0.0, 5.0, 10.0, 100.0]).unwrap();
        for (lo, hi) in [(0.0, 0.0), (2.0, 8.0), (0.0, 100.0), (40.0, 60.0)] {
            let mask = bins.overlap_mask(lo, hi);
            if let Some(pct) = spot_percentage(&v, 0, &mask, 0, 365, false) {
                assert!((0.0..=100.0).contains(&pct), "{pct} out of bounds");
            }
        }
    }

    #[test]
    fn test_fleet_matches_scalar_and_flags_no_data() {
        let day = day_index("03-01").unwrap();
        // Spot 0 has data, spot 1 is entirely empty.
        let v = testdata::volume_record(&["a", "b"], vec![0.0, 10.0, 100.0], move |s, d, b| {
            if s == 0 && d == day {
                (b + 1) as f32
            } else {
                0.0
            }
        })
        .try_into_volume()
        .unwrap();
        let mask = v.bins().overlap_mask(0.0, 10.0);
        let fleet = fleet_percentages(&v, &mask, 0, 365, false);

        let scalar = spot_percentage(&v, 0, &mask, 0, 365, false).unwrap();
        assert_eq!(fleet.percentages[0], scalar);
        assert!(fleet.has_data[0]);

        assert_eq!(fleet.percentages[1], 0.0);
        assert!(!fleet.has_data[1]);
    }
}
