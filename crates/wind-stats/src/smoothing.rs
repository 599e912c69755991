//! Moving-average smoothing of the daily histograms.
//!
//! Each smoothed day is the elementwise arithmetic mean of the bin vectors of
//! every day-of-year within `window_weeks * 7` days of it, circular over the
//! year. The window is centered per target day, so this cannot ride on the
//! prefix sums; it is an O(selected days × 366) recomputation, acceptable for
//! the single-spot view it serves.
//!
//! Window distance uses the approximate `(month-1)*30 + day` numbering kept
//! from the published outputs, which treats month boundaries as 30 days
//! apart. Slot ordering elsewhere is exact; only this distance is
//! approximate.

use std::collections::BTreeMap;

use histogram_store::HistogramVolume;
use wind_common::{calendar, range_slots, DAYS_PER_YEAR};

/// Smoothed bin vectors for the selected day range of one spot, keyed by the
/// "MM-DD" slot.
pub fn smoothed_histograms(
    volume: &HistogramVolume,
    spot: usize,
    start_idx: usize,
    end_idx: usize,
    wraps: bool,
    window_weeks: u32,
) -> BTreeMap<String, Vec<f64>> {
    let days = calendar::days_of_year();
    let window_days = window_weeks * 7;
    let num_bins = volume.num_bins();

    // Approximate day numbers for all slots, computed once. Slots are always
    // well-formed "MM-DD" strings, so the lookup cannot miss.
    let day_numbers: Vec<u32> = days
        .iter()
        .filter_map(|d| calendar::approx_day_number(d))
        .collect();

    let mut smoothed = BTreeMap::new();
    for target in range_slots(start_idx, end_idx, wraps) {
        let mut acc = vec![0.0f64; num_bins];
        let mut included = 0usize;
        for other in 0..DAYS_PER_YEAR {
            let diff = day_numbers[target].abs_diff(day_numbers[other]);
            if diff.min(365 - diff) > window_days {
                continue;
            }
            for (a, &c) in acc.iter_mut().zip(volume.day_counts(spot, other)) {
                *a += c as f64;
            }
            included += 1;
        }
        if included > 0 {
            for a in &mut acc {
                *a /= included as f64;
            }
        }
        smoothed.insert(days[target].clone(), acc);
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use histogram_store::testdata;
    use wind_common::day_index;

    #[test]
    fn test_uniform_volume_is_unchanged() {
        let v = testdata::volume_record(&["s"], vec![0.0, 10.0, 100.0], |_, _, b| {
            (b + 1) as f32
        })
        .try_into_volume()
        .unwrap();
        let smoothed = smoothed_histograms(&v, 0, 0, 30, false, 2);
        assert_eq!(smoothed.len(), 31);
        for vec in smoothed.values() {
            assert!((vec[0] - 1.0).abs() < 1e-9);
            assert!((vec[1] - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spike_spreads_across_window() {
        let spike = day_index("06-15").unwrap();
        let v = testdata::volume_record(&["s"], vec![0.0, 10.0, 100.0], move |_, d, _| {
            if d == spike {
                29.0
            } else {
                0.0
            }
        })
        .try_into_volume()
        .unwrap();
        let start = day_index("06-10").unwrap();
        let end = day_index("06-20").unwrap();
        let smoothed = smoothed_histograms(&v, 0, start, end, false, 1);
        // A 1-week window covers 15 days, one of which carries the spike.
        let on_spike = &smoothed["06-15"];
        assert!((on_spike[0] - 29.0 / 15.0).abs() < 1e-9);
        // A nearby day still sees the spike through its own window.
        let near = &smoothed["06-12"];
        assert!(near[0] > 0.0);
    }

    #[test]
    fn test_window_wraps_the_year() {
        let dec31 = day_index("12-31").unwrap();
        let v = testdata::volume_record(&["s"], vec![0.0, 10.0, 100.0], move |_, d, _| {
            if d == dec31 {
                1.0
            } else {
                0.0
            }
        })
        .try_into_volume()
        .unwrap();
        // Early-January days are within a 2-week circular window of Dec 31.
        let smoothed = smoothed_histograms(&v, 0, 0, 3, false, 2);
        assert!(smoothed["01-02"][0] > 0.0);
    }
}
