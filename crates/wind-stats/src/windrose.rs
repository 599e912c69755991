//! 2D wind-rose aggregation over a date range.
//!
//! Sums the per-day (strength × direction) matrices for every day slot in
//! the (possibly wrapping) range, then normalizes by the grand total into a
//! percentage distribution: the whole matrix sums to 100, or stays all-zero
//! when no observations exist in range.
//!
//! Direction convention: the angle is where the wind is blowing TOWARD,
//! 0° = north, increasing clockwise — not the meteorological "blowing from".

use histogram_store::WindRose;

/// Aggregated, normalized wind rose for one spot and date range.
#[derive(Debug, Clone)]
pub struct WindRoseSummary {
    pub spot_id: String,
    pub strength_bins: Vec<f64>,
    pub direction_bins: Vec<f64>,
    /// Percentage per (strength, direction) cell; sums to 100 (or all-zero).
    pub data: Vec<Vec<f64>>,
}

/// Day-slot membership in a possibly wrapping "MM-DD" range. Lexicographic
/// comparison is the calendar order because both fields are zero-padded.
fn in_range(day: &str, start_date: &str, end_date: &str) -> bool {
    if start_date <= end_date {
        start_date <= day && day <= end_date
    } else {
        day >= start_date || day <= end_date
    }
}

/// Sum and normalize one spot's wind rose over a date range.
pub fn aggregate(rose: &WindRose, start_date: &str, end_date: &str) -> WindRoseSummary {
    let rows = rose.strength_bins.len().saturating_sub(1);
    let cols = rose.direction_bins.len().saturating_sub(1);
    let mut summed = vec![vec![0.0f64; cols]; rows];

    for (day, matrix) in &rose.daily_counts {
        if !in_range(day, start_date, end_date) {
            continue;
        }
        for (acc_row, row) in summed.iter_mut().zip(matrix) {
            for (acc, &count) in acc_row.iter_mut().zip(row) {
                *acc += count as f64;
            }
        }
    }

    let total: f64 = summed.iter().flatten().sum();
    if total > 0.0 {
        for row in &mut summed {
            for cell in row {
                *cell = *cell / total * 100.0;
            }
        }
    }

    WindRoseSummary {
        spot_id: rose.spot_id.clone(),
        strength_bins: rose.strength_bins.clone(),
        direction_bins: rose.direction_bins.clone(),
        data: summed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rose(days: &[(&str, f32)]) -> WindRose {
        let mut daily_counts = BTreeMap::new();
        for &(day, value) in days {
            daily_counts.insert(day.to_string(), vec![vec![value, value], vec![0.0, value]]);
        }
        WindRose {
            spot_id: "s".to_string(),
            strength_bins: vec![0.0, 10.0, 100.0],
            direction_bins: vec![0.0, 180.0, 360.0],
            daily_counts,
        }
    }

    #[test]
    fn test_normalizes_to_100() {
        let summary = aggregate(&rose(&[("06-01", 1.0), ("06-02", 3.0)]), "06-01", "06-30");
        let total: f64 = summary.data.iter().flatten().sum();
        assert!((total - 100.0).abs() < 1e-9);
        // Cell shares follow the raw counts: three cells carry weight 4 each.
        assert!((summary.data[0][0] - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.data[1][0], 0.0);
    }

    #[test]
    fn test_wrapping_range_selects_across_new_year() {
        let r = rose(&[("12-20", 1.0), ("01-05", 1.0), ("06-01", 1.0)]);
        let summary = aggregate(&r, "12-01", "01-31");
        // June is outside the wrapped range; the two winter days weigh equal.
        let total: f64 = summary.data.iter().flatten().sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!((summary.data[0][0] - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_range_stays_zero() {
        let summary = aggregate(&rose(&[("06-01", 2.0)]), "01-01", "01-31");
        assert!(summary.data.iter().flatten().all(|&v| v == 0.0));
    }
}
