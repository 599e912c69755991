//! The sustained-wind engine and the producer-side rolling reduction.
//!
//! Query side: for each day-of-year slot in range, the sustained volume's bin
//! counts sum to the number of historical calendar-days contributing to that
//! slot. The per-slot "% of days at/above the threshold bin" values are
//! averaged arithmetically across the selected slots — NOT weighted by
//! historical-day counts, and NOT summed-then-divided like the
//! kiteable-percentage engine. The two aggregation orders are intentional
//! and must stay separate.
//!
//! Producer side (specified here so the volume's semantics have one tested
//! definition): a day's max sustained wind is the maximum, over every window
//! of `H` consecutive hourly samples, of the window minimum — the highest
//! speed continuously held for at least `H` hours. Days with fewer than `H`
//! samples yield 0, which lands in the lowest bin alongside genuinely calm
//! days; the volume format carries no separate insufficient-data channel.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rayon::prelude::*;

use histogram_store::SustainedWindVolume;
use wind_common::{range_slots, WindBinEdges, DAYS_PER_YEAR};

/// Mean over the selected day slots of "% of historical days with sustained
/// wind at/above `threshold_knots`", for every spot. Index-aligned with the
/// volume's spot axis; spots with no contributing days report 0.
pub fn sustained_percentages(
    volume: &SustainedWindVolume,
    threshold_knots: f64,
    start_idx: usize,
    end_idx: usize,
    wraps: bool,
) -> Vec<f64> {
    let v = volume.volume();
    let threshold_bin = v.bins().first_bin_at_or_above(threshold_knots);
    let slots: Vec<usize> = range_slots(start_idx, end_idx, wraps).collect();

    (0..v.num_spots())
        .into_par_iter()
        .map(|spot| {
            let mut pct_sum = 0.0f64;
            let mut days_with_data = 0usize;
            for &slot in &slots {
                let counts = v.day_counts(spot, slot);
                let total: f64 = counts.iter().map(|&c| c as f64).sum();
                if total <= 0.0 {
                    continue;
                }
                let above: f64 = counts[threshold_bin..].iter().map(|&c| c as f64).sum();
                pct_sum += 100.0 * above / total;
                days_with_data += 1;
            }
            if days_with_data == 0 {
                0.0
            } else {
                pct_sum / days_with_data as f64
            }
        })
        .collect()
}

/// Highest wind speed continuously maintained for at least `window_hours`
/// consecutive samples, or 0 when the series is shorter than the window.
pub fn max_sustained(strengths: &[f64], window_hours: usize) -> f64 {
    if window_hours == 0 || strengths.len() < window_hours {
        return 0.0;
    }
    strengths
        .windows(window_hours)
        .map(|w| w.iter().copied().fold(f64::INFINITY, f64::min))
        .fold(0.0, f64::max)
}

/// Group hourly samples by calendar date and reduce each date with
/// [`max_sustained`]. Samples must be in chronological order.
pub fn daily_max_sustained(
    samples: &[(DateTime<Utc>, f64)],
    window_hours: usize,
) -> BTreeMap<NaiveDate, f64> {
    let mut per_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for &(ts, strength) in samples {
        per_day.entry(ts.date_naive()).or_default().push(strength);
    }
    per_day
        .into_iter()
        .map(|(date, strengths)| (date, max_sustained(&strengths, window_hours)))
        .collect()
}

/// Accumulate per-calendar-day sustained values into per-day-of-year bin
/// counts, shape `(366, num_bins)` — one historical day adds one count to
/// the bin holding its sustained value.
pub fn accumulate_sustained_counts(
    daily: &BTreeMap<NaiveDate, f64>,
    bins: &WindBinEdges,
) -> Vec<Vec<f32>> {
    let mut counts = vec![vec![0.0f32; bins.num_bins()]; DAYS_PER_YEAR];
    for (date, &value) in daily {
        let slot = format!("{:02}-{:02}", date.month(), date.day());
        let Some(day_idx) = wind_common::day_index(&slot) else {
            continue;
        };
        if let Some(bin) = bins.bin_containing(value) {
            counts[day_idx][bin] += 1.0;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use histogram_store::testdata;
    use wind_common::day_index;

    #[test]
    fn test_max_sustained_concrete() {
        // Three-hour window over a gusty day: the best floor held for 3h.
        let series = [5.0, 18.0, 20.0, 19.0, 4.0, 22.0, 23.0];
        assert_eq!(max_sustained(&series, 3), 18.0);
        assert_eq!(max_sustained(&series, 1), 23.0);
    }

    #[test]
    fn test_max_sustained_insufficient_samples() {
        assert_eq!(max_sustained(&[15.0, 16.0], 3), 0.0);
        assert_eq!(max_sustained(&[], 3), 0.0);
    }

    #[test]
    fn test_daily_grouping() {
        let ts = |d: u32, h: u32| Utc.with_ymd_and_hms(2021, 7, d, h, 0, 0).unwrap();
        let samples = vec![
            (ts(1, 0), 10.0),
            (ts(1, 1), 12.0),
            (ts(1, 2), 11.0),
            // Next day has too few samples for the window.
            (ts(2, 0), 30.0),
        ];
        let daily = daily_max_sustained(&samples, 2);
        let july1 = NaiveDate::from_ymd_opt(2021, 7, 1).unwrap();
        let july2 = NaiveDate::from_ymd_opt(2021, 7, 2).unwrap();
        assert_eq!(daily[&july1], 11.0);
        assert_eq!(daily[&july2], 0.0);
    }

    #[test]
    fn test_accumulate_counts_by_day_of_year() {
        let bins = WindBinEdges::new(vec![0.0, 10.0, 20.0, 100.0]).unwrap();
        let mut daily = BTreeMap::new();
        // Two different years contributing to the same day-of-year slot.
        daily.insert(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap(), 15.0);
        daily.insert(NaiveDate::from_ymd_opt(2021, 6, 15).unwrap(), 25.0);
        let counts = accumulate_sustained_counts(&daily, &bins);
        let slot = day_index("06-15").unwrap();
        assert_eq!(counts[slot], vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_sustained_percentages_mean_of_days() {
        // Two slots in range: one day 100% above, one day 0% above, so the
        // arithmetic mean is 50 even though raw counts are lopsided.
        let d1 = day_index("06-01").unwrap();
        let d2 = day_index("06-02").unwrap();
        let record = testdata::sustained_record(
            &["s"],
            vec![0.0, 10.0, 100.0],
            4,
            move |_, d, b| {
                if d == d1 {
                    // 9 historical days, all at/above 10 knots.
                    if b == 1 {
                        9.0
                    } else {
                        0.0
                    }
                } else if d == d2 {
                    // 1 historical day, below 10 knots.
                    if b == 0 {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    0.0
                }
            },
        );
        let volume = record.try_into_volume().unwrap();
        let pcts = sustained_percentages(&volume, 10.0, d1, d2, false);
        assert!((pcts[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let record = testdata::sustained_record(
            &["s"],
            vec![0.0, 5.0, 10.0, 15.0, 100.0],
            4,
            |_, d, b| ((d + b) % 3) as f32,
        );
        let volume = record.try_into_volume().unwrap();
        let mut last = f64::INFINITY;
        for threshold in [0.0, 5.0, 10.0, 15.0, 50.0] {
            let pct = sustained_percentages(&volume, threshold, 0, 365, false)[0];
            assert!(pct <= last + 1e-9, "raising the threshold increased the result");
            last = pct;
        }
    }
}
