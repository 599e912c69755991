//! Dense histogram volumes with day-axis prefix sums.
//!
//! A volume is a `(num_spots, 366, num_bins)` array stored as a flat
//! `Vec<f32>` in row-major order. Alongside it we keep a flat f64 prefix
//! array of shape `(num_spots, 367, num_bins)` with
//! `prefix[s, d+1, b] - prefix[s, d, b] == volume[s, d, b]` and
//! `prefix[s, 0, b] == 0`. Summing a volume over any contiguous day range
//! then costs O(num_bins) per spot via subtraction, independent of the range
//! length; a wrapping range is the tail-of-year sum plus the head-of-year
//! sum. Prefix sums are built once at load; nothing mutates a volume
//! afterwards.

use std::collections::HashMap;

use wind_common::{calendar, WindBinEdges, DAYS_PER_YEAR};

use crate::error::{Result, StoreError};

const PREFIX_DAYS: usize = DAYS_PER_YEAR + 1;

/// Dense per-spot, per-day-of-year, per-bin counts.
#[derive(Debug)]
pub struct HistogramVolume {
    spot_ids: Vec<String>,
    spot_index: HashMap<String, usize>,
    bins: WindBinEdges,
    num_spots: usize,
    num_bins: usize,
    /// Flat counts, `num_spots * 366 * num_bins`.
    data: Vec<f32>,
    /// Flat day-axis cumulative sums, `num_spots * 367 * num_bins`.
    prefix: Vec<f64>,
}

impl HistogramVolume {
    /// Build a volume from its serialized axes and nested data.
    ///
    /// The record's day axis must cover the full 366-slot calendar; rows are
    /// remapped into canonical slot order, so the record may list days in any
    /// order.
    pub fn build(
        spot_ids: Vec<String>,
        bins: Vec<f64>,
        days: &[String],
        nested: &[Vec<Vec<f32>>],
    ) -> Result<Self> {
        let bins = WindBinEdges::new(bins)?;
        let num_spots = spot_ids.len();
        let num_bins = bins.num_bins();

        if nested.len() != num_spots {
            return Err(StoreError::shape(format!(
                "data has {} spots, spot_ids has {}",
                nested.len(),
                num_spots
            )));
        }
        if days.len() != DAYS_PER_YEAR {
            return Err(StoreError::shape(format!(
                "day axis has {} slots, expected {}",
                days.len(),
                DAYS_PER_YEAR
            )));
        }

        // Map each record row to its canonical calendar slot.
        let mut slot_of_row = Vec::with_capacity(DAYS_PER_YEAR);
        let mut seen = vec![false; DAYS_PER_YEAR];
        for day in days {
            let slot = calendar::day_index(day)
                .ok_or_else(|| StoreError::shape(format!("unknown day slot {day:?}")))?;
            if seen[slot] {
                return Err(StoreError::shape(format!("duplicate day slot {day:?}")));
            }
            seen[slot] = true;
            slot_of_row.push(slot);
        }

        let mut data = vec![0.0f32; num_spots * DAYS_PER_YEAR * num_bins];
        for (s, spot_rows) in nested.iter().enumerate() {
            if spot_rows.len() != DAYS_PER_YEAR {
                return Err(StoreError::shape(format!(
                    "spot {} has {} day rows, expected {}",
                    spot_ids[s],
                    spot_rows.len(),
                    DAYS_PER_YEAR
                )));
            }
            for (row, counts) in spot_rows.iter().enumerate() {
                if counts.len() != num_bins {
                    return Err(StoreError::shape(format!(
                        "spot {} day {} has {} bins, expected {}",
                        spot_ids[s],
                        days[row],
                        counts.len(),
                        num_bins
                    )));
                }
                let slot = slot_of_row[row];
                let base = (s * DAYS_PER_YEAR + slot) * num_bins;
                data[base..base + num_bins].copy_from_slice(counts);
            }
        }

        let prefix = build_prefix(&data, num_spots, num_bins);
        let spot_index = spot_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        tracing::info!(
            spots = num_spots,
            bins = num_bins,
            "built histogram volume with prefix sums"
        );

        Ok(Self {
            spot_ids,
            spot_index,
            bins,
            num_spots,
            num_bins,
            data,
            prefix,
        })
    }

    pub fn num_spots(&self) -> usize {
        self.num_spots
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn bins(&self) -> &WindBinEdges {
        &self.bins
    }

    pub fn spot_ids(&self) -> &[String] {
        &self.spot_ids
    }

    /// Axis-0 index for a spot id.
    pub fn spot_index(&self, spot_id: &str) -> Option<usize> {
        self.spot_index.get(spot_id).copied()
    }

    /// Count at `(spot, day slot, bin)`.
    pub fn value(&self, spot: usize, day: usize, bin: usize) -> f32 {
        self.data[(spot * DAYS_PER_YEAR + day) * self.num_bins + bin]
    }

    /// The bin-count row for one spot and day slot.
    pub fn day_counts(&self, spot: usize, day: usize) -> &[f32] {
        let base = (spot * DAYS_PER_YEAR + day) * self.num_bins;
        &self.data[base..base + self.num_bins]
    }

    /// Per-bin sum over a resolved day range for one spot, via prefix
    /// subtraction. O(num_bins) regardless of the range length.
    pub fn range_sum_spot(
        &self,
        spot: usize,
        start_idx: usize,
        end_idx: usize,
        wraps: bool,
    ) -> Vec<f64> {
        let mut out = vec![0.0f64; self.num_bins];
        self.accumulate_range(spot, start_idx, end_idx, wraps, &mut out);
        out
    }

    /// Per-bin range sums for every spot at once; flat `(num_spots, num_bins)`.
    pub fn range_sum_all(&self, start_idx: usize, end_idx: usize, wraps: bool) -> Vec<f64> {
        let mut out = vec![0.0f64; self.num_spots * self.num_bins];
        for spot in 0..self.num_spots {
            let base = spot * self.num_bins;
            self.accumulate_range(
                spot,
                start_idx,
                end_idx,
                wraps,
                &mut out[base..base + self.num_bins],
            );
        }
        out
    }

    fn accumulate_range(
        &self,
        spot: usize,
        start_idx: usize,
        end_idx: usize,
        wraps: bool,
        out: &mut [f64],
    ) {
        let row = |day: usize| {
            let base = (spot * PREFIX_DAYS + day) * self.num_bins;
            &self.prefix[base..base + self.num_bins]
        };

        if wraps {
            // Tail of year plus head of year.
            let full = row(DAYS_PER_YEAR);
            let start = row(start_idx);
            let head = row(end_idx + 1);
            for b in 0..self.num_bins {
                out[b] = (full[b] - start[b]) + head[b];
            }
        } else {
            let end = row(end_idx + 1);
            let start = row(start_idx);
            for b in 0..self.num_bins {
                out[b] = end[b] - start[b];
            }
        }
    }
}

fn build_prefix(data: &[f32], num_spots: usize, num_bins: usize) -> Vec<f64> {
    let mut prefix = vec![0.0f64; num_spots * PREFIX_DAYS * num_bins];
    for spot in 0..num_spots {
        for day in 0..DAYS_PER_YEAR {
            let src = (spot * DAYS_PER_YEAR + day) * num_bins;
            let prev = (spot * PREFIX_DAYS + day) * num_bins;
            let next = (spot * PREFIX_DAYS + day + 1) * num_bins;
            for b in 0..num_bins {
                prefix[next + b] = prefix[prev + b] + data[src + b] as f64;
            }
        }
    }
    prefix
}

impl crate::formats::HistogramVolumeRecord {
    /// Convert the serialized record into the dense in-memory volume.
    pub fn try_into_volume(self) -> Result<HistogramVolume> {
        HistogramVolume::build(self.spot_ids, self.bins, &self.days, &self.data)
    }
}

impl crate::formats::SustainedVolumeRecord {
    /// Convert the serialized record into the dense sustained-wind volume.
    pub fn try_into_volume(self) -> Result<SustainedWindVolume> {
        let volume = HistogramVolume::build(self.spot_ids, self.bins, &self.days, &self.data)?;
        Ok(SustainedWindVolume::new(volume, self.sustained_hours))
    }
}

/// Sustained-wind counterpart of [`HistogramVolume`].
///
/// Bin counts at a day slot sum to the number of historical calendar-days
/// contributing to that slot, not to an hourly-observation count.
#[derive(Debug)]
pub struct SustainedWindVolume {
    volume: HistogramVolume,
    sustained_hours: u32,
}

impl SustainedWindVolume {
    pub fn new(volume: HistogramVolume, sustained_hours: u32) -> Self {
        Self {
            volume,
            sustained_hours,
        }
    }

    /// The qualifying consecutive-hour duration used by the producer.
    pub fn sustained_hours(&self) -> u32 {
        self.sustained_hours
    }

    pub fn volume(&self) -> &HistogramVolume {
        &self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;
    use wind_common::day_range_indices;

    fn volume() -> HistogramVolume {
        // Counts vary by (spot, day, bin) so range sums are distinctive.
        testdata::volume_record(
            &["a", "b"],
            vec![0.0, 5.0, 10.0, 100.0],
            |s, d, b| ((s + 1) * (d % 7) + b) as f32,
        )
        .try_into_volume()
        .unwrap()
    }

    fn naive_sum(v: &HistogramVolume, spot: usize, slots: &[usize]) -> Vec<f64> {
        let mut out = vec![0.0; v.num_bins()];
        for &d in slots {
            for b in 0..v.num_bins() {
                out[b] += v.value(spot, d, b) as f64;
            }
        }
        out
    }

    #[test]
    fn test_prefix_identity() {
        let v = volume();
        for spot in 0..v.num_spots() {
            for day in 0..DAYS_PER_YEAR {
                let single = v.range_sum_spot(spot, day, day, false);
                for b in 0..v.num_bins() {
                    assert_eq!(single[b], v.value(spot, day, b) as f64);
                }
            }
        }
    }

    #[test]
    fn test_range_sum_matches_naive() {
        let v = volume();
        let (start, end, wraps) = day_range_indices("03-05", "06-20");
        assert!(!wraps);
        let slots: Vec<usize> = (start..=end).collect();
        for spot in 0..v.num_spots() {
            assert_eq!(
                v.range_sum_spot(spot, start, end, false),
                naive_sum(&v, spot, &slots)
            );
        }
    }

    #[test]
    fn test_wrapping_range_equals_tail_plus_head() {
        let v = volume();
        let (start, end, wraps) = day_range_indices("11-01", "02-28");
        assert!(wraps);
        let wrapped = v.range_sum_spot(0, start, end, true);
        let tail = v.range_sum_spot(0, start, DAYS_PER_YEAR - 1, false);
        let head = v.range_sum_spot(0, 0, end, false);
        for b in 0..v.num_bins() {
            assert!((wrapped[b] - (tail[b] + head[b])).abs() < 1e-9);
        }
    }

    #[test]
    fn test_range_sum_all_matches_per_spot() {
        let v = volume();
        let all = v.range_sum_all(10, 40, false);
        for spot in 0..v.num_spots() {
            let single = v.range_sum_spot(spot, 10, 40, false);
            assert_eq!(&all[spot * v.num_bins()..(spot + 1) * v.num_bins()], &single[..]);
        }
    }

    #[test]
    fn test_shuffled_day_axis_is_remapped() {
        let mut record = testdata::volume_record(
            &["a"],
            vec![0.0, 10.0, 100.0],
            |_, d, b| (d * 10 + b) as f32,
        );
        // Rotate the day axis; the loader must restore canonical slot order.
        record.days.rotate_left(30);
        record.data[0].rotate_left(30);
        let v = record.try_into_volume().unwrap();
        let jan1 = wind_common::day_index("01-01").unwrap();
        assert_eq!(v.value(0, jan1, 0), 0.0);
        assert_eq!(v.value(0, jan1, 1), 1.0);
    }

    #[test]
    fn test_shape_errors() {
        let mut record =
            testdata::volume_record(&["a"], vec![0.0, 10.0, 100.0], |_, _, _| 0.0);
        record.days.pop();
        record.data[0].pop();
        assert!(matches!(
            record.try_into_volume(),
            Err(StoreError::Shape(_))
        ));
    }
}
