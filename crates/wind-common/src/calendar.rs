//! The 366-slot day-of-year calendar.
//!
//! All histogram volumes share one day axis: the 366 canonical "MM-DD" slots,
//! including `02-29` regardless of which source years contributed data. Slots
//! are ordered by (month, day), and because both fields are zero-padded the
//! lexicographic order of the strings matches the calendar order. A date range
//! whose start compares greater than its end wraps the year boundary
//! (e.g. `11-01` → `02-28` selects Nov through Feb).

use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of day-of-year slots, including the leap day.
pub const DAYS_PER_YEAR: usize = 366;

const MONTH_LENGTHS: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// The canonical ordered "MM-DD" slots, built once.
pub fn days_of_year() -> &'static [String] {
    static DAYS: OnceLock<Vec<String>> = OnceLock::new();
    DAYS.get_or_init(|| {
        let mut days = Vec::with_capacity(DAYS_PER_YEAR);
        for (month, &len) in MONTH_LENGTHS.iter().enumerate() {
            for day in 1..=len {
                days.push(format!("{:02}-{:02}", month + 1, day));
            }
        }
        days
    })
}

fn day_to_index() -> &'static HashMap<&'static str, usize> {
    static INDEX: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();
    INDEX.get_or_init(|| {
        days_of_year()
            .iter()
            .enumerate()
            .map(|(idx, day)| (day.as_str(), idx))
            .collect()
    })
}

/// Look up the axis index for an "MM-DD" slot.
pub fn day_index(date: &str) -> Option<usize> {
    day_to_index().get(date).copied()
}

/// Resolve a date range to `(start_idx, end_idx, wraps)`.
///
/// Unknown date strings fall back to the first index for the start and the
/// last index for the end; this is a defined fallback, not an error.
pub fn day_range_indices(start_date: &str, end_date: &str) -> (usize, usize, bool) {
    let start_idx = day_index(start_date).unwrap_or(0);
    let end_idx = day_index(end_date).unwrap_or(DAYS_PER_YEAR - 1);
    (start_idx, end_idx, start_idx > end_idx)
}

/// Iterate the slot indices selected by a resolved range, in calendar order.
pub fn range_slots(
    start_idx: usize,
    end_idx: usize,
    wraps: bool,
) -> Box<dyn Iterator<Item = usize>> {
    if wraps {
        Box::new((start_idx..DAYS_PER_YEAR).chain(0..=end_idx))
    } else {
        Box::new(start_idx..=end_idx)
    }
}

/// Boolean selection over the 366 slots for a (possibly wrapping) date range.
pub fn day_mask(start_date: &str, end_date: &str) -> Vec<bool> {
    let (start_idx, end_idx, wraps) = day_range_indices(start_date, end_date);
    let mut mask = vec![false; DAYS_PER_YEAR];
    for slot in range_slots(start_idx, end_idx, wraps) {
        mask[slot] = true;
    }
    mask
}

/// Approximate day-of-year number, `(month - 1) * 30 + day`.
///
/// Misrepresents true distance near month boundaries (Jan 31 vs Feb 1 comes
/// out 30 apart, not 1). Kept for compatibility with the published
/// moving-average windows; do not use it for slot ordering.
pub fn approx_day_number(date: &str) -> Option<u32> {
    let (month, day) = date.split_once('-')?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some((month - 1) * 30 + day)
}

/// Circular distance between two dates under the approximate day numbering.
pub fn circular_day_distance(a: &str, b: &str) -> Option<u32> {
    let da = approx_day_number(a)?;
    let db = approx_day_number(b)?;
    let diff = da.abs_diff(db);
    Some(diff.min(365 - diff))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_has_366_slots() {
        let days = days_of_year();
        assert_eq!(days.len(), DAYS_PER_YEAR);
        assert_eq!(days[0], "01-01");
        assert_eq!(days[DAYS_PER_YEAR - 1], "12-31");
        // The leap day is always present.
        assert!(days.contains(&"02-29".to_string()));
    }

    #[test]
    fn test_calendar_is_lexicographically_sorted() {
        let days = days_of_year();
        for pair in days.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_day_index_round_trip() {
        for (idx, day) in days_of_year().iter().enumerate() {
            assert_eq!(day_index(day), Some(idx));
        }
        assert_eq!(day_index("13-01"), None);
        assert_eq!(day_index("02-30"), None);
    }

    #[test]
    fn test_day_range_non_wrapping() {
        let (start, end, wraps) = day_range_indices("03-01", "03-31");
        assert!(!wraps);
        assert_eq!(end - start + 1, 31);
        let slots: Vec<_> = range_slots(start, end, wraps).collect();
        assert_eq!(slots.len(), 31);
    }

    #[test]
    fn test_day_range_wrapping() {
        let (start, end, wraps) = day_range_indices("11-01", "02-28");
        assert!(wraps);
        let slots: Vec<_> = range_slots(start, end, wraps).collect();
        // Nov (30) + Dec (31) + Jan (31) + Feb 1-28.
        assert_eq!(slots.len(), 30 + 31 + 31 + 28);
        assert_eq!(slots[0], day_index("11-01").unwrap());
        assert_eq!(*slots.last().unwrap(), day_index("02-28").unwrap());
    }

    #[test]
    fn test_unknown_dates_fall_back_to_full_range() {
        let (start, end, wraps) = day_range_indices("bogus", "also-bogus");
        assert_eq!(start, 0);
        assert_eq!(end, DAYS_PER_YEAR - 1);
        assert!(!wraps);
    }

    #[test]
    fn test_day_mask_matches_range() {
        let mask = day_mask("12-30", "01-02");
        assert_eq!(mask.iter().filter(|&&m| m).count(), 4);
        assert!(mask[day_index("12-31").unwrap()]);
        assert!(mask[day_index("01-01").unwrap()]);
        assert!(!mask[day_index("06-15").unwrap()]);
    }

    #[test]
    fn test_approx_day_number() {
        assert_eq!(approx_day_number("01-01"), Some(1));
        assert_eq!(approx_day_number("02-01"), Some(31));
        // The known month-boundary distortion: Jan 31 vs Feb 1 is 30 apart.
        assert_eq!(circular_day_distance("01-31", "02-01"), Some(30));
        // Wraps the year: late Dec vs early Jan is close.
        assert_eq!(circular_day_distance("12-31", "01-02"), Some(6));
    }
}
