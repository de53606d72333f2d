use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

/// Closed range of calendar days, both endpoints inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True when the two ranges overlap or meet without a gap between them.
    pub fn touches(&self, other: &DateRange) -> bool {
        let left = self.start.min(other.start);
        let right = self.end.max(other.end);
        (right - left).num_days() + 1 <= self.len_days() + other.len_days()
    }

    pub fn shifted_by(&self, days: i64) -> DateRange {
        DateRange {
            start: shift_date(self.start, days),
            end: shift_date(self.end, days),
        }
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            if *d < end { d.succ_opt() } else { None }
        })
    }
}

pub fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

pub fn is_assigned(days: &BTreeSet<NaiveDate>, date: NaiveDate) -> bool {
    days.contains(&date)
}

/// The maximal run of consecutive assigned days around `date`.
///
/// When `date` itself is not assigned the result is the degenerate range
/// `[date, date]`; callers that care must check [`is_assigned`] first.
pub fn contiguous_range(days: &BTreeSet<NaiveDate>, date: NaiveDate) -> DateRange {
    if !days.contains(&date) {
        return DateRange::single(date);
    }
    let mut start = date;
    while let Some(prev) = start.pred_opt() {
        if !days.contains(&prev) {
            break;
        }
        start = prev;
    }
    let mut end = date;
    while let Some(next) = end.succ_opt() {
        if !days.contains(&next) {
            break;
        }
        end = next;
    }
    DateRange { start, end }
}

/// True when `date` is assigned and the previous day is not.
pub fn is_first_of_range(days: &BTreeSet<NaiveDate>, date: NaiveDate) -> bool {
    days.contains(&date) && date.pred_opt().is_none_or(|prev| !days.contains(&prev))
}

/// True when `date` is assigned and the following day is not.
pub fn is_last_of_range(days: &BTreeSet<NaiveDate>, date: NaiveDate) -> bool {
    days.contains(&date) && date.succ_opt().is_none_or(|next| !days.contains(&next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn days(dates: &[&str]) -> BTreeSet<NaiveDate> {
        dates.iter().map(|s| date(s)).collect()
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(date("2026-01-07"), date("2026-01-05"));
        assert_eq!(range.start, date("2026-01-05"));
        assert_eq!(range.end, date("2026-01-07"));
        assert_eq!(range.len_days(), 3);
        assert!(range.contains(date("2026-01-06")));
        assert!(!range.contains(date("2026-01-08")));

        let shifted = range.shifted_by(5);
        assert_eq!(shifted.start, date("2026-01-10"));
        assert_eq!(shifted.end, date("2026-01-12"));
        assert_eq!(range.shifted_by(-4).start, date("2026-01-01"));

        let collected: Vec<NaiveDate> = range.iter_days().collect();
        assert_eq!(
            collected,
            vec![date("2026-01-05"), date("2026-01-06"), date("2026-01-07")]
        );
    }

    #[test]
    fn test_touches() {
        let a = DateRange::new(date("2026-01-05"), date("2026-01-07"));
        assert!(a.overlaps(&DateRange::new(date("2026-01-07"), date("2026-01-09"))));
        assert!(!a.overlaps(&DateRange::new(date("2026-01-08"), date("2026-01-09"))));
        assert!(a.touches(&DateRange::new(date("2026-01-08"), date("2026-01-09"))));
        assert!(!a.touches(&DateRange::new(date("2026-01-09"), date("2026-01-10"))));
    }

    #[test]
    fn test_contiguous_range() {
        let days = days(&[
            "2026-01-05",
            "2026-01-06",
            "2026-01-07",
            "2026-01-09",
            "2026-01-10",
        ]);

        let run = contiguous_range(&days, date("2026-01-06"));
        assert_eq!(run, DateRange::new(date("2026-01-05"), date("2026-01-07")));

        let run = contiguous_range(&days, date("2026-01-09"));
        assert_eq!(run, DateRange::new(date("2026-01-09"), date("2026-01-10")));

        let unassigned = contiguous_range(&days, date("2026-01-08"));
        assert_eq!(unassigned, DateRange::single(date("2026-01-08")));
    }

    #[test]
    fn test_range_boundaries() {
        let days = days(&["2026-01-05", "2026-01-06", "2026-01-07"]);

        assert!(is_first_of_range(&days, date("2026-01-05")));
        assert!(!is_first_of_range(&days, date("2026-01-06")));
        assert!(!is_first_of_range(&days, date("2026-01-04")));

        assert!(is_last_of_range(&days, date("2026-01-07")));
        assert!(!is_last_of_range(&days, date("2026-01-06")));
        assert!(!is_last_of_range(&days, date("2026-01-08")));
    }
}

#[cfg(test)]
mod props {
    use proptest::prelude::*;

    use super::*;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn day_set() -> impl Strategy<Value = BTreeSet<NaiveDate>> {
        prop::collection::btree_set(0i64..60, 0..40)
            .prop_map(|offsets| offsets.into_iter().map(|o| shift_date(base_date(), o)).collect())
    }

    proptest! {
        #[test]
        fn contiguous_range_is_maximal(days in day_set(), offset in 0i64..60) {
            let probe = shift_date(base_date(), offset);
            let run = contiguous_range(&days, probe);
            prop_assert!(run.contains(probe));
            if days.contains(&probe) {
                for day in run.iter_days() {
                    prop_assert!(days.contains(&day));
                }
                prop_assert!(!days.contains(&shift_date(run.start, -1)));
                prop_assert!(!days.contains(&shift_date(run.end, 1)));
                prop_assert!(is_first_of_range(&days, run.start));
                prop_assert!(is_last_of_range(&days, run.end));
            } else {
                prop_assert_eq!(run, DateRange::single(probe));
            }
        }

        #[test]
        fn every_day_of_a_run_resolves_the_same_run(days in day_set(), offset in 0i64..60) {
            let probe = shift_date(base_date(), offset);
            prop_assume!(days.contains(&probe));
            let run = contiguous_range(&days, probe);
            for day in run.iter_days() {
                prop_assert_eq!(contiguous_range(&days, day), run);
            }
        }
    }
}
