//! Local timeline cache
//!
//! Holds the rows the client currently knows about, keyed for fast cell
//! lookup during rendering and dragging. Optimistic edits mutate this cache
//! before the server confirms; [`GridCache::checkpoint`] and
//! [`GridCache::restore`] give the rollback path when the server rejects.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::debug;

use teamgrid_api::timeline::model::{AssignmentGroupInfo, DayAssignmentInfo};

/// Rows of one assignment captured before an optimistic edit
///
/// Opaque to callers; hand it back to [`GridCache::restore`] to roll the
/// assignment back.
#[derive(Clone, Debug)]
pub struct AssignmentCheckpoint {
    assignment_id: i64,
    days: Vec<DayAssignmentInfo>,
    groups: Vec<AssignmentGroupInfo>,
}

/// Client-side cache of day assignments and assignment groups
#[derive(Default)]
pub struct GridCache {
    /// Day assignments keyed by (assignment id, date)
    days: DashMap<(i64, NaiveDate), DayAssignmentInfo>,
    /// Assignment groups keyed by group id
    groups: DashMap<i64, AssignmentGroupInfo>,
    /// Source of provisional ids for rows not yet confirmed by the server
    provisional_seq: AtomicI64,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next provisional id, always negative so it can never collide with a
    /// server-assigned one
    pub fn provisional_id(&self) -> i64 {
        -(self.provisional_seq.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Replace cached rows with freshly fetched ones
    pub fn prime_days(&self, days: Vec<DayAssignmentInfo>) {
        for day in days {
            self.days.insert((day.assignment_id, day.date), day);
        }
    }

    /// Replace cached groups with freshly fetched ones
    pub fn prime_groups(&self, groups: Vec<AssignmentGroupInfo>) {
        for group in groups {
            self.groups.insert(group.id, group);
        }
    }

    pub fn day_at(&self, assignment_id: i64, date: NaiveDate) -> Option<DayAssignmentInfo> {
        self.days
            .get(&(assignment_id, date))
            .map(|entry| entry.clone())
    }

    /// All cached dates of one assignment, ordered
    pub fn assignment_days(&self, assignment_id: i64) -> BTreeSet<NaiveDate> {
        self.days
            .iter()
            .filter(|entry| entry.assignment_id == assignment_id)
            .map(|entry| entry.date)
            .collect()
    }

    pub fn insert_day(&self, day: DayAssignmentInfo) {
        self.days.insert((day.assignment_id, day.date), day);
    }

    pub fn remove_day(&self, assignment_id: i64, date: NaiveDate) -> Option<DayAssignmentInfo> {
        self.days.remove(&(assignment_id, date)).map(|(_, day)| day)
    }

    pub fn group(&self, id: i64) -> Option<AssignmentGroupInfo> {
        self.groups.get(&id).map(|entry| entry.clone())
    }

    /// Cached groups of one assignment, ordered by start date
    pub fn assignment_groups(&self, assignment_id: i64) -> Vec<AssignmentGroupInfo> {
        let mut groups: Vec<AssignmentGroupInfo> = self
            .groups
            .iter()
            .filter(|entry| entry.assignment_id == assignment_id)
            .map(|entry| entry.clone())
            .collect();
        groups.sort_by_key(|group| group.start_date);
        groups
    }

    pub fn insert_group(&self, group: AssignmentGroupInfo) {
        self.groups.insert(group.id, group);
    }

    pub fn remove_group(&self, id: i64) -> Option<AssignmentGroupInfo> {
        self.groups.remove(&id).map(|(_, group)| group)
    }

    /// Capture all rows of one assignment ahead of an optimistic edit
    pub fn checkpoint(&self, assignment_id: i64) -> AssignmentCheckpoint {
        let days = self
            .days
            .iter()
            .filter(|entry| entry.assignment_id == assignment_id)
            .map(|entry| entry.clone())
            .collect();
        let groups = self
            .groups
            .iter()
            .filter(|entry| entry.assignment_id == assignment_id)
            .map(|entry| entry.clone())
            .collect();
        AssignmentCheckpoint {
            assignment_id,
            days,
            groups,
        }
    }

    /// Put one assignment back to a previously captured state
    pub fn restore(&self, checkpoint: AssignmentCheckpoint) {
        debug!(
            "rolling back cached rows of assignment {}",
            checkpoint.assignment_id
        );
        self.clear_assignment(checkpoint.assignment_id);
        for day in checkpoint.days {
            self.days.insert((day.assignment_id, day.date), day);
        }
        for group in checkpoint.groups {
            self.groups.insert(group.id, group);
        }
    }

    /// Drop every cached row of one assignment
    pub fn clear_assignment(&self, assignment_id: i64) {
        self.days.retain(|_, day| day.assignment_id != assignment_id);
        self.groups
            .retain(|_, group| group.assignment_id != assignment_id);
    }

    /// Drop every cached row touching an inclusive date window, ahead of a
    /// window refetch
    pub fn clear_window(&self, start_date: NaiveDate, end_date: NaiveDate) {
        self.days
            .retain(|(_, date), _| *date < start_date || *date > end_date);
        self.groups
            .retain(|_, group| group.end_date < start_date || group.start_date > end_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use teamgrid_common::Priority;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn day(id: i64, assignment_id: i64, d: u32) -> DayAssignmentInfo {
        DayAssignmentInfo {
            id,
            assignment_id,
            date: date(d),
            comment: None,
        }
    }

    #[test]
    fn test_prime_and_lookup() {
        let cache = GridCache::new();
        cache.prime_days(vec![day(1, 12, 2), day(2, 12, 3), day(3, 99, 2)]);

        assert_eq!(cache.day_at(12, date(2)).map(|d| d.id), Some(1));
        assert_eq!(cache.day_at(12, date(5)), None);
        assert_eq!(
            cache.assignment_days(12),
            BTreeSet::from([date(2), date(3)])
        );
    }

    #[test]
    fn test_checkpoint_restore_undoes_edits() {
        let cache = GridCache::new();
        cache.prime_days(vec![day(1, 12, 2), day(2, 12, 3)]);
        cache.prime_groups(vec![AssignmentGroupInfo {
            id: 7,
            assignment_id: 12,
            start_date: date(2),
            end_date: date(3),
            priority: Priority::High,
            comment: None,
        }]);

        let checkpoint = cache.checkpoint(12);

        cache.remove_day(12, date(2));
        cache.insert_day(day(cache.provisional_id(), 12, 9));
        cache.remove_group(7);

        cache.restore(checkpoint);

        assert_eq!(
            cache.assignment_days(12),
            BTreeSet::from([date(2), date(3)])
        );
        assert_eq!(cache.group(7).map(|g| g.priority), Some(Priority::High));
    }

    #[test]
    fn test_restore_leaves_other_assignments_alone() {
        let cache = GridCache::new();
        cache.prime_days(vec![day(1, 12, 2), day(2, 55, 2)]);

        let checkpoint = cache.checkpoint(12);
        cache.remove_day(12, date(2));
        cache.insert_day(day(3, 55, 4));
        cache.restore(checkpoint);

        assert_eq!(cache.assignment_days(55), BTreeSet::from([date(2), date(4)]));
    }

    #[test]
    fn test_provisional_ids_are_negative_and_distinct() {
        let cache = GridCache::new();
        let first = cache.provisional_id();
        let second = cache.provisional_id();
        assert!(first < 0);
        assert!(second < 0);
        assert_ne!(first, second);
    }
}
