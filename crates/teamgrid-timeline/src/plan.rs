//! Timeline mutation planning
//!
//! Planners turn a [`TimelineSnapshot`] and a requested edit into one
//! [`TimelineChange`]. They are pure over the snapshot, so every group
//! consequence of an edit is decided here and the persistence layer only
//! has to apply the change atomically.
//!
//! When two groups collapse into one, the group with the earlier start date
//! keeps its priority and comment and the other metadata is dropped with a
//! warning.

use chrono::NaiveDate;
use tracing::warn;

use teamgrid_common::{Priority, ScheduleError};
use teamgrid_persistence::{
    AssignmentGroupData, GroupWrite, NewDayAssignment, TimelineChange, TimelineSnapshot,
};

use crate::range::{DateRange, contiguous_range, shift_date};

/// A planned block move
#[derive(Debug, Clone)]
pub struct MovePlan {
    pub change: TimelineChange,
    /// Destination days that were already assigned outside the source range
    pub merged_days: u32,
}

/// Working copy of one group while a plan is being built
///
/// `source_ids` holds the stored groups this working group descends from:
/// empty for a group the plan creates, one id for a stored group that is
/// resized in place, several ids when stored groups merged.
#[derive(Debug, Clone)]
struct SimGroup {
    source_ids: Vec<i64>,
    range: DateRange,
    priority: Priority,
    comment: Option<String>,
    dirty: bool,
}

impl SimGroup {
    fn from_data(group: &AssignmentGroupData) -> Self {
        Self {
            source_ids: vec![group.id],
            range: DateRange::new(group.start_date, group.end_date),
            priority: group.priority,
            comment: group.comment.clone(),
            dirty: false,
        }
    }
}

fn emit_group_writes(mut sim: Vec<SimGroup>, change: &mut TimelineChange) {
    sim.sort_by_key(|g| g.range.start);
    for group in sim {
        if !group.dirty {
            continue;
        }
        let id = match group.source_ids.as_slice() {
            [] => None,
            [id] => Some(*id),
            ids => {
                change.delete_group_ids.extend_from_slice(ids);
                None
            }
        };
        change.upsert_groups.push(GroupWrite {
            id,
            start_date: group.range.start,
            end_date: group.range.end,
            priority: group.priority,
            comment: group.comment,
        });
    }
}

/// Plan the creation of one or more day assignments
///
/// Already assigned dates are skipped. Each inserted day that closes the gap
/// between two groups merges them; a day bordering one group extends it.
pub fn plan_days_creation(
    snapshot: &TimelineSnapshot,
    assignment_id: i64,
    days: &[(NaiveDate, Option<String>)],
) -> TimelineChange {
    let mut change = TimelineChange::new(assignment_id);
    let mut assigned = snapshot.days.clone();
    let mut sim: Vec<SimGroup> = snapshot.groups.iter().map(SimGroup::from_data).collect();

    let mut ordered: Vec<(NaiveDate, Option<String>)> = days.to_vec();
    ordered.sort_by_key(|(date, _)| *date);
    ordered.dedup_by_key(|(date, _)| *date);

    for (date, comment) in ordered {
        if !assigned.insert(date) {
            continue;
        }
        change.insert_days.push(NewDayAssignment { date, comment });

        let before = shift_date(date, -1);
        let after = shift_date(date, 1);
        let left = sim.iter().position(|g| g.range.end == before);
        let right = sim.iter().position(|g| g.range.start == after);
        match (left, right) {
            (Some(left), Some(right)) => {
                // remove the higher index first so the lower stays valid
                let (lo, hi) = if left < right {
                    (left, right)
                } else {
                    (right, left)
                };
                let second = sim.remove(hi);
                let first = sim.remove(lo);
                let (mut keep, other) = if first.range.start <= second.range.start {
                    (first, second)
                } else {
                    (second, first)
                };
                if keep.priority != other.priority || keep.comment != other.comment {
                    warn!(
                        "bridging day {} merges groups with differing metadata, keeping the earlier group's",
                        date
                    );
                }
                keep.range = DateRange::new(keep.range.start, other.range.end);
                keep.source_ids.extend(other.source_ids);
                keep.dirty = true;
                sim.push(keep);
            }
            (Some(left), None) => {
                sim[left].range.end = date;
                sim[left].dirty = true;
            }
            (None, Some(right)) => {
                sim[right].range.start = date;
                sim[right].dirty = true;
            }
            (None, None) => {}
        }
    }

    emit_group_writes(sim, &mut change);
    change
}

pub fn plan_day_creation(
    snapshot: &TimelineSnapshot,
    assignment_id: i64,
    date: NaiveDate,
    comment: Option<String>,
) -> TimelineChange {
    plan_days_creation(snapshot, assignment_id, &[(date, comment)])
}

/// Plan the deletion of one or more day assignments
///
/// Dates that are not assigned are skipped. Removing the last day of a group
/// deletes the group, removing a boundary day shrinks it and removing an
/// interior day splits it in two, both halves keeping the metadata.
pub fn plan_days_deletion(
    snapshot: &TimelineSnapshot,
    assignment_id: i64,
    dates: &[NaiveDate],
) -> TimelineChange {
    let mut change = TimelineChange::new(assignment_id);
    let mut assigned = snapshot.days.clone();
    let mut sim: Vec<SimGroup> = snapshot.groups.iter().map(SimGroup::from_data).collect();

    let mut ordered: Vec<NaiveDate> = dates.to_vec();
    ordered.sort();
    ordered.dedup();

    for date in ordered {
        if !assigned.remove(&date) {
            continue;
        }
        change.delete_days.push(date);

        let Some(idx) = sim.iter().position(|g| g.range.contains(date)) else {
            continue;
        };
        let range = sim[idx].range;
        if range.start == date && range.end == date {
            let removed = sim.remove(idx);
            change.delete_group_ids.extend(removed.source_ids);
        } else if range.start == date {
            sim[idx].range.start = shift_date(date, 1);
            sim[idx].dirty = true;
        } else if range.end == date {
            sim[idx].range.end = shift_date(date, -1);
            sim[idx].dirty = true;
        } else {
            let mut left = sim.remove(idx);
            let right = SimGroup {
                source_ids: Vec::new(),
                range: DateRange::new(shift_date(date, 1), left.range.end),
                priority: left.priority,
                comment: left.comment.clone(),
                dirty: true,
            };
            left.range.end = shift_date(date, -1);
            left.dirty = true;
            sim.push(left);
            sim.push(right);
        }
    }

    emit_group_writes(sim, &mut change);
    change
}

pub fn plan_day_deletion(
    snapshot: &TimelineSnapshot,
    assignment_id: i64,
    date: NaiveDate,
) -> TimelineChange {
    plan_days_deletion(snapshot, assignment_id, &[date])
}

/// Plan the creation of an assignment group over `[start_date, end_date]`
///
/// Every day of the range must be assigned. A range overlapping a stored
/// group is rejected with [`ScheduleError::GroupOverlap`] naming that group,
/// and so is a range touching a neighbor group with different metadata.
/// Touching neighbors with identical metadata are absorbed instead.
pub fn plan_group_creation(
    snapshot: &TimelineSnapshot,
    assignment_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    priority: Priority,
    comment: Option<String>,
) -> anyhow::Result<TimelineChange> {
    if start_date > end_date {
        return Err(ScheduleError::IllegalArgument(format!(
            "start date {} is after end date {}",
            start_date, end_date
        ))
        .into());
    }
    let range = DateRange::new(start_date, end_date);
    if let Some(missing) = range.iter_days().find(|d| !snapshot.days.contains(d)) {
        return Err(ScheduleError::IllegalArgument(format!(
            "day {} in the group range is not assigned",
            missing
        ))
        .into());
    }
    if let Some(existing) = snapshot
        .groups
        .iter()
        .find(|g| g.start_date <= end_date && start_date <= g.end_date)
    {
        return Err(ScheduleError::GroupOverlap(existing.id).into());
    }

    let left = snapshot
        .groups
        .iter()
        .find(|g| shift_date(g.end_date, 1) == start_date);
    let right = snapshot
        .groups
        .iter()
        .find(|g| shift_date(end_date, 1) == g.start_date);
    for neighbor in [left, right].into_iter().flatten() {
        if neighbor.priority != priority || neighbor.comment != comment {
            return Err(ScheduleError::GroupOverlap(neighbor.id).into());
        }
    }

    let mut change = TimelineChange::new(assignment_id);
    let write = match (left, right) {
        (Some(left), Some(right)) => {
            change.delete_group_ids.push(right.id);
            GroupWrite {
                id: Some(left.id),
                start_date: left.start_date,
                end_date: right.end_date,
                priority,
                comment,
            }
        }
        (Some(left), None) => GroupWrite {
            id: Some(left.id),
            start_date: left.start_date,
            end_date,
            priority,
            comment,
        },
        (None, Some(right)) => GroupWrite {
            id: Some(right.id),
            start_date,
            end_date: right.end_date,
            priority,
            comment,
        },
        (None, None) => GroupWrite {
            id: None,
            start_date,
            end_date,
            priority,
            comment,
        },
    };
    change.upsert_groups.push(write);
    Ok(change)
}

#[derive(Debug, Clone)]
struct MoveCandidate {
    id: i64,
    moved: bool,
    range: DateRange,
    priority: Priority,
    comment: Option<String>,
}

struct MoveCluster {
    end: NaiveDate,
    members: Vec<MoveCandidate>,
}

/// Plan moving the block `[start_date, end_date]` to
/// `[new_start_date, new_end_date]`
///
/// The source must be exactly one maximal run of assigned days and both
/// ranges must have the same length. Groups inside the source travel with
/// it; a travelled group that lands on or against another group merges into
/// it, the earlier start winning the metadata. Destination days that were
/// already assigned are counted in [`MovePlan::merged_days`].
pub fn plan_block_move(
    snapshot: &TimelineSnapshot,
    assignment_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    new_start_date: NaiveDate,
    new_end_date: NaiveDate,
) -> anyhow::Result<MovePlan> {
    if start_date > end_date || new_start_date > new_end_date {
        return Err(ScheduleError::IllegalArgument(format!(
            "range start must not be after range end: [{}, {}] -> [{}, {}]",
            start_date, end_date, new_start_date, new_end_date
        ))
        .into());
    }
    if end_date - start_date != new_end_date - new_start_date {
        return Err(ScheduleError::ShapeMismatch.into());
    }

    let source = DateRange::new(start_date, end_date);
    if !snapshot.days.contains(&start_date) || contiguous_range(&snapshot.days, start_date) != source
    {
        return Err(
            ScheduleError::NotABlock(start_date.to_string(), end_date.to_string()).into(),
        );
    }

    let offset = (new_start_date - start_date).num_days();
    if offset == 0 {
        return Ok(MovePlan {
            change: TimelineChange::new(assignment_id),
            merged_days: 0,
        });
    }
    let target = DateRange::new(new_start_date, new_end_date);

    let merged_days = snapshot
        .days
        .iter()
        .filter(|d| target.contains(**d) && !source.contains(**d))
        .count() as u32;

    let mut change = TimelineChange::new(assignment_id);
    for date in source.iter_days() {
        if !target.contains(date) {
            change.delete_days.push(date);
        }
    }
    for date in target.iter_days() {
        if !snapshot.days.contains(&date) {
            change.insert_days.push(NewDayAssignment {
                date,
                comment: None,
            });
        }
    }

    let mut candidates: Vec<MoveCandidate> = snapshot
        .groups
        .iter()
        .map(|g| {
            let range = DateRange::new(g.start_date, g.end_date);
            let moved = source.contains(g.start_date) && source.contains(g.end_date);
            MoveCandidate {
                id: g.id,
                moved,
                range: if moved { range.shifted_by(offset) } else { range },
                priority: g.priority,
                comment: g.comment.clone(),
            }
        })
        .collect();
    // on equal starts the group already at the destination sorts first
    candidates.sort_by_key(|c| (c.range.start, c.moved));

    let mut clusters: Vec<MoveCluster> = Vec::new();
    for candidate in candidates {
        if let Some(cluster) = clusters.last_mut() {
            if candidate.range.start <= shift_date(cluster.end, 1) {
                cluster.end = cluster.end.max(candidate.range.end);
                cluster.members.push(candidate);
                continue;
            }
        }
        clusters.push(MoveCluster {
            end: candidate.range.end,
            members: vec![candidate],
        });
    }

    for cluster in clusters {
        let mut members = cluster.members.into_iter();
        let Some(winner) = members.next() else {
            continue;
        };
        let rest: Vec<MoveCandidate> = members.collect();
        if rest.is_empty() {
            if winner.moved {
                change.upsert_groups.push(GroupWrite {
                    id: Some(winner.id),
                    start_date: winner.range.start,
                    end_date: winner.range.end,
                    priority: winner.priority,
                    comment: winner.comment,
                });
            }
            continue;
        }
        let end = rest
            .iter()
            .map(|c| c.range.end)
            .fold(winner.range.end, NaiveDate::max);
        if rest
            .iter()
            .any(|c| c.priority != winner.priority || c.comment != winner.comment)
        {
            warn!(
                "move of [{}, {}] merges groups with differing metadata, keeping the earliest group's",
                start_date, end_date
            );
        }
        change.delete_group_ids.push(winner.id);
        change
            .delete_group_ids
            .extend(rest.iter().map(|c| c.id));
        change.upsert_groups.push(GroupWrite {
            id: None,
            start_date: winner.range.start,
            end_date: end,
            priority: winner.priority,
            comment: winner.comment,
        });
    }

    Ok(MovePlan {
        change,
        merged_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn snapshot(
        days: &[&str],
        groups: &[(i64, &str, &str, Priority, Option<&str>)],
    ) -> TimelineSnapshot {
        TimelineSnapshot {
            days: days.iter().map(|s| date(s)).collect(),
            groups: groups
                .iter()
                .map(|(id, start, end, priority, comment)| AssignmentGroupData {
                    id: *id,
                    assignment_id: 7,
                    start_date: date(start),
                    end_date: date(end),
                    priority: *priority,
                    comment: comment.map(str::to_string),
                })
                .collect(),
        }
    }

    /// Apply a change to a snapshot the way a backend would, giving inserted
    /// groups synthetic negative ids
    pub(crate) fn apply(snap: &TimelineSnapshot, change: &TimelineChange) -> TimelineSnapshot {
        let mut days = snap.days.clone();
        for d in &change.delete_days {
            days.remove(d);
        }
        for d in &change.insert_days {
            days.insert(d.date);
        }
        let mut groups: Vec<AssignmentGroupData> = snap
            .groups
            .iter()
            .filter(|g| !change.delete_group_ids.contains(&g.id))
            .cloned()
            .collect();
        let mut next_id = -1;
        for write in &change.upsert_groups {
            match write.id {
                Some(id) => {
                    let group = groups
                        .iter_mut()
                        .find(|g| g.id == id)
                        .expect("upsert of unknown group id");
                    group.start_date = write.start_date;
                    group.end_date = write.end_date;
                    group.priority = write.priority;
                    group.comment = write.comment.clone();
                }
                None => {
                    groups.push(AssignmentGroupData {
                        id: next_id,
                        assignment_id: change.assignment_id,
                        start_date: write.start_date,
                        end_date: write.end_date,
                        priority: write.priority,
                        comment: write.comment.clone(),
                    });
                    next_id -= 1;
                }
            }
        }
        groups.sort_by_key(|g| g.start_date);
        TimelineSnapshot { days, groups }
    }

    /// Every group covered by assigned days, no overlaps, no two groups
    /// touching across consecutive days
    fn assert_invariants(snap: &TimelineSnapshot) {
        for group in &snap.groups {
            assert!(group.start_date <= group.end_date);
            for day in DateRange::new(group.start_date, group.end_date).iter_days() {
                assert!(
                    snap.days.contains(&day),
                    "group [{}, {}] covers unassigned day {}",
                    group.start_date,
                    group.end_date,
                    day
                );
            }
        }
        for pair in snap.groups.windows(2) {
            let gap = (pair[1].start_date - pair[0].end_date).num_days();
            assert!(
                gap >= 2,
                "groups [{}, {}] and [{}, {}] overlap or touch",
                pair[0].start_date,
                pair[0].end_date,
                pair[1].start_date,
                pair[1].end_date
            );
        }
    }

    fn unwrap_schedule_error(err: anyhow::Error) -> ScheduleError {
        match err.downcast::<ScheduleError>() {
            Ok(err) => err,
            Err(other) => panic!("not a schedule error: {:?}", other),
        }
    }

    // ==== day creation ====

    #[test]
    fn test_create_isolated_day() {
        let snap = snapshot(&["2026-01-05"], &[]);
        let change = plan_day_creation(&snap, 7, date("2026-01-07"), None);
        assert_eq!(change.insert_days.len(), 1);
        assert_eq!(change.insert_days[0].date, date("2026-01-07"));
        assert!(change.upsert_groups.is_empty());
        assert!(change.delete_group_ids.is_empty());
        assert_invariants(&apply(&snap, &change));
    }

    #[test]
    fn test_create_day_is_idempotent() {
        let snap = snapshot(&["2026-01-05"], &[]);
        let change = plan_day_creation(&snap, 7, date("2026-01-05"), Some("again".into()));
        assert!(change.is_empty());
    }

    #[test]
    fn test_create_day_extends_group() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-06"],
            &[(1, "2026-01-05", "2026-01-06", Priority::High, None)],
        );
        let change = plan_day_creation(&snap, 7, date("2026-01-07"), None);
        assert_eq!(change.upsert_groups.len(), 1);
        let write = &change.upsert_groups[0];
        assert_eq!(write.id, Some(1));
        assert_eq!(write.start_date, date("2026-01-05"));
        assert_eq!(write.end_date, date("2026-01-07"));
        assert_eq!(write.priority, Priority::High);
        assert_invariants(&apply(&snap, &change));
    }

    #[test]
    fn test_create_day_bridges_groups() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-06", "2026-01-08", "2026-01-09"],
            &[
                (1, "2026-01-05", "2026-01-06", Priority::High, Some("alpha")),
                (2, "2026-01-08", "2026-01-09", Priority::Low, Some("beta")),
            ],
        );
        let change = plan_day_creation(&snap, 7, date("2026-01-07"), None);
        assert_eq!(change.delete_group_ids, vec![1, 2]);
        assert_eq!(change.upsert_groups.len(), 1);
        let write = &change.upsert_groups[0];
        assert_eq!(write.id, None);
        assert_eq!(write.start_date, date("2026-01-05"));
        assert_eq!(write.end_date, date("2026-01-09"));
        assert_eq!(write.priority, Priority::High);
        assert_eq!(write.comment.as_deref(), Some("alpha"));
        assert_invariants(&apply(&snap, &change));
    }

    #[test]
    fn test_batch_create_chains_through_new_days() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-09"],
            &[
                (1, "2026-01-05", "2026-01-05", Priority::Normal, None),
                (2, "2026-01-09", "2026-01-09", Priority::Normal, None),
            ],
        );
        let days: Vec<(NaiveDate, Option<String>)> = ["2026-01-06", "2026-01-07", "2026-01-08"]
            .iter()
            .map(|s| (date(s), None))
            .collect();
        let change = plan_days_creation(&snap, 7, &days);
        assert_eq!(change.insert_days.len(), 3);
        // day 06 extends group 1, day 08 extends group 2, day 07 bridges them
        assert_eq!(change.delete_group_ids, vec![1, 2]);
        assert_eq!(change.upsert_groups.len(), 1);
        assert_eq!(change.upsert_groups[0].start_date, date("2026-01-05"));
        assert_eq!(change.upsert_groups[0].end_date, date("2026-01-09"));
        let applied = apply(&snap, &change);
        assert_eq!(applied.days.len(), 5);
        assert_invariants(&applied);
    }

    // ==== day deletion ====

    #[test]
    fn test_delete_absent_day_is_idempotent() {
        let snap = snapshot(&["2026-01-05"], &[]);
        let change = plan_day_deletion(&snap, 7, date("2026-01-06"));
        assert!(change.is_empty());
    }

    #[test]
    fn test_delete_last_day_of_group() {
        let snap = snapshot(
            &["2026-01-05"],
            &[(1, "2026-01-05", "2026-01-05", Priority::Low, None)],
        );
        let change = plan_day_deletion(&snap, 7, date("2026-01-05"));
        assert_eq!(change.delete_days, vec![date("2026-01-05")]);
        assert_eq!(change.delete_group_ids, vec![1]);
        assert!(change.upsert_groups.is_empty());
        let applied = apply(&snap, &change);
        assert!(applied.days.is_empty());
        assert!(applied.groups.is_empty());
    }

    #[test]
    fn test_delete_boundary_day_shrinks_group() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-06", "2026-01-07"],
            &[(1, "2026-01-05", "2026-01-07", Priority::Normal, None)],
        );
        let change = plan_day_deletion(&snap, 7, date("2026-01-05"));
        assert_eq!(change.upsert_groups.len(), 1);
        assert_eq!(change.upsert_groups[0].id, Some(1));
        assert_eq!(change.upsert_groups[0].start_date, date("2026-01-06"));
        assert_eq!(change.upsert_groups[0].end_date, date("2026-01-07"));
        assert_invariants(&apply(&snap, &change));
    }

    #[test]
    fn test_delete_interior_day_splits_group() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-06", "2026-01-07"],
            &[(1, "2026-01-05", "2026-01-07", Priority::High, Some("x"))],
        );
        let change = plan_day_deletion(&snap, 7, date("2026-01-06"));
        assert_eq!(change.delete_days, vec![date("2026-01-06")]);
        assert!(change.delete_group_ids.is_empty());
        assert_eq!(change.upsert_groups.len(), 2);
        let left = &change.upsert_groups[0];
        let right = &change.upsert_groups[1];
        assert_eq!(left.id, Some(1));
        assert_eq!(left.start_date, date("2026-01-05"));
        assert_eq!(left.end_date, date("2026-01-05"));
        assert_eq!(right.id, None);
        assert_eq!(right.start_date, date("2026-01-07"));
        assert_eq!(right.end_date, date("2026-01-07"));
        for write in &change.upsert_groups {
            assert_eq!(write.priority, Priority::High);
            assert_eq!(write.comment.as_deref(), Some("x"));
        }
        assert_invariants(&apply(&snap, &change));
    }

    #[test]
    fn test_batch_delete_whole_group() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-06", "2026-01-07"],
            &[(1, "2026-01-05", "2026-01-07", Priority::Normal, None)],
        );
        let dates = vec![date("2026-01-05"), date("2026-01-06"), date("2026-01-07")];
        let change = plan_days_deletion(&snap, 7, &dates);
        assert_eq!(change.delete_days.len(), 3);
        assert_eq!(change.delete_group_ids, vec![1]);
        assert!(change.upsert_groups.is_empty());
    }

    // ==== group creation ====

    #[test]
    fn test_group_creation_over_assigned_days() {
        let snap = snapshot(&["2026-01-05", "2026-01-06"], &[]);
        let change =
            plan_group_creation(&snap, 7, date("2026-01-05"), date("2026-01-06"), Priority::High, None)
                .unwrap();
        assert_eq!(change.upsert_groups.len(), 1);
        assert_eq!(change.upsert_groups[0].id, None);
        assert_invariants(&apply(&snap, &change));
    }

    #[test]
    fn test_group_creation_rejects_unassigned_day() {
        let snap = snapshot(&["2026-01-05", "2026-01-07"], &[]);
        let err =
            plan_group_creation(&snap, 7, date("2026-01-05"), date("2026-01-07"), Priority::Normal, None)
                .unwrap_err();
        match unwrap_schedule_error(err) {
            ScheduleError::IllegalArgument(msg) => assert!(msg.contains("2026-01-06")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_group_creation_rejects_inverted_range() {
        let snap = snapshot(&["2026-01-05"], &[]);
        let err =
            plan_group_creation(&snap, 7, date("2026-01-06"), date("2026-01-05"), Priority::Normal, None)
                .unwrap_err();
        assert!(matches!(
            unwrap_schedule_error(err),
            ScheduleError::IllegalArgument(_)
        ));
    }

    #[test]
    fn test_group_creation_conflicts_with_overlap() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-06", "2026-01-07"],
            &[(31, "2026-01-05", "2026-01-06", Priority::Normal, None)],
        );
        let err =
            plan_group_creation(&snap, 7, date("2026-01-06"), date("2026-01-07"), Priority::Normal, None)
                .unwrap_err();
        match unwrap_schedule_error(err) {
            ScheduleError::GroupOverlap(id) => assert_eq!(id, 31),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_group_creation_absorbs_matching_neighbor() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-06", "2026-01-07"],
            &[(31, "2026-01-05", "2026-01-05", Priority::High, Some("a"))],
        );
        let change = plan_group_creation(
            &snap,
            7,
            date("2026-01-06"),
            date("2026-01-07"),
            Priority::High,
            Some("a".into()),
        )
        .unwrap();
        assert_eq!(change.upsert_groups.len(), 1);
        assert_eq!(change.upsert_groups[0].id, Some(31));
        assert_eq!(change.upsert_groups[0].start_date, date("2026-01-05"));
        assert_eq!(change.upsert_groups[0].end_date, date("2026-01-07"));
        assert_invariants(&apply(&snap, &change));
    }

    #[test]
    fn test_group_creation_conflicts_with_touching_neighbor() {
        let snap = snapshot(
            &["2026-01-05", "2026-01-06", "2026-01-07"],
            &[(31, "2026-01-05", "2026-01-05", Priority::High, None)],
        );
        let err = plan_group_creation(
            &snap,
            7,
            date("2026-01-06"),
            date("2026-01-07"),
            Priority::Low,
            None,
        )
        .unwrap_err();
        match unwrap_schedule_error(err) {
            ScheduleError::GroupOverlap(id) => assert_eq!(id, 31),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_group_creation_bridges_matching_neighbors() {
        let snap = snapshot(
            &[
                "2026-01-05",
                "2026-01-06",
                "2026-01-07",
                "2026-01-08",
                "2026-01-09",
            ],
            &[
                (31, "2026-01-05", "2026-01-05", Priority::Normal, None),
                (32, "2026-01-09", "2026-01-09", Priority::Normal, None),
            ],
        );
        let change = plan_group_creation(
            &snap,
            7,
            date("2026-01-06"),
            date("2026-01-08"),
            Priority::Normal,
            None,
        )
        .unwrap();
        assert_eq!(change.delete_group_ids, vec![32]);
        assert_eq!(change.upsert_groups.len(), 1);
        assert_eq!(change.upsert_groups[0].id, Some(31));
        assert_eq!(change.upsert_groups[0].start_date, date("2026-01-05"));
        assert_eq!(change.upsert_groups[0].end_date, date("2026-01-09"));
        assert_invariants(&apply(&snap, &change));
    }

    // ==== block moves ====

    #[test]
    fn test_move_rejects_shape_mismatch() {
        let snap = snapshot(&["2026-02-01", "2026-02-02"], &[]);
        let err = plan_block_move(
            &snap,
            7,
            date("2026-02-01"),
            date("2026-02-02"),
            date("2026-02-06"),
            date("2026-02-08"),
        )
        .unwrap_err();
        assert!(matches!(
            unwrap_schedule_error(err),
            ScheduleError::ShapeMismatch
        ));
    }

    #[test]
    fn test_move_rejects_partial_run() {
        let snap = snapshot(&["2026-02-01", "2026-02-02", "2026-02-03"], &[]);
        let err = plan_block_move(
            &snap,
            7,
            date("2026-02-01"),
            date("2026-02-02"),
            date("2026-02-06"),
            date("2026-02-07"),
        )
        .unwrap_err();
        assert!(matches!(
            unwrap_schedule_error(err),
            ScheduleError::NotABlock(_, _)
        ));
    }

    #[test]
    fn test_move_rejects_range_with_gap() {
        let snap = snapshot(&["2026-02-01", "2026-02-03"], &[]);
        let err = plan_block_move(
            &snap,
            7,
            date("2026-02-01"),
            date("2026-02-03"),
            date("2026-02-06"),
            date("2026-02-08"),
        )
        .unwrap_err();
        assert!(matches!(
            unwrap_schedule_error(err),
            ScheduleError::NotABlock(_, _)
        ));
    }

    #[test]
    fn test_move_with_zero_offset_is_a_no_op() {
        let snap = snapshot(&["2026-02-01", "2026-02-02"], &[]);
        let plan = plan_block_move(
            &snap,
            7,
            date("2026-02-01"),
            date("2026-02-02"),
            date("2026-02-01"),
            date("2026-02-02"),
        )
        .unwrap();
        assert!(plan.change.is_empty());
        assert_eq!(plan.merged_days, 0);
    }

    #[test]
    fn test_move_counts_merged_days() {
        let snap = snapshot(
            &["2026-02-01", "2026-02-02", "2026-02-03", "2026-02-07"],
            &[],
        );
        let plan = plan_block_move(
            &snap,
            7,
            date("2026-02-01"),
            date("2026-02-03"),
            date("2026-02-06"),
            date("2026-02-08"),
        )
        .unwrap();
        assert_eq!(plan.merged_days, 1);
        assert_eq!(
            plan.change.delete_days,
            vec![date("2026-02-01"), date("2026-02-02"), date("2026-02-03")]
        );
        let inserted: Vec<NaiveDate> = plan.change.insert_days.iter().map(|d| d.date).collect();
        assert_eq!(inserted, vec![date("2026-02-06"), date("2026-02-08")]);
        let applied = apply(&snap, &plan.change);
        let expected: BTreeSet<NaiveDate> = ["2026-02-06", "2026-02-07", "2026-02-08"]
            .iter()
            .map(|s| date(s))
            .collect();
        assert_eq!(applied.days, expected);
    }

    #[test]
    fn test_move_translates_groups() {
        let snap = snapshot(
            &["2026-02-01", "2026-02-02", "2026-02-03"],
            &[(41, "2026-02-01", "2026-02-02", Priority::High, Some("q"))],
        );
        let plan = plan_block_move(
            &snap,
            7,
            date("2026-02-01"),
            date("2026-02-03"),
            date("2026-02-11"),
            date("2026-02-13"),
        )
        .unwrap();
        assert_eq!(plan.merged_days, 0);
        assert_eq!(plan.change.upsert_groups.len(), 1);
        let write = &plan.change.upsert_groups[0];
        assert_eq!(write.id, Some(41));
        assert_eq!(write.start_date, date("2026-02-11"));
        assert_eq!(write.end_date, date("2026-02-12"));
        assert_eq!(write.priority, Priority::High);
        assert_invariants(&apply(&snap, &plan.change));
    }

    #[test]
    fn test_move_merges_landed_group_into_destination_group() {
        let snap = snapshot(
            &[
                "2026-02-01",
                "2026-02-02",
                "2026-02-05",
                "2026-02-06",
            ],
            &[
                (41, "2026-02-01", "2026-02-02", Priority::Low, Some("moved")),
                (42, "2026-02-05", "2026-02-06", Priority::High, Some("kept")),
            ],
        );
        // lands [02-04, 02-05], overlapping group 42
        let plan = plan_block_move(
            &snap,
            7,
            date("2026-02-01"),
            date("2026-02-02"),
            date("2026-02-04"),
            date("2026-02-05"),
        )
        .unwrap();
        assert_eq!(plan.merged_days, 1);
        let mut deleted = plan.change.delete_group_ids.clone();
        deleted.sort();
        assert_eq!(deleted, vec![41, 42]);
        assert_eq!(plan.change.upsert_groups.len(), 1);
        let write = &plan.change.upsert_groups[0];
        assert_eq!(write.id, None);
        assert_eq!(write.start_date, date("2026-02-04"));
        assert_eq!(write.end_date, date("2026-02-06"));
        // the moved group starts earlier after translation, its metadata wins
        assert_eq!(write.priority, Priority::Low);
        assert_eq!(write.comment.as_deref(), Some("moved"));
        let applied = apply(&snap, &plan.change);
        assert_invariants(&applied);
        assert_eq!(applied.groups.len(), 1);
    }

    #[test]
    fn test_move_prefers_destination_group_on_equal_start() {
        let snap = snapshot(
            &["2026-02-01", "2026-02-02", "2026-02-05", "2026-02-06"],
            &[
                (41, "2026-02-01", "2026-02-02", Priority::Low, None),
                (42, "2026-02-05", "2026-02-06", Priority::High, None),
            ],
        );
        let plan = plan_block_move(
            &snap,
            7,
            date("2026-02-01"),
            date("2026-02-02"),
            date("2026-02-05"),
            date("2026-02-06"),
        )
        .unwrap();
        assert_eq!(plan.merged_days, 2);
        assert_eq!(plan.change.upsert_groups.len(), 1);
        assert_eq!(plan.change.upsert_groups[0].priority, Priority::High);
        assert_invariants(&apply(&snap, &plan.change));
    }

    #[test]
    fn test_move_left_keeps_untouched_groups() {
        let snap = snapshot(
            &["2026-02-10", "2026-02-11", "2026-02-20"],
            &[
                (41, "2026-02-10", "2026-02-11", Priority::Normal, None),
                (42, "2026-02-20", "2026-02-20", Priority::High, None),
            ],
        );
        let plan = plan_block_move(
            &snap,
            7,
            date("2026-02-10"),
            date("2026-02-11"),
            date("2026-02-03"),
            date("2026-02-04"),
        )
        .unwrap();
        assert_eq!(plan.merged_days, 0);
        assert!(plan.change.delete_group_ids.is_empty());
        assert_eq!(plan.change.upsert_groups.len(), 1);
        assert_eq!(plan.change.upsert_groups[0].id, Some(41));
        assert_eq!(plan.change.upsert_groups[0].start_date, date("2026-02-03"));
        let applied = apply(&snap, &plan.change);
        assert_invariants(&applied);
        assert_eq!(applied.groups.len(), 2);
    }
}
