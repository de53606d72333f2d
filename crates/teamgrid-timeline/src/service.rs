//! Timeline service layer
//!
//! Orchestrates the planners against a [`ScheduleStore`]: load the
//! assignment's snapshot, plan the change, apply it atomically, publish the
//! change events.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use teamgrid_common::{Priority, ScheduleError};
use teamgrid_core::service::{ScheduleChangeEvent, ScheduleChangeEventPublisher};
use teamgrid_persistence::{
    AssignmentGroupData, CalendarStore, DayAssignmentData, DayOffData, RosterStore, ScheduleStore,
    TimelineChange, TimelineQueryFilter, TimelineStore,
};

use crate::plan;

async fn require_assignment(
    store: &dyn ScheduleStore,
    assignment_id: i64,
) -> anyhow::Result<()> {
    if store.assignment_get_by_id(assignment_id).await?.is_none() {
        return Err(ScheduleError::NotFound("assignment", assignment_id).into());
    }
    Ok(())
}

async fn publish_change(publisher: &ScheduleChangeEventPublisher, change: &TimelineChange) {
    if !change.insert_days.is_empty() || !change.delete_days.is_empty() {
        let mut dates: Vec<NaiveDate> = change.insert_days.iter().map(|d| d.date).collect();
        dates.extend(&change.delete_days);
        publisher
            .publish(ScheduleChangeEvent::day_assignments_changed(
                change.assignment_id,
                dates,
            ))
            .await;
    }
    if !change.delete_group_ids.is_empty() || !change.upsert_groups.is_empty() {
        publisher
            .publish(ScheduleChangeEvent::assignment_groups_changed(
                change.assignment_id,
            ))
            .await;
    }
}

/// Create a day assignment, extending or merging any touching groups
///
/// Returns the existing row unchanged when the date is already assigned.
pub async fn create_day_assignment(
    store: &dyn ScheduleStore,
    publisher: &ScheduleChangeEventPublisher,
    assignment_id: i64,
    date: NaiveDate,
    comment: Option<String>,
) -> anyhow::Result<DayAssignmentData> {
    require_assignment(store, assignment_id).await?;
    if let Some(existing) = store.day_find(assignment_id, date).await? {
        return Ok(existing);
    }

    let snapshot = store.timeline_snapshot(assignment_id).await?;
    let change = plan::plan_day_creation(&snapshot, assignment_id, date, comment);
    let applied = store.apply_change(&change).await?;
    publish_change(publisher, &change).await;

    applied
        .created_days
        .into_iter()
        .next()
        .ok_or_else(|| ScheduleError::InternalError("day creation wrote no day".into()).into())
}

/// Create several day assignments for one assignment as one atomic write
///
/// Already assigned dates are skipped; the created rows are returned.
pub async fn create_day_assignments(
    store: &dyn ScheduleStore,
    publisher: &ScheduleChangeEventPublisher,
    assignment_id: i64,
    dates: &[NaiveDate],
) -> anyhow::Result<Vec<DayAssignmentData>> {
    if dates.is_empty() {
        return Err(ScheduleError::IllegalArgument("dates must not be empty".into()).into());
    }
    require_assignment(store, assignment_id).await?;

    let snapshot = store.timeline_snapshot(assignment_id).await?;
    let days: Vec<(NaiveDate, Option<String>)> = dates.iter().map(|d| (*d, None)).collect();
    let change = plan::plan_days_creation(&snapshot, assignment_id, &days);
    let applied = store.apply_change(&change).await?;
    publish_change(publisher, &change).await;

    Ok(applied.created_days)
}

/// Delete a day assignment by id, shrinking or splitting its group
///
/// Returns `false` when the id is unknown.
pub async fn delete_day_assignment(
    store: &dyn ScheduleStore,
    publisher: &ScheduleChangeEventPublisher,
    id: i64,
) -> anyhow::Result<bool> {
    let Some(day) = store.day_get_by_id(id).await? else {
        return Ok(false);
    };

    let snapshot = store.timeline_snapshot(day.assignment_id).await?;
    let change = plan::plan_day_deletion(&snapshot, day.assignment_id, day.date);
    store.apply_change(&change).await?;
    publish_change(publisher, &change).await;

    Ok(true)
}

/// Delete several day assignments, possibly across assignments, as one
/// atomic write
///
/// Fails with [`ScheduleError::NotFound`] before writing anything when any
/// id is unknown.
pub async fn delete_day_assignments(
    store: &dyn ScheduleStore,
    publisher: &ScheduleChangeEventPublisher,
    ids: &[i64],
) -> anyhow::Result<()> {
    if ids.is_empty() {
        return Err(ScheduleError::IllegalArgument("ids must not be empty".into()).into());
    }

    let mut by_assignment: BTreeMap<i64, Vec<NaiveDate>> = BTreeMap::new();
    for id in ids {
        let Some(day) = store.day_get_by_id(*id).await? else {
            return Err(ScheduleError::NotFound("day assignment", *id).into());
        };
        by_assignment
            .entry(day.assignment_id)
            .or_default()
            .push(day.date);
    }

    let mut changes = Vec::with_capacity(by_assignment.len());
    for (assignment_id, dates) in &by_assignment {
        let snapshot = store.timeline_snapshot(*assignment_id).await?;
        changes.push(plan::plan_days_deletion(&snapshot, *assignment_id, dates));
    }
    store.apply_changes(&changes).await?;
    for change in &changes {
        publish_change(publisher, change).await;
    }

    Ok(())
}

/// Create an assignment group over a range of assigned days
pub async fn create_assignment_group(
    store: &dyn ScheduleStore,
    publisher: &ScheduleChangeEventPublisher,
    assignment_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    priority: Priority,
    comment: Option<String>,
) -> anyhow::Result<AssignmentGroupData> {
    require_assignment(store, assignment_id).await?;

    let snapshot = store.timeline_snapshot(assignment_id).await?;
    let change = plan::plan_group_creation(
        &snapshot,
        assignment_id,
        start_date,
        end_date,
        priority,
        comment,
    )?;
    let applied = store.apply_change(&change).await?;
    publish_change(publisher, &change).await;

    applied
        .groups
        .into_iter()
        .next()
        .ok_or_else(|| ScheduleError::InternalError("group creation wrote no group".into()).into())
}

/// Rewrite the priority and comment of an assignment group
///
/// Returns `None` when the id is unknown.
pub async fn update_assignment_group(
    store: &dyn ScheduleStore,
    publisher: &ScheduleChangeEventPublisher,
    id: i64,
    priority: Priority,
    comment: Option<String>,
) -> anyhow::Result<Option<AssignmentGroupData>> {
    let Some(updated) = store.group_update_metadata(id, priority, comment).await? else {
        return Ok(None);
    };
    publisher
        .publish(ScheduleChangeEvent::assignment_groups_changed(
            updated.assignment_id,
        ))
        .await;
    Ok(Some(updated))
}

/// Move a contiguous block of day assignments to a new range
///
/// Returns the number of destination days that were already assigned and
/// got merged into the moved block.
pub async fn move_assignment_block(
    store: &dyn ScheduleStore,
    publisher: &ScheduleChangeEventPublisher,
    assignment_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    new_start_date: NaiveDate,
    new_end_date: NaiveDate,
) -> anyhow::Result<u32> {
    require_assignment(store, assignment_id).await?;

    let snapshot = store.timeline_snapshot(assignment_id).await?;
    let plan = plan::plan_block_move(
        &snapshot,
        assignment_id,
        start_date,
        end_date,
        new_start_date,
        new_end_date,
    )?;
    if plan.change.is_empty() {
        return Ok(plan.merged_days);
    }
    store.apply_change(&plan.change).await?;
    publish_change(publisher, &plan.change).await;

    Ok(plan.merged_days)
}

/// Set a day off for a member, clearing the member's day assignments on
/// that date with the usual group consequences, all in one atomic write
pub async fn create_day_off(
    store: &dyn ScheduleStore,
    publisher: &ScheduleChangeEventPublisher,
    member_id: i64,
    date: NaiveDate,
) -> anyhow::Result<DayOffData> {
    if store.member_get_by_id(member_id).await?.is_none() {
        return Err(ScheduleError::NotFound("team member", member_id).into());
    }
    if let Some(existing) = store.day_off_find(member_id, date).await? {
        return Ok(existing);
    }

    let affected = store.member_days_on(member_id, date).await?;
    let mut changes = Vec::with_capacity(affected.len());
    for day in &affected {
        let snapshot = store.timeline_snapshot(day.assignment_id).await?;
        changes.push(plan::plan_day_deletion(&snapshot, day.assignment_id, day.date));
    }
    let day_off = store.day_off_create(member_id, date, &changes).await?;

    publisher
        .publish(ScheduleChangeEvent::day_off_changed(member_id, date))
        .await;
    for change in &changes {
        publish_change(publisher, change).await;
    }

    Ok(day_off)
}

/// Day assignments in an inclusive date range
pub async fn find_day_assignments(
    store: &dyn ScheduleStore,
    filter: &TimelineQueryFilter,
) -> anyhow::Result<Vec<DayAssignmentData>> {
    store.days_find_in_range(filter).await
}

/// Assignment groups intersecting an inclusive date range
pub async fn find_assignment_groups(
    store: &dyn ScheduleStore,
    filter: &TimelineQueryFilter,
) -> anyhow::Result<Vec<AssignmentGroupData>> {
    store.groups_find_in_range(filter).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamgrid_persistence::MemoryScheduleStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn seeded() -> (MemoryScheduleStore, ScheduleChangeEventPublisher, i64, i64) {
        let store = MemoryScheduleStore::new();
        let customer = store.customer_create("Acme").await.unwrap();
        let project = store
            .project_create(customer.id, "Website", None)
            .await
            .unwrap();
        let member = store
            .member_create("Dana", None, "[true,true,true,true,true,false,false]")
            .await
            .unwrap();
        let assignment = store.assignment_create(project.id, member.id).await.unwrap();
        let publisher = ScheduleChangeEventPublisher::new(16);
        publisher.start().await;
        (store, publisher, assignment.id, member.id)
    }

    #[tokio::test]
    async fn test_create_day_then_group_then_split() {
        let (store, publisher, assignment_id, _) = seeded().await;

        for day in ["2026-01-05", "2026-01-06", "2026-01-07"] {
            create_day_assignment(&store, &publisher, assignment_id, date(day), None)
                .await
                .unwrap();
        }
        let group = create_assignment_group(
            &store,
            &publisher,
            assignment_id,
            date("2026-01-05"),
            date("2026-01-07"),
            Priority::High,
            None,
        )
        .await
        .unwrap();
        assert_eq!(group.start_date, date("2026-01-05"));
        assert_eq!(group.end_date, date("2026-01-07"));

        // deleting the middle day splits the group into two high groups
        let middle = store
            .day_find(assignment_id, date("2026-01-06"))
            .await
            .unwrap()
            .unwrap();
        assert!(delete_day_assignment(&store, &publisher, middle.id)
            .await
            .unwrap());

        let snapshot = store.timeline_snapshot(assignment_id).await.unwrap();
        assert_eq!(snapshot.days.len(), 2);
        assert_eq!(snapshot.groups.len(), 2);
        assert!(snapshot.groups.iter().all(|g| g.priority == Priority::High));
        assert_eq!(snapshot.groups[0].start_date, date("2026-01-05"));
        assert_eq!(snapshot.groups[0].end_date, date("2026-01-05"));
        assert_eq!(snapshot.groups[1].start_date, date("2026-01-07"));
        assert_eq!(snapshot.groups[1].end_date, date("2026-01-07"));
        store.verify_timeline_invariants(assignment_id).unwrap();
    }

    #[tokio::test]
    async fn test_create_day_is_idempotent() {
        let (store, publisher, assignment_id, _) = seeded().await;

        let first =
            create_day_assignment(&store, &publisher, assignment_id, date("2026-01-05"), None)
                .await
                .unwrap();
        let second = create_day_assignment(
            &store,
            &publisher,
            assignment_id,
            date("2026-01-05"),
            Some("ignored".into()),
        )
        .await
        .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_create_day_requires_assignment() {
        let (store, publisher, _, _) = seeded().await;

        let err = create_day_assignment(&store, &publisher, 999, date("2026-01-05"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::NotFound("assignment", 999))
        ));
    }

    #[tokio::test]
    async fn test_group_conflict_reports_existing_group() {
        let (store, publisher, assignment_id, _) = seeded().await;

        let dates: Vec<NaiveDate> = ["2026-01-05", "2026-01-06", "2026-01-07"]
            .iter()
            .map(|s| date(s))
            .collect();
        create_day_assignments(&store, &publisher, assignment_id, &dates)
            .await
            .unwrap();
        let group = create_assignment_group(
            &store,
            &publisher,
            assignment_id,
            date("2026-01-05"),
            date("2026-01-06"),
            Priority::Normal,
            None,
        )
        .await
        .unwrap();

        let err = create_assignment_group(
            &store,
            &publisher,
            assignment_id,
            date("2026-01-06"),
            date("2026-01-07"),
            Priority::Low,
            None,
        )
        .await
        .unwrap_err();
        match err.downcast_ref::<ScheduleError>() {
            Some(ScheduleError::GroupOverlap(id)) => assert_eq!(*id, group.id),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_move_merges_into_destination() {
        let (store, publisher, assignment_id, _) = seeded().await;

        let dates: Vec<NaiveDate> = ["2026-02-01", "2026-02-02", "2026-02-03", "2026-02-07"]
            .iter()
            .map(|s| date(s))
            .collect();
        create_day_assignments(&store, &publisher, assignment_id, &dates)
            .await
            .unwrap();

        let merged = move_assignment_block(
            &store,
            &publisher,
            assignment_id,
            date("2026-02-01"),
            date("2026-02-03"),
            date("2026-02-06"),
            date("2026-02-08"),
        )
        .await
        .unwrap();
        assert_eq!(merged, 1);

        let snapshot = store.timeline_snapshot(assignment_id).await.unwrap();
        let days: Vec<NaiveDate> = snapshot.days.iter().copied().collect();
        assert_eq!(
            days,
            vec![date("2026-02-06"), date("2026-02-07"), date("2026-02-08")]
        );
        store.verify_timeline_invariants(assignment_id).unwrap();
    }

    #[tokio::test]
    async fn test_move_rejects_mismatched_shape() {
        let (store, publisher, assignment_id, _) = seeded().await;

        create_day_assignments(
            &store,
            &publisher,
            assignment_id,
            &[date("2026-02-01"), date("2026-02-02")],
        )
        .await
        .unwrap();

        let err = move_assignment_block(
            &store,
            &publisher,
            assignment_id,
            date("2026-02-01"),
            date("2026-02-02"),
            date("2026-02-06"),
            date("2026-02-08"),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::ShapeMismatch)
        ));
    }

    #[tokio::test]
    async fn test_batch_delete_is_all_or_nothing() {
        let (store, publisher, assignment_id, _) = seeded().await;

        let created = create_day_assignments(
            &store,
            &publisher,
            assignment_id,
            &[date("2026-01-05"), date("2026-01-06")],
        )
        .await
        .unwrap();

        let err = delete_day_assignments(&store, &publisher, &[created[0].id, 999])
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::NotFound("day assignment", 999))
        ));
        // nothing was deleted
        let snapshot = store.timeline_snapshot(assignment_id).await.unwrap();
        assert_eq!(snapshot.days.len(), 2);

        delete_day_assignments(&store, &publisher, &[created[0].id, created[1].id])
            .await
            .unwrap();
        let snapshot = store.timeline_snapshot(assignment_id).await.unwrap();
        assert!(snapshot.days.is_empty());
    }

    #[tokio::test]
    async fn test_day_off_clears_member_days() {
        let (store, publisher, assignment_id, member_id) = seeded().await;

        let dates: Vec<NaiveDate> = ["2026-01-05", "2026-01-06", "2026-01-07"]
            .iter()
            .map(|s| date(s))
            .collect();
        create_day_assignments(&store, &publisher, assignment_id, &dates)
            .await
            .unwrap();
        create_assignment_group(
            &store,
            &publisher,
            assignment_id,
            date("2026-01-05"),
            date("2026-01-07"),
            Priority::Normal,
            Some("sprint".into()),
        )
        .await
        .unwrap();

        let mut events = publisher.subscribe();
        create_day_off(&store, &publisher, member_id, date("2026-01-06"))
            .await
            .unwrap();

        let snapshot = store.timeline_snapshot(assignment_id).await.unwrap();
        assert!(!snapshot.days.contains(&date("2026-01-06")));
        assert_eq!(snapshot.groups.len(), 2);
        store.verify_timeline_invariants(assignment_id).unwrap();

        let event = events.try_recv().unwrap();
        assert_eq!(
            event.change_type,
            teamgrid_core::service::ScheduleChangeType::DayOffChanged
        );
    }

    #[tokio::test]
    async fn test_range_queries_pass_the_filter_through() {
        let (store, publisher, assignment_id, member_id) = seeded().await;

        create_day_assignments(
            &store,
            &publisher,
            assignment_id,
            &[date("2026-01-05"), date("2026-01-20")],
        )
        .await
        .unwrap();

        let filter = TimelineQueryFilter {
            start_date: date("2026-01-01"),
            end_date: date("2026-01-10"),
            project_id: None,
            member_id: Some(member_id),
        };
        let days = find_day_assignments(&store, &filter).await.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date("2026-01-05"));

        let groups = find_assignment_groups(&store, &filter).await.unwrap();
        assert!(groups.is_empty());
    }
}
