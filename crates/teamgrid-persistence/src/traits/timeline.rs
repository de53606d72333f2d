//! Timeline persistence trait
//!
//! Defines the interface for day assignment and assignment group storage.

use async_trait::async_trait;
use chrono::NaiveDate;

use teamgrid_common::Priority;

use crate::model::{
    AppliedTimelineChange, AssignmentGroupData, DayAssignmentData, TimelineChange,
    TimelineQueryFilter, TimelineSnapshot,
};

/// Timeline storage operations
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// Get a day assignment by id
    async fn day_get_by_id(&self, id: i64) -> anyhow::Result<Option<DayAssignmentData>>;

    /// Get the day assignment of one assignment on one date
    async fn day_find(
        &self,
        assignment_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Option<DayAssignmentData>>;

    /// Find day assignments in an inclusive date range, optionally narrowed
    /// to one project or one member
    async fn days_find_in_range(
        &self,
        filter: &TimelineQueryFilter,
    ) -> anyhow::Result<Vec<DayAssignmentData>>;

    /// Get an assignment group by id
    async fn group_get_by_id(&self, id: i64) -> anyhow::Result<Option<AssignmentGroupData>>;

    /// Find assignment groups intersecting an inclusive date range,
    /// optionally narrowed to one project or one member
    async fn groups_find_in_range(
        &self,
        filter: &TimelineQueryFilter,
    ) -> anyhow::Result<Vec<AssignmentGroupData>>;

    /// Rewrite the metadata of an assignment group, leaving its dates alone
    ///
    /// Returns the updated group, or `None` when the id is unknown.
    async fn group_update_metadata(
        &self,
        id: i64,
        priority: Priority,
        comment: Option<String>,
    ) -> anyhow::Result<Option<AssignmentGroupData>>;

    /// Load the full timeline state of one assignment
    async fn timeline_snapshot(&self, assignment_id: i64) -> anyhow::Result<TimelineSnapshot>;

    /// Apply a timeline change atomically
    async fn apply_change(
        &self,
        change: &TimelineChange,
    ) -> anyhow::Result<AppliedTimelineChange>;

    /// Apply several timeline changes, possibly spanning assignments, as one
    /// atomic write
    async fn apply_changes(
        &self,
        changes: &[TimelineChange],
    ) -> anyhow::Result<Vec<AppliedTimelineChange>>;

    /// Day assignments of one member on one date, across all of the
    /// member's assignments
    async fn member_days_on(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<DayAssignmentData>>;
}
