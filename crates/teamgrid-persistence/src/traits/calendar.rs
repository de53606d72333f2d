//! Calendar persistence trait
//!
//! Defines the interface for milestone and day off storage operations.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::{DayOffData, MilestoneData, TimelineChange};

/// Calendar storage operations
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Create a milestone
    async fn milestone_create(
        &self,
        project_id: i64,
        date: NaiveDate,
        name: Option<String>,
    ) -> anyhow::Result<MilestoneData>;

    /// Get a milestone by id
    async fn milestone_get_by_id(&self, id: i64) -> anyhow::Result<Option<MilestoneData>>;

    /// Update a milestone; absent fields are left unchanged
    async fn milestone_update(
        &self,
        id: i64,
        date: Option<NaiveDate>,
        name: Option<String>,
    ) -> anyhow::Result<Option<MilestoneData>>;

    /// Delete a milestone
    async fn milestone_delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Find milestones of a project in an inclusive date range
    async fn milestones_find_in_range(
        &self,
        project_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> anyhow::Result<Vec<MilestoneData>>;

    /// Record a day off and apply the given timeline changes in the same
    /// atomic write
    ///
    /// The changes remove the member's day assignments on that date; the
    /// day off row and every change commit together or not at all.
    async fn day_off_create(
        &self,
        member_id: i64,
        date: NaiveDate,
        changes: &[TimelineChange],
    ) -> anyhow::Result<DayOffData>;

    /// Get a day off by id
    async fn day_off_get_by_id(&self, id: i64) -> anyhow::Result<Option<DayOffData>>;

    /// Get the day off of one member on one date
    async fn day_off_find(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Option<DayOffData>>;

    /// Delete a day off
    async fn day_off_delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Find day offs of a member in an inclusive date range
    async fn day_offs_find_in_range(
        &self,
        member_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> anyhow::Result<Vec<DayOffData>>;
}
