//! Transport seam between the grid client and the server
//!
//! The [`ScheduleTransport`] trait carries exactly the timeline operations
//! of the HTTP API. The production implementation is
//! [`crate::http::TeamgridHttpClient`]; tests substitute an in-memory fake.

use async_trait::async_trait;
use chrono::NaiveDate;

use teamgrid_api::model::DateRangeQuery;
use teamgrid_api::timeline::model::{
    AssignmentGroupInfo, DayAssignmentInfo, MoveAssignmentBlockRequest,
    MoveAssignmentBlockResponse,
};
use teamgrid_common::Priority;

use crate::error::Result;

/// Timeline operations of the Teamgrid server
#[async_trait]
pub trait ScheduleTransport: Send + Sync {
    /// Create one day assignment
    async fn create_day(
        &self,
        assignment_id: i64,
        date: NaiveDate,
        comment: Option<String>,
    ) -> Result<DayAssignmentInfo>;

    /// Create several day assignments of one assignment atomically
    async fn create_days(
        &self,
        assignment_id: i64,
        dates: Vec<NaiveDate>,
    ) -> Result<Vec<DayAssignmentInfo>>;

    /// Delete one day assignment by id
    async fn delete_day(&self, id: i64) -> Result<()>;

    /// Delete several day assignments atomically
    async fn delete_days(&self, ids: Vec<i64>) -> Result<()>;

    /// Create an assignment group over assigned days
    async fn create_group(
        &self,
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        priority: Priority,
        comment: Option<String>,
    ) -> Result<AssignmentGroupInfo>;

    /// Rewrite the priority and comment of a group
    async fn update_group(
        &self,
        id: i64,
        priority: Option<Priority>,
        comment: Option<String>,
    ) -> Result<AssignmentGroupInfo>;

    /// Move a contiguous block of assigned days
    async fn move_block(
        &self,
        request: MoveAssignmentBlockRequest,
    ) -> Result<MoveAssignmentBlockResponse>;

    /// Day assignments in a date range
    async fn fetch_days(&self, query: &DateRangeQuery) -> Result<Vec<DayAssignmentInfo>>;

    /// Assignment groups intersecting a date range
    async fn fetch_groups(&self, query: &DateRangeQuery) -> Result<Vec<AssignmentGroupInfo>>;
}
