//! Timeline engine API models
//!
//! Request/response models for the assignment timeline operations. All dates
//! travel as `YYYY-MM-DD` calendar days with no time component.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use teamgrid_common::Priority;

/// Request to create a single day assignment
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDayAssignmentRequest {
    pub assignment_id: i64,
    pub date: NaiveDate,
    pub comment: Option<String>,
}

/// Request to create several day assignments of one assignment at once
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateDayAssignmentsRequest {
    pub assignment_id: i64,
    pub dates: Vec<NaiveDate>,
}

/// Request to delete several day assignments at once
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteDayAssignmentsRequest {
    pub ids: Vec<i64>,
}

/// A stored day assignment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAssignmentInfo {
    pub id: i64,
    pub assignment_id: i64,
    pub date: NaiveDate,
    pub comment: Option<String>,
}

/// Request to create an assignment group over already-assigned days
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentGroupRequest {
    pub assignment_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    pub comment: Option<String>,
}

/// Metadata-only update of an assignment group
///
/// Dates never change through this request. An absent field is left
/// unchanged; an empty comment clears the stored comment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentGroupRequest {
    pub priority: Option<Priority>,
    pub comment: Option<String>,
}

/// A stored assignment group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentGroupInfo {
    pub id: i64,
    pub assignment_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: Priority,
    pub comment: Option<String>,
}

/// Request to move a contiguous block of assigned days
///
/// `[start_date, end_date]` is the block being dragged and must be a maximal
/// contiguous run of assigned days; `[new_start_date, new_end_date]` is where
/// it lands and must have the same length.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAssignmentBlockRequest {
    pub assignment_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub new_start_date: NaiveDate,
    pub new_end_date: NaiveDate,
}

/// Result of a block move
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAssignmentBlockResponse {
    /// Days at the destination that already carried an assignment and were
    /// absorbed into the moved block
    pub merged_days: u32,
}
