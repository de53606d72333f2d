//! Request and response models for the V1 API
//!
//! Wire models live in the teamgrid-api crate; this module re-exports them
//! and adds the query parameter structs only the server needs.

use serde::Deserialize;

// Re-export shared V1 model types from teamgrid-api
pub use teamgrid_api::model::{DateRangeQuery, HealthInfo, ServerState};

// Re-export timeline V1 model types from teamgrid-api
pub use teamgrid_api::timeline::model::{
    AssignmentGroupInfo, BatchCreateDayAssignmentsRequest, BatchDeleteDayAssignmentsRequest,
    CreateAssignmentGroupRequest, CreateDayAssignmentRequest, DayAssignmentInfo,
    MoveAssignmentBlockRequest, MoveAssignmentBlockResponse, UpdateAssignmentGroupRequest,
};

// Re-export roster V1 model types from teamgrid-api
pub use teamgrid_api::roster::model::{
    AssignmentInfo, CreateAssignmentRequest, CreateCustomerRequest, CreateProjectRequest,
    CreateTeamMemberRequest, CustomerInfo, ProjectInfo, TeamMemberInfo, UpdateProjectRequest,
    UpdateTeamMemberRequest,
};

// Re-export calendar V1 model types from teamgrid-api
pub use teamgrid_api::calendar::model::{
    CreateDayOffRequest, CreateMilestoneRequest, DayOffInfo, HolidayInfo, MilestoneInfo,
    UpdateMilestoneRequest,
};

/// Query parameters for the milestone listing
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneQuery {
    pub project_id: i64,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

/// Query parameters for the day-off listing
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOffQuery {
    pub member_id: i64,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

/// Query parameters for the holiday listing
#[derive(Clone, Debug, Deserialize)]
pub struct HolidayQuery {
    pub year: i32,
}

/// Query parameters for the assignment listing
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentQuery {
    /// Filter by project (optional)
    #[serde(default)]
    pub project_id: Option<i64>,
    /// Filter by member (optional)
    #[serde(default)]
    pub member_id: Option<i64>,
}
