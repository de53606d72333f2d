//! Roster API models
//!
//! Request/response models for the entities the timeline hangs off:
//! customers, their projects, team members, and project-member assignments.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Request to create a customer
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
}

/// A stored customer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request to create a project under a customer
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub customer_id: i64,
    pub name: String,
    /// Display color as `#RRGGBB`
    pub color: Option<String>,
}

/// Request to update a project
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub archived: Option<bool>,
}

/// A stored project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub id: i64,
    pub customer_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request to create a team member
///
/// `work_schedule` lists availability per weekday Monday through Sunday and
/// defaults to Monday-Friday when absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMemberRequest {
    pub name: String,
    pub email: Option<String>,
    pub work_schedule: Option<[bool; 7]>,
}

/// Request to update a team member
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub work_schedule: Option<[bool; 7]>,
}

/// A stored team member
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberInfo {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub work_schedule: [bool; 7],
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request to assign a member to a project
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub project_id: i64,
    pub member_id: i64,
}

/// A stored assignment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInfo {
    pub id: i64,
    pub project_id: i64,
    pub member_id: i64,
}
