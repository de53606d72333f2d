//! Calendar API models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request to create a project milestone
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneRequest {
    pub project_id: i64,
    pub date: NaiveDate,
    pub name: Option<String>,
}

/// Request to update a milestone
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestoneRequest {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
}

/// A stored milestone
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneInfo {
    pub id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    pub name: Option<String>,
}

/// Request to record a day off for a member
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDayOffRequest {
    pub member_id: i64,
    pub date: NaiveDate,
}

/// A stored day off
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOffInfo {
    pub id: i64,
    pub member_id: i64,
    pub date: NaiveDate,
}

/// A public holiday
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayInfo {
    pub date: NaiveDate,
    pub name: String,
}
