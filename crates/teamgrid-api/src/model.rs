//! Common API models and constants
//!
//! This module defines shared constants and data structures used across
//! different API modules.

use serde::{Deserialize, Serialize};

// API paths
pub const TIMELINE_DAYS_PATH: &str = "/v1/timeline/days";
pub const TIMELINE_GROUPS_PATH: &str = "/v1/timeline/groups";
pub const TIMELINE_MOVE_PATH: &str = "/v1/timeline/move";

/// Date range query accepted by timeline, milestone, and day-off listings
///
/// `start_date` and `end_date` are inclusive calendar days.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub project_id: Option<i64>,
    pub member_id: Option<i64>,
}

/// Server state exposed by GET /v1/state
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerState {
    pub version: String,
    pub standalone: bool,
    pub context_path: String,
}

/// Storage health exposed by GET /v1/health
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub status: String,
    pub storage_mode: String,
}
