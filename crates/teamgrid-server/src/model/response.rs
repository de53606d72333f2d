//! HTTP response types for the Teamgrid server
//!
//! This module provides the error body shapes and the mapping from
//! service-layer failures onto the HTTP status contract.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

use teamgrid_common::ScheduleError;

/// Error result for API error responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResult {
    pub timestamp: String,
    pub status: i32,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorResult {
    pub fn new(status: StatusCode, message: String, path: &str) -> Self {
        ErrorResult {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16() as i32,
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message,
            path: path.to_string(),
        }
    }

    pub fn http_response(status: StatusCode, message: String, path: &str) -> HttpResponse {
        HttpResponseBuilder::new(status).json(ErrorResult::new(status, message, path))
    }

    pub fn bad_request(message: String, path: &str) -> HttpResponse {
        Self::http_response(StatusCode::BAD_REQUEST, message, path)
    }

    pub fn not_found(message: String, path: &str) -> HttpResponse {
        Self::http_response(StatusCode::NOT_FOUND, message, path)
    }
}

/// Conflict body for assignment group overlaps
///
/// Carries the id of the group already occupying the range so the caller
/// can fall back to updating that group's metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConflictResult {
    pub timestamp: String,
    pub status: i32,
    pub error: String,
    pub message: String,
    pub path: String,
    pub existing_group_id: i64,
}

impl GroupConflictResult {
    pub fn new(message: String, path: &str, existing_group_id: i64) -> Self {
        let status = StatusCode::CONFLICT;
        GroupConflictResult {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16() as i32,
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message,
            path: path.to_string(),
            existing_group_id,
        }
    }
}

/// Map a failed service call onto the HTTP status contract
///
/// `ScheduleError` variants carry their client-facing status; anything
/// else is reported as an internal error.
pub fn schedule_error_response(err: &anyhow::Error, path: &str) -> HttpResponse {
    match err.downcast_ref::<ScheduleError>() {
        Some(
            ScheduleError::IllegalArgument(_)
            | ScheduleError::ShapeMismatch
            | ScheduleError::NotABlock(_, _),
        ) => ErrorResult::bad_request(err.to_string(), path),
        Some(ScheduleError::NotFound(_, _)) => ErrorResult::not_found(err.to_string(), path),
        Some(ScheduleError::GroupOverlap(existing_group_id)) => HttpResponse::Conflict().json(
            GroupConflictResult::new(err.to_string(), path, *existing_group_id),
        ),
        Some(ScheduleError::DuplicateAssignment(_, _)) => {
            ErrorResult::http_response(StatusCode::CONFLICT, err.to_string(), path)
        }
        _ => {
            tracing::error!(path = path, error = %err, "Request failed");
            crate::metrics::record_request_error(path);
            ErrorResult::http_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), path)
        }
    }
}
