//! V1 timeline API handlers
//!
//! Implements the assignment timeline endpoints:
//! - POST /v1/timeline/days - Create a day assignment
//! - POST /v1/timeline/days/batch - Create several day assignments at once
//! - DELETE /v1/timeline/days/{id} - Delete a day assignment
//! - POST /v1/timeline/days/batch-delete - Delete several day assignments at once
//! - GET /v1/timeline/days - List day assignments in a date range
//! - POST /v1/timeline/groups - Create an assignment group
//! - PATCH /v1/timeline/groups/{id} - Update group metadata
//! - GET /v1/timeline/groups - List assignment groups in a date range
//! - POST /v1/timeline/move - Move a contiguous block of days

use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};

use teamgrid_api::validation;
use teamgrid_persistence::{AssignmentGroupData, DayAssignmentData, TimelineQueryFilter};
use teamgrid_timeline::service;

use crate::{
    metrics,
    model::{AppState, response::ErrorResult, response::schedule_error_response},
};

use super::model::{
    AssignmentGroupInfo, BatchCreateDayAssignmentsRequest, BatchDeleteDayAssignmentsRequest,
    CreateAssignmentGroupRequest, CreateDayAssignmentRequest, DateRangeQuery, DayAssignmentInfo,
    MoveAssignmentBlockRequest, MoveAssignmentBlockResponse, UpdateAssignmentGroupRequest,
};

/// Create a day assignment
///
/// POST /v1/timeline/days
///
/// Creating an already-assigned day returns the existing row unchanged.
#[post("/days")]
pub async fn create_day(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateDayAssignmentRequest>,
) -> impl Responder {
    if let Some(comment) = body.comment.as_deref() {
        if let Err(e) = validation::validate_comment(comment) {
            return ErrorResult::bad_request(format!("Invalid comment: {}", e.code), req.path());
        }
    }

    match service::create_day_assignment(
        data.store(),
        &data.publisher,
        body.assignment_id,
        body.date,
        body.comment.clone(),
    )
    .await
    {
        Ok(created) => {
            metrics::record_timeline_mutation("create_day");
            tracing::info!(
                assignment_id = body.assignment_id,
                date = %body.date,
                "Day assignment created"
            );
            HttpResponse::Created().json(day_info(created))
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Create several day assignments of one assignment at once
///
/// POST /v1/timeline/days/batch
///
/// Either every listed day is written or none of them is.
#[post("/days/batch")]
pub async fn create_days(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<BatchCreateDayAssignmentsRequest>,
) -> impl Responder {
    match service::create_day_assignments(
        data.store(),
        &data.publisher,
        body.assignment_id,
        &body.dates,
    )
    .await
    {
        Ok(created) => {
            metrics::record_timeline_mutation("create_days");
            tracing::info!(
                assignment_id = body.assignment_id,
                count = created.len(),
                "Day assignments created"
            );
            let response: Vec<DayAssignmentInfo> = created.into_iter().map(day_info).collect();
            HttpResponse::Created().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Delete a day assignment
///
/// DELETE /v1/timeline/days/{id}
#[delete("/days/{id}")]
pub async fn delete_day(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match service::delete_day_assignment(data.store(), &data.publisher, id).await {
        Ok(true) => {
            metrics::record_timeline_mutation("delete_day");
            tracing::info!(id = id, "Day assignment deleted");
            HttpResponse::NoContent().finish()
        }
        Ok(false) => ErrorResult::not_found(
            format!("day assignment '{}' not found", id),
            req.path(),
        ),
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Delete several day assignments at once
///
/// POST /v1/timeline/days/batch-delete
///
/// Every listed id must exist; otherwise nothing is deleted.
#[post("/days/batch-delete")]
pub async fn delete_days(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<BatchDeleteDayAssignmentsRequest>,
) -> impl Responder {
    match service::delete_day_assignments(data.store(), &data.publisher, &body.ids).await {
        Ok(()) => {
            metrics::record_timeline_mutation("delete_days");
            tracing::info!(count = body.ids.len(), "Day assignments deleted");
            HttpResponse::NoContent().finish()
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List day assignments in a date range
///
/// GET /v1/timeline/days
///
/// Accepts optional projectId and memberId filters.
#[get("/days")]
pub async fn find_days(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<DateRangeQuery>,
) -> impl Responder {
    if let Err(e) = validation::validate_date_range(params.start_date, params.end_date) {
        return ErrorResult::bad_request(format!("Invalid date range: {}", e.code), req.path());
    }

    let filter = TimelineQueryFilter {
        start_date: params.start_date,
        end_date: params.end_date,
        project_id: params.project_id,
        member_id: params.member_id,
    };

    let timer = metrics::Timer::start();
    match service::find_day_assignments(data.store(), &filter).await {
        Ok(days) => {
            metrics::record_timeline_query("days", timer.elapsed_secs());
            let response: Vec<DayAssignmentInfo> = days.into_iter().map(day_info).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Create an assignment group
///
/// POST /v1/timeline/groups
///
/// Every day in the range must already be assigned, and the range must not
/// intersect an existing group of the same assignment.
#[post("/groups")]
pub async fn create_group(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateAssignmentGroupRequest>,
) -> impl Responder {
    if let Err(e) = validation::validate_date_range(body.start_date, body.end_date) {
        return ErrorResult::bad_request(format!("Invalid date range: {}", e.code), req.path());
    }
    if let Some(comment) = body.comment.as_deref() {
        if let Err(e) = validation::validate_comment(comment) {
            return ErrorResult::bad_request(format!("Invalid comment: {}", e.code), req.path());
        }
    }

    match service::create_assignment_group(
        data.store(),
        &data.publisher,
        body.assignment_id,
        body.start_date,
        body.end_date,
        body.priority,
        body.comment.clone(),
    )
    .await
    {
        Ok(created) => {
            metrics::record_timeline_mutation("create_group");
            tracing::info!(
                assignment_id = body.assignment_id,
                group_id = created.id,
                start_date = %body.start_date,
                end_date = %body.end_date,
                "Assignment group created"
            );
            HttpResponse::Created().json(group_info(created))
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Update the metadata of an assignment group
///
/// PATCH /v1/timeline/groups/{id}
///
/// Dates never change here. An absent field is left unchanged; an empty
/// comment clears the stored comment.
#[patch("/groups/{id}")]
pub async fn update_group(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateAssignmentGroupRequest>,
) -> impl Responder {
    let id = path.into_inner();

    if let Some(comment) = body.comment.as_deref() {
        if let Err(e) = validation::validate_comment(comment) {
            return ErrorResult::bad_request(format!("Invalid comment: {}", e.code), req.path());
        }
    }

    let existing = match data.store().group_get_by_id(id).await {
        Ok(Some(group)) => group,
        Ok(None) => {
            return ErrorResult::not_found(
                format!("assignment group '{}' not found", id),
                req.path(),
            );
        }
        Err(e) => return schedule_error_response(&e, req.path()),
    };

    let priority = body.priority.unwrap_or(existing.priority);
    let comment = match body.comment.clone() {
        None => existing.comment,
        Some(comment) if comment.is_empty() => None,
        Some(comment) => Some(comment),
    };

    match service::update_assignment_group(data.store(), &data.publisher, id, priority, comment)
        .await
    {
        Ok(Some(updated)) => {
            metrics::record_timeline_mutation("update_group");
            tracing::info!(group_id = id, "Assignment group updated");
            HttpResponse::Ok().json(group_info(updated))
        }
        Ok(None) => ErrorResult::not_found(
            format!("assignment group '{}' not found", id),
            req.path(),
        ),
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List assignment groups intersecting a date range
///
/// GET /v1/timeline/groups
///
/// Accepts optional projectId and memberId filters.
#[get("/groups")]
pub async fn find_groups(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<DateRangeQuery>,
) -> impl Responder {
    if let Err(e) = validation::validate_date_range(params.start_date, params.end_date) {
        return ErrorResult::bad_request(format!("Invalid date range: {}", e.code), req.path());
    }

    let filter = TimelineQueryFilter {
        start_date: params.start_date,
        end_date: params.end_date,
        project_id: params.project_id,
        member_id: params.member_id,
    };

    let timer = metrics::Timer::start();
    match service::find_assignment_groups(data.store(), &filter).await {
        Ok(groups) => {
            metrics::record_timeline_query("groups", timer.elapsed_secs());
            let response: Vec<AssignmentGroupInfo> =
                groups.into_iter().map(group_info).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Move a contiguous block of assigned days
///
/// POST /v1/timeline/move
///
/// The moved range must be a maximal contiguous run of assigned days and the
/// destination must have the same length. Destination days that already carry
/// an assignment are absorbed; the response reports how many.
#[post("/move")]
pub async fn move_block(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<MoveAssignmentBlockRequest>,
) -> impl Responder {
    match service::move_assignment_block(
        data.store(),
        &data.publisher,
        body.assignment_id,
        body.start_date,
        body.end_date,
        body.new_start_date,
        body.new_end_date,
    )
    .await
    {
        Ok(merged_days) => {
            metrics::record_timeline_mutation("move_block");
            metrics::record_merged_days(merged_days);
            tracing::info!(
                assignment_id = body.assignment_id,
                start_date = %body.start_date,
                new_start_date = %body.new_start_date,
                merged_days = merged_days,
                "Assignment block moved"
            );
            HttpResponse::Ok().json(MoveAssignmentBlockResponse { merged_days })
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

fn day_info(data: DayAssignmentData) -> DayAssignmentInfo {
    DayAssignmentInfo {
        id: data.id,
        assignment_id: data.assignment_id,
        date: data.date,
        comment: data.comment,
    }
}

fn group_info(data: AssignmentGroupData) -> AssignmentGroupInfo {
    AssignmentGroupInfo {
        id: data.id,
        assignment_id: data.assignment_id,
        start_date: data.start_date,
        end_date: data.end_date,
        priority: data.priority,
        comment: data.comment,
    }
}
