//! V1 calendar API handlers
//!
//! Implements milestones, day offs, and the public holiday listing:
//! - POST /v1/milestones - Create a milestone
//! - PATCH /v1/milestones/{id} - Update a milestone
//! - DELETE /v1/milestones/{id} - Delete a milestone
//! - GET /v1/milestones - List milestones of a project in a date range
//! - POST /v1/dayoffs - Record a day off
//! - DELETE /v1/dayoffs/{id} - Delete a day off
//! - GET /v1/dayoffs - List day offs of a member in a date range
//! - GET /v1/calendar/holidays - List public holidays of a year

use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};

use teamgrid_api::validation;
use teamgrid_core::{ScheduleChangeEvent, holidays_for_year};
use teamgrid_persistence::{DayOffData, MilestoneData};
use teamgrid_timeline::service;

use crate::model::{AppState, response::ErrorResult, response::schedule_error_response};

use super::model::{
    CreateDayOffRequest, CreateMilestoneRequest, DayOffInfo, DayOffQuery, HolidayInfo,
    HolidayQuery, MilestoneInfo, MilestoneQuery, UpdateMilestoneRequest,
};

/// Create a milestone
///
/// POST /v1/milestones
#[post("")]
pub async fn create_milestone(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateMilestoneRequest>,
) -> impl Responder {
    if let Some(name) = body.name.as_deref() {
        if let Err(e) = validation::validate_name(name) {
            return ErrorResult::bad_request(format!("Invalid name: {}", e.code), req.path());
        }
    }

    match data.store().project_get_by_id(body.project_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return ErrorResult::not_found(
                format!("project '{}' not found", body.project_id),
                req.path(),
            );
        }
        Err(e) => return schedule_error_response(&e, req.path()),
    }

    match data
        .store()
        .milestone_create(body.project_id, body.date, body.name.clone())
        .await
    {
        Ok(created) => {
            data.publisher
                .publish(ScheduleChangeEvent::milestone_changed(
                    created.project_id,
                    created.date,
                ))
                .await;
            tracing::info!(
                milestone_id = created.id,
                project_id = created.project_id,
                date = %created.date,
                "Milestone created"
            );
            HttpResponse::Created().json(milestone_info(created))
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Update a milestone
///
/// PATCH /v1/milestones/{id}
///
/// Absent fields are left unchanged.
#[patch("/{id}")]
pub async fn update_milestone(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateMilestoneRequest>,
) -> impl Responder {
    let id = path.into_inner();

    if let Some(name) = body.name.as_deref() {
        if let Err(e) = validation::validate_name(name) {
            return ErrorResult::bad_request(format!("Invalid name: {}", e.code), req.path());
        }
    }

    match data
        .store()
        .milestone_update(id, body.date, body.name.clone())
        .await
    {
        Ok(Some(updated)) => {
            data.publisher
                .publish(ScheduleChangeEvent::milestone_changed(
                    updated.project_id,
                    updated.date,
                ))
                .await;
            tracing::info!(milestone_id = id, "Milestone updated");
            HttpResponse::Ok().json(milestone_info(updated))
        }
        Ok(None) => ErrorResult::not_found(format!("milestone '{}' not found", id), req.path()),
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Delete a milestone
///
/// DELETE /v1/milestones/{id}
#[delete("/{id}")]
pub async fn delete_milestone(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    let existing = match data.store().milestone_get_by_id(id).await {
        Ok(Some(milestone)) => milestone,
        Ok(None) => {
            return ErrorResult::not_found(format!("milestone '{}' not found", id), req.path());
        }
        Err(e) => return schedule_error_response(&e, req.path()),
    };

    match data.store().milestone_delete(id).await {
        Ok(true) => {
            data.publisher
                .publish(ScheduleChangeEvent::milestone_changed(
                    existing.project_id,
                    existing.date,
                ))
                .await;
            tracing::info!(milestone_id = id, "Milestone deleted");
            HttpResponse::NoContent().finish()
        }
        Ok(false) => ErrorResult::not_found(format!("milestone '{}' not found", id), req.path()),
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List milestones of a project in a date range
///
/// GET /v1/milestones
#[get("")]
pub async fn find_milestones(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<MilestoneQuery>,
) -> impl Responder {
    if let Err(e) = validation::validate_date_range(params.start_date, params.end_date) {
        return ErrorResult::bad_request(format!("Invalid date range: {}", e.code), req.path());
    }

    match data
        .store()
        .milestones_find_in_range(params.project_id, params.start_date, params.end_date)
        .await
    {
        Ok(milestones) => {
            let response: Vec<MilestoneInfo> =
                milestones.into_iter().map(milestone_info).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Record a day off for a member
///
/// POST /v1/dayoffs
///
/// Day assignments of the member on that date are removed in the same write;
/// recording an already-recorded day off returns the existing row unchanged.
#[post("")]
pub async fn create_day_off(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateDayOffRequest>,
) -> impl Responder {
    match service::create_day_off(data.store(), &data.publisher, body.member_id, body.date).await
    {
        Ok(created) => {
            tracing::info!(
                member_id = body.member_id,
                date = %body.date,
                "Day off recorded"
            );
            HttpResponse::Created().json(day_off_info(created))
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Delete a day off
///
/// DELETE /v1/dayoffs/{id}
#[delete("/{id}")]
pub async fn delete_day_off(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    let existing = match data.store().day_off_get_by_id(id).await {
        Ok(Some(day_off)) => day_off,
        Ok(None) => {
            return ErrorResult::not_found(format!("day off '{}' not found", id), req.path());
        }
        Err(e) => return schedule_error_response(&e, req.path()),
    };

    match data.store().day_off_delete(id).await {
        Ok(true) => {
            data.publisher
                .publish(ScheduleChangeEvent::day_off_changed(
                    existing.member_id,
                    existing.date,
                ))
                .await;
            tracing::info!(day_off_id = id, "Day off deleted");
            HttpResponse::NoContent().finish()
        }
        Ok(false) => ErrorResult::not_found(format!("day off '{}' not found", id), req.path()),
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List day offs of a member in a date range
///
/// GET /v1/dayoffs
#[get("")]
pub async fn find_day_offs(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<DayOffQuery>,
) -> impl Responder {
    if let Err(e) = validation::validate_date_range(params.start_date, params.end_date) {
        return ErrorResult::bad_request(format!("Invalid date range: {}", e.code), req.path());
    }

    match data
        .store()
        .day_offs_find_in_range(params.member_id, params.start_date, params.end_date)
        .await
    {
        Ok(day_offs) => {
            let response: Vec<DayOffInfo> = day_offs.into_iter().map(day_off_info).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List public holidays of a year
///
/// GET /v1/calendar/holidays
#[get("/holidays")]
pub async fn get_holidays(params: web::Query<HolidayQuery>) -> impl Responder {
    let response: Vec<HolidayInfo> = holidays_for_year(params.year)
        .into_iter()
        .map(|holiday| HolidayInfo {
            date: holiday.date,
            name: holiday.name,
        })
        .collect();
    HttpResponse::Ok().json(response)
}

fn milestone_info(data: MilestoneData) -> MilestoneInfo {
    MilestoneInfo {
        id: data.id,
        project_id: data.project_id,
        date: data.date,
        name: data.name,
    }
}

fn day_off_info(data: DayOffData) -> DayOffInfo {
    DayOffInfo {
        id: data.id,
        member_id: data.member_id,
        date: data.date,
    }
}
