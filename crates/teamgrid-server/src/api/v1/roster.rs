//! V1 roster API handlers
//!
//! Implements the entities the timeline hangs off:
//! - POST /v1/customers - Create a customer
//! - GET /v1/customers - List customers
//! - GET /v1/customers/{id} - Get a customer
//! - DELETE /v1/customers/{id} - Delete a customer and its projects
//! - POST /v1/projects - Create a project
//! - GET /v1/projects - List projects
//! - GET /v1/projects/{id} - Get a project
//! - PUT /v1/projects/{id} - Update a project
//! - DELETE /v1/projects/{id} - Delete a project and its assignments
//! - POST /v1/members - Create a team member
//! - GET /v1/members - List team members
//! - GET /v1/members/{id} - Get a team member
//! - PUT /v1/members/{id} - Update a team member
//! - DELETE /v1/members/{id} - Delete a team member and their assignments
//! - POST /v1/assignments - Assign a member to a project
//! - GET /v1/assignments - List assignments
//! - DELETE /v1/assignments/{id} - Remove an assignment and its timeline

use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use teamgrid_api::validation;
use teamgrid_common::ScheduleError;
use teamgrid_core::{ScheduleChangeEvent, WorkSchedule};
use teamgrid_persistence::{AssignmentData, CustomerData, ProjectData, TeamMemberData};

use crate::model::{AppState, response::ErrorResult, response::schedule_error_response};

use super::model::{
    AssignmentInfo, AssignmentQuery, CreateAssignmentRequest, CreateCustomerRequest,
    CreateProjectRequest, CreateTeamMemberRequest, CustomerInfo, ProjectInfo, TeamMemberInfo,
    UpdateProjectRequest, UpdateTeamMemberRequest,
};

/// Create a customer
///
/// POST /v1/customers
#[post("")]
pub async fn create_customer(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateCustomerRequest>,
) -> impl Responder {
    if let Err(e) = validation::validate_name(&body.name) {
        return ErrorResult::bad_request(format!("Invalid name: {}", e.code), req.path());
    }

    match data.store().customer_create(body.name.trim()).await {
        Ok(created) => {
            tracing::info!(customer_id = created.id, name = %created.name, "Customer created");
            HttpResponse::Created().json(customer_info(created))
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List all customers
///
/// GET /v1/customers
#[get("")]
pub async fn get_customers(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    match data.store().customer_find_all().await {
        Ok(customers) => {
            let response: Vec<CustomerInfo> =
                customers.into_iter().map(customer_info).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Get a customer
///
/// GET /v1/customers/{id}
#[get("/{id}")]
pub async fn get_customer(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match data.store().customer_get_by_id(id).await {
        Ok(Some(customer)) => HttpResponse::Ok().json(customer_info(customer)),
        Ok(None) => {
            ErrorResult::not_found(format!("customer '{}' not found", id), req.path())
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Delete a customer, cascading its projects
///
/// DELETE /v1/customers/{id}
#[delete("/{id}")]
pub async fn delete_customer(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match data.store().customer_delete(id).await {
        Ok(true) => {
            tracing::info!(customer_id = id, "Customer deleted");
            HttpResponse::NoContent().finish()
        }
        Ok(false) => {
            ErrorResult::not_found(format!("customer '{}' not found", id), req.path())
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Create a project under a customer
///
/// POST /v1/projects
#[post("")]
pub async fn create_project(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateProjectRequest>,
) -> impl Responder {
    if let Err(e) = validation::validate_name(&body.name) {
        return ErrorResult::bad_request(format!("Invalid name: {}", e.code), req.path());
    }
    if let Some(color) = body.color.as_deref() {
        if let Err(e) = validation::validate_color(color) {
            return ErrorResult::bad_request(format!("Invalid color: {}", e.code), req.path());
        }
    }

    match data.store().customer_get_by_id(body.customer_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return ErrorResult::not_found(
                format!("customer '{}' not found", body.customer_id),
                req.path(),
            );
        }
        Err(e) => return schedule_error_response(&e, req.path()),
    }

    match data
        .store()
        .project_create(body.customer_id, body.name.trim(), body.color.clone())
        .await
    {
        Ok(created) => {
            tracing::info!(
                project_id = created.id,
                customer_id = created.customer_id,
                name = %created.name,
                "Project created"
            );
            HttpResponse::Created().json(project_info(created))
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List all projects
///
/// GET /v1/projects
#[get("")]
pub async fn get_projects(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    match data.store().project_find_all().await {
        Ok(projects) => {
            let response: Vec<ProjectInfo> = projects.into_iter().map(project_info).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Get a project
///
/// GET /v1/projects/{id}
#[get("/{id}")]
pub async fn get_project(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match data.store().project_get_by_id(id).await {
        Ok(Some(project)) => HttpResponse::Ok().json(project_info(project)),
        Ok(None) => ErrorResult::not_found(format!("project '{}' not found", id), req.path()),
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Update a project
///
/// PUT /v1/projects/{id}
///
/// Absent fields are left unchanged.
#[put("/{id}")]
pub async fn update_project(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateProjectRequest>,
) -> impl Responder {
    let id = path.into_inner();

    if let Some(name) = body.name.as_deref() {
        if let Err(e) = validation::validate_name(name) {
            return ErrorResult::bad_request(format!("Invalid name: {}", e.code), req.path());
        }
    }
    if let Some(color) = body.color.as_deref() {
        if let Err(e) = validation::validate_color(color) {
            return ErrorResult::bad_request(format!("Invalid color: {}", e.code), req.path());
        }
    }

    match data
        .store()
        .project_update(id, body.name.clone(), body.color.clone(), body.archived)
        .await
    {
        Ok(Some(updated)) => {
            tracing::info!(project_id = id, "Project updated");
            HttpResponse::Ok().json(project_info(updated))
        }
        Ok(None) => ErrorResult::not_found(format!("project '{}' not found", id), req.path()),
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Delete a project, cascading its assignments and milestones
///
/// DELETE /v1/projects/{id}
#[delete("/{id}")]
pub async fn delete_project(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match data.store().project_delete(id).await {
        Ok(true) => {
            tracing::info!(project_id = id, "Project deleted");
            HttpResponse::NoContent().finish()
        }
        Ok(false) => ErrorResult::not_found(format!("project '{}' not found", id), req.path()),
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Create a team member
///
/// POST /v1/members
///
/// The work schedule defaults to Monday through Friday when absent.
#[post("")]
pub async fn create_member(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateTeamMemberRequest>,
) -> impl Responder {
    if let Err(e) = validation::validate_name(&body.name) {
        return ErrorResult::bad_request(format!("Invalid name: {}", e.code), req.path());
    }
    if let Some(email) = body.email.as_deref() {
        if let Err(e) = validation::validate_email(email) {
            return ErrorResult::bad_request(format!("Invalid email: {}", e.code), req.path());
        }
    }

    let schedule = body
        .work_schedule
        .map(WorkSchedule::new)
        .unwrap_or_default();

    match data
        .store()
        .member_create(body.name.trim(), body.email.clone(), &schedule.to_json())
        .await
    {
        Ok(created) => {
            tracing::info!(member_id = created.id, name = %created.name, "Team member created");
            HttpResponse::Created().json(member_info(created))
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List all team members
///
/// GET /v1/members
#[get("")]
pub async fn get_members(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    match data.store().member_find_all().await {
        Ok(members) => {
            let response: Vec<TeamMemberInfo> = members.into_iter().map(member_info).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Get a team member
///
/// GET /v1/members/{id}
#[get("/{id}")]
pub async fn get_member(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match data.store().member_get_by_id(id).await {
        Ok(Some(member)) => HttpResponse::Ok().json(member_info(member)),
        Ok(None) => {
            ErrorResult::not_found(format!("team member '{}' not found", id), req.path())
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Update a team member
///
/// PUT /v1/members/{id}
///
/// Absent fields are left unchanged.
#[put("/{id}")]
pub async fn update_member(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateTeamMemberRequest>,
) -> impl Responder {
    let id = path.into_inner();

    if let Some(name) = body.name.as_deref() {
        if let Err(e) = validation::validate_name(name) {
            return ErrorResult::bad_request(format!("Invalid name: {}", e.code), req.path());
        }
    }
    if let Some(email) = body.email.as_deref() {
        if let Err(e) = validation::validate_email(email) {
            return ErrorResult::bad_request(format!("Invalid email: {}", e.code), req.path());
        }
    }

    let schedule = body
        .work_schedule
        .map(|days| WorkSchedule::new(days).to_json());

    match data
        .store()
        .member_update(id, body.name.clone(), body.email.clone(), schedule)
        .await
    {
        Ok(Some(updated)) => {
            tracing::info!(member_id = id, "Team member updated");
            HttpResponse::Ok().json(member_info(updated))
        }
        Ok(None) => {
            ErrorResult::not_found(format!("team member '{}' not found", id), req.path())
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Delete a team member, cascading their assignments and day offs
///
/// DELETE /v1/members/{id}
#[delete("/{id}")]
pub async fn delete_member(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match data.store().member_delete(id).await {
        Ok(true) => {
            tracing::info!(member_id = id, "Team member deleted");
            HttpResponse::NoContent().finish()
        }
        Ok(false) => {
            ErrorResult::not_found(format!("team member '{}' not found", id), req.path())
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Assign a member to a project
///
/// POST /v1/assignments
///
/// A member is assigned to a project at most once.
#[post("")]
pub async fn create_assignment(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateAssignmentRequest>,
) -> impl Responder {
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
    match data.store().member_get_by_id(body.member_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return ErrorResult::not_found(
                format!("team member '{}' not found", body.member_id),
                req.path(),
            );
        }
        Err(e) => return schedule_error_response(&e, req.path()),
    }

    match data
        .store()
        .assignment_find(body.project_id, body.member_id)
        .await
    {
        Ok(Some(_)) => {
            let err: anyhow::Error =
                ScheduleError::DuplicateAssignment(body.project_id, body.member_id).into();
            return schedule_error_response(&err, req.path());
        }
        Ok(None) => {}
        Err(e) => return schedule_error_response(&e, req.path()),
    }

    match data
        .store()
        .assignment_create(body.project_id, body.member_id)
        .await
    {
        Ok(created) => {
            data.publisher
                .publish(ScheduleChangeEvent::assignment_changed(
                    created.id,
                    created.project_id,
                    created.member_id,
                ))
                .await;
            tracing::info!(
                assignment_id = created.id,
                project_id = created.project_id,
                member_id = created.member_id,
                "Assignment created"
            );
            HttpResponse::Created().json(assignment_info(created))
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// List assignments
///
/// GET /v1/assignments
///
/// Accepts optional projectId and memberId filters.
#[get("")]
pub async fn get_assignments(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<AssignmentQuery>,
) -> impl Responder {
    match data
        .store()
        .assignments_find(params.project_id, params.member_id)
        .await
    {
        Ok(assignments) => {
            let response: Vec<AssignmentInfo> =
                assignments.into_iter().map(assignment_info).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

/// Remove an assignment, cascading its day assignments and groups
///
/// DELETE /v1/assignments/{id}
#[delete("/{id}")]
pub async fn delete_assignment(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    let existing = match data.store().assignment_get_by_id(id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return ErrorResult::not_found(format!("assignment '{}' not found", id), req.path());
        }
        Err(e) => return schedule_error_response(&e, req.path()),
    };

    match data.store().assignment_delete(id).await {
        Ok(true) => {
            data.publisher
                .publish(ScheduleChangeEvent::assignment_changed(
                    existing.id,
                    existing.project_id,
                    existing.member_id,
                ))
                .await;
            tracing::info!(assignment_id = id, "Assignment deleted");
            HttpResponse::NoContent().finish()
        }
        Ok(false) => {
            ErrorResult::not_found(format!("assignment '{}' not found", id), req.path())
        }
        Err(e) => schedule_error_response(&e, req.path()),
    }
}

fn customer_info(data: CustomerData) -> CustomerInfo {
    CustomerInfo {
        id: data.id,
        name: data.name,
        created_at: data.created_at,
        updated_at: data.updated_at,
    }
}

fn project_info(data: ProjectData) -> ProjectInfo {
    ProjectInfo {
        id: data.id,
        customer_id: data.customer_id,
        name: data.name,
        color: data.color,
        archived: data.archived,
        created_at: data.created_at,
        updated_at: data.updated_at,
    }
}

fn member_info(data: TeamMemberData) -> TeamMemberInfo {
    let schedule = WorkSchedule::from_json(&data.work_schedule).unwrap_or_default();
    TeamMemberInfo {
        id: data.id,
        name: data.name,
        email: data.email,
        work_schedule: schedule.days,
        created_at: data.created_at,
        updated_at: data.updated_at,
    }
}

fn assignment_info(data: AssignmentData) -> AssignmentInfo {
    AssignmentInfo {
        id: data.id,
        project_id: data.project_id,
        member_id: data.member_id,
    }
}
