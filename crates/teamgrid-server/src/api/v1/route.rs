//! V1 API routing configuration
//!
//! This module configures the routes for the Teamgrid V1 API.

use actix_web::{Scope, web};

use super::{calendar, roster, system, timeline};

/// Create the V1 API routes
///
/// Routes:
/// - POST /v1/timeline/days - Create a day assignment
/// - POST /v1/timeline/days/batch - Create several day assignments at once
/// - POST /v1/timeline/days/batch-delete - Delete several day assignments at once
/// - GET /v1/timeline/days - List day assignments in a date range
/// - DELETE /v1/timeline/days/{id} - Delete a day assignment
/// - POST /v1/timeline/groups - Create an assignment group
/// - GET /v1/timeline/groups - List assignment groups in a date range
/// - PATCH /v1/timeline/groups/{id} - Update group metadata
/// - POST /v1/timeline/move - Move a contiguous block of days
/// - POST /v1/customers - Create a customer
/// - GET /v1/customers - List customers
/// - GET /v1/customers/{id} - Get a customer
/// - DELETE /v1/customers/{id} - Delete a customer
/// - POST /v1/projects - Create a project
/// - GET /v1/projects - List projects
/// - GET /v1/projects/{id} - Get a project
/// - PUT /v1/projects/{id} - Update a project
/// - DELETE /v1/projects/{id} - Delete a project
/// - POST /v1/members - Create a team member
/// - GET /v1/members - List team members
/// - GET /v1/members/{id} - Get a team member
/// - PUT /v1/members/{id} - Update a team member
/// - DELETE /v1/members/{id} - Delete a team member
/// - POST /v1/assignments - Assign a member to a project
/// - GET /v1/assignments - List assignments
/// - DELETE /v1/assignments/{id} - Remove an assignment
/// - POST /v1/milestones - Create a milestone
/// - GET /v1/milestones - List milestones
/// - PATCH /v1/milestones/{id} - Update a milestone
/// - DELETE /v1/milestones/{id} - Delete a milestone
/// - POST /v1/dayoffs - Record a day off
/// - GET /v1/dayoffs - List day offs
/// - DELETE /v1/dayoffs/{id} - Delete a day off
/// - GET /v1/calendar/holidays - List public holidays of a year
/// - GET /v1/health - Storage health probe
/// - GET /v1/state - Server build and deployment state
pub fn routes() -> Scope {
    web::scope("/v1")
        .service(
            web::scope("/timeline")
                .service(timeline::create_day)
                .service(timeline::create_days)
                .service(timeline::delete_days)
                .service(timeline::find_days)
                .service(timeline::delete_day)
                .service(timeline::create_group)
                .service(timeline::find_groups)
                .service(timeline::update_group)
                .service(timeline::move_block),
        )
        .service(
            web::scope("/customers")
                .service(roster::create_customer)
                .service(roster::get_customers)
                .service(roster::get_customer)
                .service(roster::delete_customer),
        )
        .service(
            web::scope("/projects")
                .service(roster::create_project)
                .service(roster::get_projects)
                .service(roster::get_project)
                .service(roster::update_project)
                .service(roster::delete_project),
        )
        .service(
            web::scope("/members")
                .service(roster::create_member)
                .service(roster::get_members)
                .service(roster::get_member)
                .service(roster::update_member)
                .service(roster::delete_member),
        )
        .service(
            web::scope("/assignments")
                .service(roster::create_assignment)
                .service(roster::get_assignments)
                .service(roster::delete_assignment),
        )
        .service(
            web::scope("/milestones")
                .service(calendar::create_milestone)
                .service(calendar::find_milestones)
                .service(calendar::update_milestone)
                .service(calendar::delete_milestone),
        )
        .service(
            web::scope("/dayoffs")
                .service(calendar::create_day_off)
                .service(calendar::find_day_offs)
                .service(calendar::delete_day_off),
        )
        .service(web::scope("/calendar").service(calendar::get_holidays))
        .service(system::health)
        .service(system::state)
}
