//! Roster, calendar, and system API integration tests
//!
//! Drives the /v1/customers, /v1/projects, /v1/members, /v1/assignments,
//! /v1/milestones, /v1/dayoffs, and system endpoints over the memory store.

mod common;

use actix_web::test;
use serde_json::json;

use common::{post_json, seed_assignment, seed_days, test_app};

#[actix_web::test]
async fn test_customer_crud() {
    let app = test_app().await;

    let resp = post_json(&app, "/v1/customers", json!({"name": "Acme"})).await;
    assert_eq!(resp.status(), 201);
    let customer: serde_json::Value = test::read_body_json(resp).await;
    let id = customer["id"].as_i64().unwrap();
    assert_eq!(customer["name"], "Acme");

    let req = test::TestRequest::get().uri("/v1/customers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let customers: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(customers.len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/customers/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/customers/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/customers/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_customer_rejects_blank_name() {
    let app = test_app().await;

    let resp = post_json(&app, "/v1/customers", json!({"name": "   "})).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_project_crud() {
    let app = test_app().await;

    let resp = post_json(&app, "/v1/customers", json!({"name": "Acme"})).await;
    let customer: serde_json::Value = test::read_body_json(resp).await;

    let resp = post_json(
        &app,
        "/v1/projects",
        json!({"customerId": customer["id"], "name": "Website", "color": "#3366ff"}),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let project: serde_json::Value = test::read_body_json(resp).await;
    let id = project["id"].as_i64().unwrap();
    assert_eq!(project["color"], "#3366ff");
    assert_eq!(project["archived"], false);

    // Unknown customer
    let resp = post_json(
        &app,
        "/v1/projects",
        json!({"customerId": 999, "name": "Orphan"}),
    )
    .await;
    assert_eq!(resp.status(), 404);

    // Malformed color
    let resp = post_json(
        &app,
        "/v1/projects",
        json!({"customerId": customer["id"], "name": "Bad", "color": "blue"}),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::put()
        .uri(&format!("/v1/projects/{}", id))
        .set_json(json!({"name": "Relaunch", "archived": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["name"], "Relaunch");
    assert_eq!(updated["archived"], true);
    assert_eq!(updated["color"], "#3366ff");

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/projects/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/projects/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_member_schedule_defaults_and_updates() {
    let app = test_app().await;

    let resp = post_json(&app, "/v1/members", json!({"name": "Dana"})).await;
    assert_eq!(resp.status(), 201);
    let member: serde_json::Value = test::read_body_json(resp).await;
    let id = member["id"].as_i64().unwrap();
    assert_eq!(
        member["workSchedule"],
        json!([true, true, true, true, true, false, false])
    );

    let resp = post_json(
        &app,
        "/v1/members",
        json!({"name": "Robin", "email": "not-an-email"}),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::put()
        .uri(&format!("/v1/members/{}", id))
        .set_json(json!({
            "email": "dana@example.com",
            "workSchedule": [true, true, true, true, false, false, false]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["name"], "Dana");
    assert_eq!(updated["email"], "dana@example.com");
    assert_eq!(
        updated["workSchedule"],
        json!([true, true, true, true, false, false, false])
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/members/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
}

#[actix_web::test]
async fn test_assignment_duplicate_conflict() {
    let app = test_app().await;
    let (project_id, member_id, assignment_id) = seed_assignment(&app).await;

    // Assigning the same pair again conflicts
    let resp = post_json(
        &app,
        "/v1/assignments",
        json!({"projectId": project_id, "memberId": member_id}),
    )
    .await;
    assert_eq!(resp.status(), 409);

    let resp = post_json(
        &app,
        "/v1/assignments",
        json!({"projectId": 999, "memberId": member_id}),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/assignments?projectId={}", project_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let assignments: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0]["id"], assignment_id);

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/assignments/{}", assignment_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/assignments/{}", assignment_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_milestone_lifecycle() {
    let app = test_app().await;
    let (project_id, _, _) = seed_assignment(&app).await;

    let resp = post_json(
        &app,
        "/v1/milestones",
        json!({"projectId": project_id, "date": "2026-03-31", "name": "beta"}),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let milestone: serde_json::Value = test::read_body_json(resp).await;
    let id = milestone["id"].as_i64().unwrap();

    let resp = post_json(
        &app,
        "/v1/milestones",
        json!({"projectId": 999, "date": "2026-03-31"}),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/v1/milestones?projectId={}&startDate=2026-03-01&endDate=2026-03-31",
            project_id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let milestones: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(milestones.len(), 1);

    let req = test::TestRequest::patch()
        .uri(&format!("/v1/milestones/{}", id))
        .set_json(json!({"date": "2026-04-15"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["date"], "2026-04-15");
    assert_eq!(updated["name"], "beta");

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/milestones/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::patch()
        .uri(&format!("/v1/milestones/{}", id))
        .set_json(json!({"name": "late"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_day_off_removes_assigned_days_and_splits_groups() {
    let app = test_app().await;
    let (_, member_id, assignment_id) = seed_assignment(&app).await;
    seed_days(&app, assignment_id, &["2026-01-05", "2026-01-06", "2026-01-07"]).await;

    let resp = post_json(
        &app,
        "/v1/timeline/groups",
        json!({
            "assignmentId": assignment_id,
            "startDate": "2026-01-05",
            "endDate": "2026-01-07",
            "priority": "high"
        }),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = post_json(
        &app,
        "/v1/dayoffs",
        json!({"memberId": member_id, "date": "2026-01-06"}),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let day_off: serde_json::Value = test::read_body_json(resp).await;
    let day_off_id = day_off["id"].as_i64().unwrap();

    // The assigned day on the day off is gone
    let req = test::TestRequest::get()
        .uri("/v1/timeline/days?startDate=2026-01-01&endDate=2026-01-31")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let days: Vec<serde_json::Value> = test::read_body_json(resp).await;
    let dates: Vec<&str> = days.iter().map(|d| d["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2026-01-05", "2026-01-07"]);

    // The group covering that day got split around it
    let req = test::TestRequest::get()
        .uri("/v1/timeline/groups?startDate=2026-01-01&endDate=2026-01-31")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let groups: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["startDate"], "2026-01-05");
    assert_eq!(groups[0]["endDate"], "2026-01-05");
    assert_eq!(groups[1]["startDate"], "2026-01-07");
    assert_eq!(groups[1]["endDate"], "2026-01-07");
    assert!(groups.iter().all(|g| g["priority"] == "high"));

    // Recording the same day off again returns the stored row
    let resp = post_json(
        &app,
        "/v1/dayoffs",
        json!({"memberId": member_id, "date": "2026-01-06"}),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let again: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(again["id"], day_off_id);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/v1/dayoffs?memberId={}&startDate=2026-01-01&endDate=2026-01-31",
            member_id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let day_offs: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(day_offs.len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/dayoffs/{}", day_off_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
}

#[actix_web::test]
async fn test_day_off_unknown_member() {
    let app = test_app().await;

    let resp = post_json(&app, "/v1/dayoffs", json!({"memberId": 999, "date": "2026-01-06"})).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_holiday_listing() {
    let app = test_app().await;

    let req = test::TestRequest::get()
        .uri("/v1/calendar/holidays?year=2026")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let holidays: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(holidays.len(), 10);
    assert_eq!(holidays[0]["date"], "2026-01-01");
    assert_eq!(holidays[0]["name"], "New Year's Day");
}

#[actix_web::test]
async fn test_health_and_state() {
    let app = test_app().await;

    let req = test::TestRequest::get().uri("/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let health: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(health["status"], "UP");
    assert_eq!(health["storageMode"], "memory");

    let req = test::TestRequest::get().uri("/v1/state").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let state: serde_json::Value = test::read_body_json(resp).await;
    assert!(!state["version"].as_str().unwrap().is_empty());
    assert_eq!(state["standalone"], false);
    assert_eq!(state["contextPath"], "");
}
