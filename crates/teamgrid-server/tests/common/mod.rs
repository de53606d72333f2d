//! Shared helpers for server API tests
//!
//! Builds an in-process service over a fresh memory store so the tests can
//! drive the full route table without binding a port.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};

use teamgrid_core::ScheduleChangeEventPublisher;
use teamgrid_persistence::MemoryScheduleStore;
use teamgrid_server::api;
use teamgrid_server::model::{AppState, Configuration};

/// Create a test app with a fresh memory store and a started event bus
pub async fn test_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let store = Arc::new(MemoryScheduleStore::new());
    let publisher = Arc::new(ScheduleChangeEventPublisher::new(64));
    publisher.start().await;
    let app_state = Arc::new(AppState::new(Configuration::empty(), store, publisher));

    test::init_service(
        App::new()
            .app_data(web::Data::from(app_state))
            .service(api::v1::route::routes()),
    )
    .await
}

/// POST a JSON body and return the raw response
pub async fn post_json<S>(app: &S, uri: &str, body: serde_json::Value) -> ServiceResponse
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

/// Seed a customer, a project, and a member wired together by one assignment
///
/// Returns (project_id, member_id, assignment_id).
pub async fn seed_assignment<S>(app: &S) -> (i64, i64, i64)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = post_json(app, "/v1/customers", serde_json::json!({"name": "Acme"})).await;
    assert_eq!(resp.status(), 201, "customer seed failed");
    let customer: serde_json::Value = test::read_body_json(resp).await;

    let resp = post_json(
        app,
        "/v1/projects",
        serde_json::json!({"customerId": customer["id"], "name": "Website"}),
    )
    .await;
    assert_eq!(resp.status(), 201, "project seed failed");
    let project: serde_json::Value = test::read_body_json(resp).await;

    let resp = post_json(app, "/v1/members", serde_json::json!({"name": "Dana"})).await;
    assert_eq!(resp.status(), 201, "member seed failed");
    let member: serde_json::Value = test::read_body_json(resp).await;

    let resp = post_json(
        app,
        "/v1/assignments",
        serde_json::json!({"projectId": project["id"], "memberId": member["id"]}),
    )
    .await;
    assert_eq!(resp.status(), 201, "assignment seed failed");
    let assignment: serde_json::Value = test::read_body_json(resp).await;

    (
        project["id"].as_i64().unwrap(),
        member["id"].as_i64().unwrap(),
        assignment["id"].as_i64().unwrap(),
    )
}

/// Create day assignments through the batch endpoint, returning their ids
pub async fn seed_days<S>(app: &S, assignment_id: i64, dates: &[&str]) -> Vec<i64>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = post_json(
        app,
        "/v1/timeline/days/batch",
        serde_json::json!({"assignmentId": assignment_id, "dates": dates}),
    )
    .await;
    assert_eq!(resp.status(), 201, "day seed failed");
    let days: Vec<serde_json::Value> = test::read_body_json(resp).await;
    days.iter().map(|d| d["id"].as_i64().unwrap()).collect()
}
