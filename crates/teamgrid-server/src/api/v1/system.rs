//! V1 system API handlers
//!
//! Implements the operational endpoints:
//! - GET /v1/health - Storage health probe
//! - GET /v1/state - Server build and deployment state

use actix_web::{HttpResponse, Responder, get, web};

use crate::model::AppState;

use super::model::{HealthInfo, ServerState};

/// Storage health probe
///
/// GET /v1/health
///
/// Answers 200 with status UP when the storage backend is reachable,
/// 503 with status DOWN otherwise.
#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> impl Responder {
    let storage_mode = data.store().storage_mode().to_string();

    match data.store().health_check().await {
        Ok(()) => HttpResponse::Ok().json(HealthInfo {
            status: "UP".to_string(),
            storage_mode,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Storage health check failed");
            HttpResponse::ServiceUnavailable().json(HealthInfo {
                status: "DOWN".to_string(),
                storage_mode,
            })
        }
    }
}

/// Server build and deployment state
///
/// GET /v1/state
#[get("/state")]
pub async fn state(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ServerState {
        version: data.configuration.version(),
        standalone: data.configuration.is_standalone(),
        context_path: data.configuration.server_context_path(),
    })
}
