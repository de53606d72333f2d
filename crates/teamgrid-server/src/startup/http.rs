//! HTTP server setup for the main API server.

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{api, model::AppState};

/// Creates and binds the main HTTP server.
///
/// The main server carries the timeline engine API plus the roster,
/// calendar, and system endpoints, all under the configured context path.
pub fn main_server(
    app_state: Arc<AppState>,
    context_path: String,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .service(web::scope(&context_path).service(api::v1::route::routes()))
    })
    .bind((address, port))?
    .run())
}
