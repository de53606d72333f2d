//! Main entry point for the Teamgrid scheduling server.
//!
//! This file wires up storage, the change event bus, and the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use teamgrid_core::ScheduleChangeEventPublisher;
use teamgrid_core::service::LoggingScheduleChangeListener;
use teamgrid_persistence::{
    ExternalDbScheduleStore, MemoryScheduleStore, ScheduleStore, StorageMode,
};
use teamgrid_server::{
    metrics,
    model::{AppState, Configuration},
    startup::{self, Shutdown},
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new();
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;
    metrics::init_metrics();

    let server_address = configuration.server_address();
    let server_main_port = configuration.server_main_port();
    let server_context_path = configuration.server_context_path();
    let event_queue_size = configuration.event_queue_size();

    info!("Starting in {} mode", configuration.startup_mode());

    // Initialize storage based on the configured mode
    let storage_mode = configuration.storage_mode();
    info!("Storage mode: {storage_mode}");

    let store: Arc<dyn ScheduleStore> = match storage_mode {
        StorageMode::ExternalDb => {
            let db = configuration.database_connection().await?;
            Arc::new(ExternalDbScheduleStore::new(db))
        }
        StorageMode::Memory => Arc::new(MemoryScheduleStore::new()),
    };

    // Start the change event bus and attach the logging listener
    let publisher = Arc::new(ScheduleChangeEventPublisher::new(event_queue_size));
    publisher.start().await;
    publisher
        .register_listener(Arc::new(LoggingScheduleChangeListener))
        .await;

    let app_state = Arc::new(AppState::new(configuration, store, publisher.clone()));

    // Arm signal handlers for graceful shutdown
    let shutdown = Shutdown::with_drain(Duration::from_secs(30));
    shutdown.listen_for_signals();

    info!("Listening on {server_address}:{server_main_port}");
    let server = startup::main_server(
        app_state.clone(),
        server_context_path,
        server_address,
        server_main_port,
    )?;

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("HTTP server terminated: {e}");
            }
        }
        _ = shutdown.drained() => {
            info!("Server shutting down gracefully");
        }
    }

    // Cleanup: stop the change event bus
    publisher.stop().await;

    info!("Teamgrid server shutdown complete");
    Ok(())
}
