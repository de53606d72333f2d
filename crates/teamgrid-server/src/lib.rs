// Main library module for the Teamgrid scheduling server

// Module declarations
pub mod api; // API handlers and routes
pub mod metrics; // Metrics and observability
pub mod model; // Application state, configuration, responses
pub mod startup; // Application startup utilities

// Re-export common types so the binary and integration tests reach them
// through one path
pub use model::AppState;
pub use model::config::Configuration;
pub use model::response::ErrorResult;
