//! Shared server-side models.
//!
//! Application state, configuration access, and the HTTP response types the
//! handlers return.

pub mod app_state;
pub mod config;
pub mod response;

pub use app_state::AppState;
pub use config::Configuration;
pub use response::{ErrorResult, GroupConflictResult, schedule_error_response};
