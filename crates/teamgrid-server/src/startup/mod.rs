//! Application startup utilities module.
//!
//! Shared initialization code for the server binary: logging, the HTTP
//! server builder, and graceful shutdown handling.

mod http;
mod logging;
mod shutdown;

pub use http::main_server;
pub use logging::{LoggingConfig, LoggingGuard, default_log_dir, init_logging};
pub use shutdown::Shutdown;
