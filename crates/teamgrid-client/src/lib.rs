//! Teamgrid Client - Rust SDK for the timeline dashboard
//!
//! This crate provides:
//! - HTTP transport speaking the `/v1` JSON API
//! - Local grid cache with optimistic updates and rollback
//! - Pointer-driven drag controller for create/delete/move interactions
//! - Timeline orchestrator tying cache, transport, and warnings together
//! - Listener registration for targeted cell re-rendering

pub mod cache;
pub mod drag;
pub mod error;
pub mod http;
pub mod listener;
pub mod timeline;
pub mod transport;

pub use cache::{AssignmentCheckpoint, GridCache};
pub use drag::{DragController, DragMode, DragOutcome, DragState, PressModifier};
pub use error::ClientError;
pub use http::{GridClientConfig, TeamgridHttpClient};
pub use listener::{FnGridListener, GridChangeEvent, GridEventListener};
pub use timeline::{ApplyOutcome, DateWarning, DragEffect, TimelineClient};
pub use transport::ScheduleTransport;
