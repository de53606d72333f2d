//! Teamgrid V1 REST API implementation
//!
//! This module provides the JSON endpoints consumed by the dashboard client.
//! Handlers validate their input, call into the service layer and map
//! failures onto plain HTTP error bodies.

pub mod calendar;
pub mod model;
pub mod roster;
pub mod route;
pub mod system;
pub mod timeline;
