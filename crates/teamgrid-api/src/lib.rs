//! Wire-format types for the Teamgrid HTTP API.
//!
//! Request and response models for the timeline, roster, and calendar
//! endpoints, plus the shared constants and input validation helpers.

pub mod calendar;
pub mod model;
pub mod roster;
pub mod timeline;
pub mod validation;

pub use model::*;
pub use validation::*;
