//! Timeline engine API models
//!
//! This module defines request/response models for day assignments,
//! assignment groups, and block moves.

pub mod model;

pub use model::*;
