//! Calendar API models
//!
//! This module defines request/response models for milestones, day offs,
//! and public holidays.

pub mod model;

pub use model::*;
