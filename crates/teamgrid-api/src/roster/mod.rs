//! Roster API models
//!
//! This module defines request/response models for customers, projects,
//! team members, and assignments.

pub mod model;

pub use model::*;
