//! Teamgrid Timeline - Assignment timeline engine
//!
//! This crate provides:
//! - Range algebra over assigned-day sets
//! - Merge/split planning for assignment groups
//! - Block move with destination merging
//! - Timeline services wiring planners, stores, and change events

pub mod plan;
pub mod range;
pub mod service;

pub use plan::*;
pub use range::*;
