//! Teamgrid Core - Change notifications and calendar services
//!
//! This crate provides:
//! - The in-process schedule change event bus
//! - Public holiday computation
//! - Weekly work schedules and non-working-day evaluation

pub mod calendar;
pub mod service;

// Re-export commonly used types
pub use calendar::{Holiday, NonWorkingReason, WorkSchedule, holiday_on, holidays_for_year};
pub use service::{
    ScheduleChangeEvent, ScheduleChangeEventPublisher, ScheduleChangeListener, ScheduleChangeType,
};
