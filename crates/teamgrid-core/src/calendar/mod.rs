//! Calendar services
//!
//! Public holiday computation and weekly work schedules. Everything here is
//! a pure function of its inputs; nothing in this module touches storage.

pub mod holiday;
pub mod schedule;

pub use holiday::{Holiday, easter_sunday, holiday_on, holidays_for_year};
pub use schedule::{NonWorkingReason, WorkSchedule, non_working_reasons};
