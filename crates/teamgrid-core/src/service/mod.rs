//! Core services

pub mod schedule_event;

pub use schedule_event::{
    LoggingScheduleChangeListener, ScheduleChangeEvent, ScheduleChangeEventPublisher,
    ScheduleChangeListener, ScheduleChangeType,
};
