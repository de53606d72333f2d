//! Storage layer for the scheduling data: SeaORM entities, the store
//! traits, and the in-memory and SQL backends behind them.

pub mod entity;
pub mod memory;
pub mod model;
pub mod sql;
pub mod traits;

pub use sea_orm;

pub use entity::prelude::*;
pub use memory::MemoryScheduleStore;
pub use model::{
    AppliedTimelineChange, AssignmentData, AssignmentGroupData, CustomerData, DayAssignmentData,
    DayOffData, GroupWrite, MilestoneData, NewDayAssignment, ProjectData, StorageMode,
    TeamMemberData, TimelineChange, TimelineQueryFilter, TimelineSnapshot,
};
pub use sql::ExternalDbScheduleStore;
pub use traits::{CalendarStore, RosterStore, ScheduleStore, TimelineStore};
