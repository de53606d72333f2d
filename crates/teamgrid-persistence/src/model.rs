//! Domain model types for persistence operations
//!
//! These are storage-facing data structures shared by all backends. They are
//! deliberately independent of the HTTP API models.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use teamgrid_common::Priority;

/// Storage mode for the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
    /// External database (MySQL/PostgreSQL via SeaORM)
    ExternalDb,
    /// In-process memory store (standalone single node, tests)
    Memory,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::ExternalDb => write!(f, "external_db"),
            StorageMode::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "external_db" => Ok(StorageMode::ExternalDb),
            "memory" => Ok(StorageMode::Memory),
            _ => Err(format!("Invalid storage mode: {}", s)),
        }
    }
}

/// Customer row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerData {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Project row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub id: i64,
    pub customer_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Team member row
///
/// `work_schedule` holds the weekly availability as a JSON array of seven
/// booleans, Monday through Sunday.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberData {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub work_schedule: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Assignment row linking a member to a project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentData {
    pub id: i64,
    pub project_id: i64,
    pub member_id: i64,
}

/// Day assignment row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayAssignmentData {
    pub id: i64,
    pub assignment_id: i64,
    pub date: NaiveDate,
    pub comment: Option<String>,
}

/// Assignment group row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentGroupData {
    pub id: i64,
    pub assignment_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: Priority,
    pub comment: Option<String>,
}

/// Milestone row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MilestoneData {
    pub id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    pub name: Option<String>,
}

/// Day off row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayOffData {
    pub id: i64,
    pub member_id: i64,
    pub date: NaiveDate,
}

/// The full timeline state of one assignment
///
/// `days` is the set of assigned calendar days; `groups` are the assignment
/// groups over those days, sorted by start date.
#[derive(Clone, Debug, Default)]
pub struct TimelineSnapshot {
    pub days: BTreeSet<NaiveDate>,
    pub groups: Vec<AssignmentGroupData>,
}

impl TimelineSnapshot {
    /// Group covering the given day, if any
    pub fn group_covering(&self, date: NaiveDate) -> Option<&AssignmentGroupData> {
        self.groups
            .iter()
            .find(|g| g.start_date <= date && date <= g.end_date)
    }
}

/// A day assignment to insert
#[derive(Clone, Debug, PartialEq)]
pub struct NewDayAssignment {
    pub date: NaiveDate,
    pub comment: Option<String>,
}

/// An assignment group to insert or resize
///
/// `id` of `None` inserts a new group; `Some` rewrites the stored group's
/// range and metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupWrite {
    pub id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: Priority,
    pub comment: Option<String>,
}

/// An atomic set of timeline writes for one assignment
///
/// Backends apply the whole change or none of it. Deletes run before
/// inserts so a change may rewrite a day or a group range in place.
#[derive(Clone, Debug, Default)]
pub struct TimelineChange {
    pub assignment_id: i64,
    pub insert_days: Vec<NewDayAssignment>,
    pub delete_days: Vec<NaiveDate>,
    pub delete_group_ids: Vec<i64>,
    pub upsert_groups: Vec<GroupWrite>,
}

impl TimelineChange {
    pub fn new(assignment_id: i64) -> Self {
        Self {
            assignment_id,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.insert_days.is_empty()
            && self.delete_days.is_empty()
            && self.delete_group_ids.is_empty()
            && self.upsert_groups.is_empty()
    }
}

/// Rows written by an applied timeline change
#[derive(Clone, Debug, Default)]
pub struct AppliedTimelineChange {
    /// Inserted day assignments, in `insert_days` order
    pub created_days: Vec<DayAssignmentData>,
    /// Upserted groups after the write, in `upsert_groups` order
    pub groups: Vec<AssignmentGroupData>,
}

/// Filter for timeline range queries
#[derive(Clone, Debug)]
pub struct TimelineQueryFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub project_id: Option<i64>,
    pub member_id: Option<i64>,
}
