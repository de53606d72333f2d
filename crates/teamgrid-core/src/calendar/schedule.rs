//! Weekly work schedules and non-working-day evaluation

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::holiday::holiday_on;

/// Weekly availability of a team member
///
/// One flag per weekday, Monday through Sunday. Stored on the member row as
/// a JSON array of seven booleans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkSchedule {
    pub days: [bool; 7],
}

impl Default for WorkSchedule {
    fn default() -> Self {
        // Monday to Friday
        Self {
            days: [true, true, true, true, true, false, false],
        }
    }
}

impl WorkSchedule {
    pub fn new(days: [bool; 7]) -> Self {
        Self { days }
    }

    /// Parse the JSON form stored on the member row
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The JSON form stored on the member row
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[true,true,true,true,true,false,false]".to_string())
    }

    /// Whether the weekly schedule marks the given day as a working day
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.days[date.weekday().num_days_from_monday() as usize]
    }
}

/// Why a calendar day counts as non-working for a member
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "reason", content = "detail")]
pub enum NonWorkingReason {
    /// The day is a public holiday (carries the holiday name)
    PublicHoliday(String),
    /// The member's weekly schedule marks this weekday unavailable
    OffSchedule,
    /// The member has an explicit day off record
    DayOff,
}

impl std::fmt::Display for NonWorkingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonWorkingReason::PublicHoliday(name) => write!(f, "public holiday ({})", name),
            NonWorkingReason::OffSchedule => write!(f, "outside weekly schedule"),
            NonWorkingReason::DayOff => write!(f, "day off"),
        }
    }
}

/// Every reason the given day is non-working for a member
///
/// Returns an empty list for a plain working day. `day_offs` is the set of
/// the member's explicit day off dates.
pub fn non_working_reasons(
    date: NaiveDate,
    schedule: &WorkSchedule,
    day_offs: &BTreeSet<NaiveDate>,
) -> Vec<NonWorkingReason> {
    let mut reasons = Vec::new();
    if let Some(holiday) = holiday_on(date) {
        reasons.push(NonWorkingReason::PublicHoliday(holiday.name));
    }
    if !schedule.is_working_day(date) {
        reasons.push(NonWorkingReason::OffSchedule);
    }
    if day_offs.contains(&date) {
        reasons.push(NonWorkingReason::DayOff);
    }
    reasons
}
