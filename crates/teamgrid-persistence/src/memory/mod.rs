// In-process memory persistence backend
// Provides standalone (single-node) storage without an external database

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use teamgrid_common::Priority;

use crate::model::{
    AppliedTimelineChange, AssignmentData, AssignmentGroupData, CustomerData, DayAssignmentData,
    DayOffData, MilestoneData, ProjectData, StorageMode, TeamMemberData, TimelineChange,
    TimelineQueryFilter, TimelineSnapshot,
};
use crate::traits::ScheduleStore;
use crate::traits::calendar::CalendarStore;
use crate::traits::roster::RosterStore;
use crate::traits::timeline::TimelineStore;

#[derive(Default)]
struct MemoryState {
    seq: i64,
    customers: BTreeMap<i64, CustomerData>,
    projects: BTreeMap<i64, ProjectData>,
    members: BTreeMap<i64, TeamMemberData>,
    assignments: BTreeMap<i64, AssignmentData>,
    day_assignments: BTreeMap<i64, DayAssignmentData>,
    groups: BTreeMap<i64, AssignmentGroupData>,
    milestones: BTreeMap<i64, MilestoneData>,
    day_offs: BTreeMap<i64, DayOffData>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.seq += 1;
        self.seq
    }

    /// Assignment ids matching an optional project/member filter
    fn assignment_ids(&self, project_id: Option<i64>, member_id: Option<i64>) -> Vec<i64> {
        self.assignments
            .values()
            .filter(|a| project_id.is_none_or(|p| a.project_id == p))
            .filter(|a| member_id.is_none_or(|m| a.member_id == m))
            .map(|a| a.id)
            .collect()
    }

    fn apply_change(&mut self, change: &TimelineChange) -> AppliedTimelineChange {
        let mut applied = AppliedTimelineChange::default();

        for id in &change.delete_group_ids {
            self.groups.remove(id);
        }
        self.day_assignments.retain(|_, d| {
            d.assignment_id != change.assignment_id || !change.delete_days.contains(&d.date)
        });
        for day in &change.insert_days {
            let id = self.next_id();
            let data = DayAssignmentData {
                id,
                assignment_id: change.assignment_id,
                date: day.date,
                comment: day.comment.clone(),
            };
            self.day_assignments.insert(id, data.clone());
            applied.created_days.push(data);
        }
        for group in &change.upsert_groups {
            let id = group.id.unwrap_or_else(|| self.next_id());
            let data = AssignmentGroupData {
                id,
                assignment_id: change.assignment_id,
                start_date: group.start_date,
                end_date: group.end_date,
                priority: group.priority,
                comment: group.comment.clone(),
            };
            self.groups.insert(id, data.clone());
            applied.groups.push(data);
        }

        applied
    }

    fn delete_assignment_cascade(&mut self, assignment_id: i64) {
        self.day_assignments
            .retain(|_, d| d.assignment_id != assignment_id);
        self.groups.retain(|_, g| g.assignment_id != assignment_id);
        self.assignments.remove(&assignment_id);
    }

    fn delete_project_cascade(&mut self, project_id: i64) {
        let assignment_ids: Vec<i64> = self
            .assignments
            .values()
            .filter(|a| a.project_id == project_id)
            .map(|a| a.id)
            .collect();
        for id in assignment_ids {
            self.delete_assignment_cascade(id);
        }
        self.milestones.retain(|_, m| m.project_id != project_id);
        self.projects.remove(&project_id);
    }
}

/// Standalone in-process schedule store
///
/// All state lives behind one `RwLock`, so a timeline change applies under a
/// single write lock and is atomic with respect to readers. Suitable for
/// single-node deployments without an external database, and for tests.
#[derive(Default)]
pub struct MemoryScheduleStore {
    state: RwLock<MemoryState>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the timeline invariants of one assignment
    ///
    /// Every group range must be fully covered by day assignments, and no two
    /// groups of the assignment may overlap or touch within a contiguous run.
    pub fn verify_timeline_invariants(&self, assignment_id: i64) -> anyhow::Result<()> {
        let state = self.state.read();
        let days: std::collections::BTreeSet<NaiveDate> = state
            .day_assignments
            .values()
            .filter(|d| d.assignment_id == assignment_id)
            .map(|d| d.date)
            .collect();
        let mut groups: Vec<&AssignmentGroupData> = state
            .groups
            .values()
            .filter(|g| g.assignment_id == assignment_id)
            .collect();
        groups.sort_by_key(|g| g.start_date);

        for group in &groups {
            if group.start_date > group.end_date {
                anyhow::bail!("group {} has an inverted range", group.id);
            }
            let mut date = group.start_date;
            while date <= group.end_date {
                if !days.contains(&date) {
                    anyhow::bail!("group {} covers unassigned day {}", group.id, date);
                }
                date = date.succ_opt().expect("date overflow");
            }
        }
        for pair in groups.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if right.start_date <= left.end_date {
                anyhow::bail!("groups {} and {} overlap", left.id, right.id);
            }
            let gap_start = left.end_date.succ_opt().expect("date overflow");
            if right.start_date == gap_start && days.contains(&gap_start) {
                anyhow::bail!(
                    "groups {} and {} touch inside a contiguous run",
                    left.id,
                    right.id
                );
            }
        }
        Ok(())
    }
}

// ============================================================================
// ScheduleStore implementation
// ============================================================================

#[async_trait]
impl ScheduleStore for MemoryScheduleStore {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Memory
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

// ============================================================================
// TimelineStore implementation
// ============================================================================

#[async_trait]
impl TimelineStore for MemoryScheduleStore {
    async fn day_get_by_id(&self, id: i64) -> anyhow::Result<Option<DayAssignmentData>> {
        Ok(self.state.read().day_assignments.get(&id).cloned())
    }

    async fn day_find(
        &self,
        assignment_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Option<DayAssignmentData>> {
        let state = self.state.read();
        Ok(state
            .day_assignments
            .values()
            .find(|d| d.assignment_id == assignment_id && d.date == date)
            .cloned())
    }

    async fn days_find_in_range(
        &self,
        filter: &TimelineQueryFilter,
    ) -> anyhow::Result<Vec<DayAssignmentData>> {
        let state = self.state.read();
        let ids = if filter.project_id.is_some() || filter.member_id.is_some() {
            Some(state.assignment_ids(filter.project_id, filter.member_id))
        } else {
            None
        };
        let mut days: Vec<DayAssignmentData> = state
            .day_assignments
            .values()
            .filter(|d| filter.start_date <= d.date && d.date <= filter.end_date)
            .filter(|d| ids.as_ref().is_none_or(|ids| ids.contains(&d.assignment_id)))
            .cloned()
            .collect();
        days.sort_by_key(|d| (d.assignment_id, d.date));
        Ok(days)
    }

    async fn group_get_by_id(&self, id: i64) -> anyhow::Result<Option<AssignmentGroupData>> {
        Ok(self.state.read().groups.get(&id).cloned())
    }

    async fn groups_find_in_range(
        &self,
        filter: &TimelineQueryFilter,
    ) -> anyhow::Result<Vec<AssignmentGroupData>> {
        let state = self.state.read();
        let ids = if filter.project_id.is_some() || filter.member_id.is_some() {
            Some(state.assignment_ids(filter.project_id, filter.member_id))
        } else {
            None
        };
        let mut groups: Vec<AssignmentGroupData> = state
            .groups
            .values()
            .filter(|g| g.start_date <= filter.end_date && g.end_date >= filter.start_date)
            .filter(|g| ids.as_ref().is_none_or(|ids| ids.contains(&g.assignment_id)))
            .cloned()
            .collect();
        groups.sort_by_key(|g| (g.assignment_id, g.start_date));
        Ok(groups)
    }

    async fn group_update_metadata(
        &self,
        id: i64,
        priority: Priority,
        comment: Option<String>,
    ) -> anyhow::Result<Option<AssignmentGroupData>> {
        let mut state = self.state.write();
        let Some(group) = state.groups.get_mut(&id) else {
            return Ok(None);
        };
        group.priority = priority;
        group.comment = comment;
        Ok(Some(group.clone()))
    }

    async fn timeline_snapshot(&self, assignment_id: i64) -> anyhow::Result<TimelineSnapshot> {
        let state = self.state.read();
        let days = state
            .day_assignments
            .values()
            .filter(|d| d.assignment_id == assignment_id)
            .map(|d| d.date)
            .collect();
        let mut groups: Vec<AssignmentGroupData> = state
            .groups
            .values()
            .filter(|g| g.assignment_id == assignment_id)
            .cloned()
            .collect();
        groups.sort_by_key(|g| g.start_date);
        Ok(TimelineSnapshot { days, groups })
    }

    async fn apply_change(
        &self,
        change: &TimelineChange,
    ) -> anyhow::Result<AppliedTimelineChange> {
        if change.is_empty() {
            return Ok(AppliedTimelineChange::default());
        }
        Ok(self.state.write().apply_change(change))
    }

    async fn apply_changes(
        &self,
        changes: &[TimelineChange],
    ) -> anyhow::Result<Vec<AppliedTimelineChange>> {
        let mut state = self.state.write();
        Ok(changes.iter().map(|c| state.apply_change(c)).collect())
    }

    async fn member_days_on(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<DayAssignmentData>> {
        let state = self.state.read();
        let ids = state.assignment_ids(None, Some(member_id));
        Ok(state
            .day_assignments
            .values()
            .filter(|d| d.date == date && ids.contains(&d.assignment_id))
            .cloned()
            .collect())
    }
}

// ============================================================================
// RosterStore implementation
// ============================================================================

#[async_trait]
impl RosterStore for MemoryScheduleStore {
    async fn customer_create(&self, name: &str) -> anyhow::Result<CustomerData> {
        let mut state = self.state.write();
        let id = state.next_id();
        let now = chrono::Utc::now().naive_utc();
        let data = CustomerData {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.customers.insert(id, data.clone());
        Ok(data)
    }

    async fn customer_find_all(&self) -> anyhow::Result<Vec<CustomerData>> {
        let mut customers: Vec<CustomerData> =
            self.state.read().customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn customer_get_by_id(&self, id: i64) -> anyhow::Result<Option<CustomerData>> {
        Ok(self.state.read().customers.get(&id).cloned())
    }

    async fn customer_delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        if state.customers.remove(&id).is_none() {
            return Ok(false);
        }
        let project_ids: Vec<i64> = state
            .projects
            .values()
            .filter(|p| p.customer_id == id)
            .map(|p| p.id)
            .collect();
        for project_id in project_ids {
            state.delete_project_cascade(project_id);
        }
        Ok(true)
    }

    async fn project_create(
        &self,
        customer_id: i64,
        name: &str,
        color: Option<String>,
    ) -> anyhow::Result<ProjectData> {
        let mut state = self.state.write();
        let id = state.next_id();
        let now = chrono::Utc::now().naive_utc();
        let data = ProjectData {
            id,
            customer_id,
            name: name.to_string(),
            color,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        state.projects.insert(id, data.clone());
        Ok(data)
    }

    async fn project_find_all(&self) -> anyhow::Result<Vec<ProjectData>> {
        let mut projects: Vec<ProjectData> =
            self.state.read().projects.values().cloned().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    async fn project_get_by_id(&self, id: i64) -> anyhow::Result<Option<ProjectData>> {
        Ok(self.state.read().projects.get(&id).cloned())
    }

    async fn project_update(
        &self,
        id: i64,
        name: Option<String>,
        color: Option<String>,
        archived: Option<bool>,
    ) -> anyhow::Result<Option<ProjectData>> {
        let mut state = self.state.write();
        let Some(project) = state.projects.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            project.name = name;
        }
        if let Some(color) = color {
            project.color = Some(color);
        }
        if let Some(archived) = archived {
            project.archived = archived;
        }
        project.updated_at = chrono::Utc::now().naive_utc();
        Ok(Some(project.clone()))
    }

    async fn project_delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        if !state.projects.contains_key(&id) {
            return Ok(false);
        }
        state.delete_project_cascade(id);
        Ok(true)
    }

    async fn member_create(
        &self,
        name: &str,
        email: Option<String>,
        work_schedule: &str,
    ) -> anyhow::Result<TeamMemberData> {
        let mut state = self.state.write();
        let id = state.next_id();
        let now = chrono::Utc::now().naive_utc();
        let data = TeamMemberData {
            id,
            name: name.to_string(),
            email,
            work_schedule: work_schedule.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.members.insert(id, data.clone());
        Ok(data)
    }

    async fn member_find_all(&self) -> anyhow::Result<Vec<TeamMemberData>> {
        let mut members: Vec<TeamMemberData> =
            self.state.read().members.values().cloned().collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    async fn member_get_by_id(&self, id: i64) -> anyhow::Result<Option<TeamMemberData>> {
        Ok(self.state.read().members.get(&id).cloned())
    }

    async fn member_update(
        &self,
        id: i64,
        name: Option<String>,
        email: Option<String>,
        work_schedule: Option<String>,
    ) -> anyhow::Result<Option<TeamMemberData>> {
        let mut state = self.state.write();
        let Some(member) = state.members.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            member.name = name;
        }
        if let Some(email) = email {
            member.email = Some(email);
        }
        if let Some(work_schedule) = work_schedule {
            member.work_schedule = work_schedule;
        }
        member.updated_at = chrono::Utc::now().naive_utc();
        Ok(Some(member.clone()))
    }

    async fn member_delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        if state.members.remove(&id).is_none() {
            return Ok(false);
        }
        let assignment_ids: Vec<i64> = state
            .assignments
            .values()
            .filter(|a| a.member_id == id)
            .map(|a| a.id)
            .collect();
        for assignment_id in assignment_ids {
            state.delete_assignment_cascade(assignment_id);
        }
        state.day_offs.retain(|_, d| d.member_id != id);
        Ok(true)
    }

    async fn assignment_create(
        &self,
        project_id: i64,
        member_id: i64,
    ) -> anyhow::Result<AssignmentData> {
        let mut state = self.state.write();
        let id = state.next_id();
        let data = AssignmentData {
            id,
            project_id,
            member_id,
        };
        state.assignments.insert(id, data.clone());
        Ok(data)
    }

    async fn assignment_get_by_id(&self, id: i64) -> anyhow::Result<Option<AssignmentData>> {
        Ok(self.state.read().assignments.get(&id).cloned())
    }

    async fn assignment_find(
        &self,
        project_id: i64,
        member_id: i64,
    ) -> anyhow::Result<Option<AssignmentData>> {
        let state = self.state.read();
        Ok(state
            .assignments
            .values()
            .find(|a| a.project_id == project_id && a.member_id == member_id)
            .cloned())
    }

    async fn assignments_find(
        &self,
        project_id: Option<i64>,
        member_id: Option<i64>,
    ) -> anyhow::Result<Vec<AssignmentData>> {
        let state = self.state.read();
        let mut assignments: Vec<AssignmentData> = state
            .assignments
            .values()
            .filter(|a| project_id.is_none_or(|p| a.project_id == p))
            .filter(|a| member_id.is_none_or(|m| a.member_id == m))
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.id);
        Ok(assignments)
    }

    async fn assignment_delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        if !state.assignments.contains_key(&id) {
            return Ok(false);
        }
        state.delete_assignment_cascade(id);
        Ok(true)
    }
}

// ============================================================================
// CalendarStore implementation
// ============================================================================

#[async_trait]
impl CalendarStore for MemoryScheduleStore {
    async fn milestone_create(
        &self,
        project_id: i64,
        date: NaiveDate,
        name: Option<String>,
    ) -> anyhow::Result<MilestoneData> {
        let mut state = self.state.write();
        let id = state.next_id();
        let data = MilestoneData {
            id,
            project_id,
            date,
            name,
        };
        state.milestones.insert(id, data.clone());
        Ok(data)
    }

    async fn milestone_get_by_id(&self, id: i64) -> anyhow::Result<Option<MilestoneData>> {
        Ok(self.state.read().milestones.get(&id).cloned())
    }

    async fn milestone_update(
        &self,
        id: i64,
        date: Option<NaiveDate>,
        name: Option<String>,
    ) -> anyhow::Result<Option<MilestoneData>> {
        let mut state = self.state.write();
        let Some(milestone) = state.milestones.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(date) = date {
            milestone.date = date;
        }
        if let Some(name) = name {
            milestone.name = Some(name);
        }
        Ok(Some(milestone.clone()))
    }

    async fn milestone_delete(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.state.write().milestones.remove(&id).is_some())
    }

    async fn milestones_find_in_range(
        &self,
        project_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> anyhow::Result<Vec<MilestoneData>> {
        let state = self.state.read();
        let mut milestones: Vec<MilestoneData> = state
            .milestones
            .values()
            .filter(|m| m.project_id == project_id)
            .filter(|m| start_date <= m.date && m.date <= end_date)
            .cloned()
            .collect();
        milestones.sort_by_key(|m| m.date);
        Ok(milestones)
    }

    async fn day_off_create(
        &self,
        member_id: i64,
        date: NaiveDate,
        changes: &[TimelineChange],
    ) -> anyhow::Result<DayOffData> {
        let mut state = self.state.write();
        let id = state.next_id();
        let data = DayOffData {
            id,
            member_id,
            date,
        };
        state.day_offs.insert(id, data.clone());
        for change in changes {
            state.apply_change(change);
        }
        Ok(data)
    }

    async fn day_off_get_by_id(&self, id: i64) -> anyhow::Result<Option<DayOffData>> {
        Ok(self.state.read().day_offs.get(&id).cloned())
    }

    async fn day_off_find(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Option<DayOffData>> {
        let state = self.state.read();
        Ok(state
            .day_offs
            .values()
            .find(|d| d.member_id == member_id && d.date == date)
            .cloned())
    }

    async fn day_off_delete(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.state.write().day_offs.remove(&id).is_some())
    }

    async fn day_offs_find_in_range(
        &self,
        member_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> anyhow::Result<Vec<DayOffData>> {
        let state = self.state.read();
        let mut day_offs: Vec<DayOffData> = state
            .day_offs
            .values()
            .filter(|d| d.member_id == member_id)
            .filter(|d| start_date <= d.date && d.date <= end_date)
            .cloned()
            .collect();
        day_offs.sort_by_key(|d| d.date);
        Ok(day_offs)
    }
}
