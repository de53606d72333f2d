//! SQL-based persistence backend (MySQL/PostgreSQL via SeaORM)
//!
//! This module implements the `ScheduleStore` trait on top of a SeaORM
//! `DatabaseConnection`. Every timeline change runs inside one database
//! transaction so day assignments and their group consequences commit
//! together or not at all.

use async_trait::async_trait;
use sea_orm::{prelude::Expr, *};

use chrono::NaiveDate;

use teamgrid_common::Priority;

use crate::entity::{
    assignment, assignment_group, customer, day_assignment, day_off, milestone, project,
    team_member,
};
use crate::model::*;
use crate::traits::*;

/// External database schedule store
///
/// Wraps a SeaORM `DatabaseConnection` and implements all persistence traits
/// with direct database queries.
pub struct ExternalDbScheduleStore {
    db: DatabaseConnection,
}

impl ExternalDbScheduleStore {
    /// Create a new ExternalDbScheduleStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Resolve the assignment ids matching an optional project/member filter
    async fn assignment_ids(
        &self,
        project_id: Option<i64>,
        member_id: Option<i64>,
    ) -> anyhow::Result<Vec<i64>> {
        let mut query = assignment::Entity::find()
            .select_only()
            .column(assignment::Column::Id);
        if let Some(project_id) = project_id {
            query = query.filter(assignment::Column::ProjectId.eq(project_id));
        }
        if let Some(member_id) = member_id {
            query = query.filter(assignment::Column::MemberId.eq(member_id));
        }
        Ok(query.into_tuple::<i64>().all(&self.db).await?)
    }
}

// ============================================================================
// ScheduleStore implementation
// ============================================================================

#[async_trait]
impl ScheduleStore for ExternalDbScheduleStore {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::ExternalDb
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        // Execute a simple query to verify connectivity
        customer::Entity::find()
            .select_only()
            .column_as(Expr::cust("1"), "health")
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Model conversions
// ============================================================================

fn day_model_to_data(model: day_assignment::Model) -> DayAssignmentData {
    DayAssignmentData {
        id: model.id,
        assignment_id: model.assignment_id,
        date: model.date,
        comment: model.comment,
    }
}

fn group_model_to_data(model: assignment_group::Model) -> AssignmentGroupData {
    AssignmentGroupData {
        id: model.id,
        assignment_id: model.assignment_id,
        start_date: model.start_date,
        end_date: model.end_date,
        priority: model.priority.parse().unwrap_or_default(),
        comment: model.comment,
    }
}

fn customer_model_to_data(model: customer::Model) -> CustomerData {
    CustomerData {
        id: model.id,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn project_model_to_data(model: project::Model) -> ProjectData {
    ProjectData {
        id: model.id,
        customer_id: model.customer_id,
        name: model.name,
        color: model.color,
        archived: model.archived,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn member_model_to_data(model: team_member::Model) -> TeamMemberData {
    TeamMemberData {
        id: model.id,
        name: model.name,
        email: model.email,
        work_schedule: model.work_schedule,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn assignment_model_to_data(model: assignment::Model) -> AssignmentData {
    AssignmentData {
        id: model.id,
        project_id: model.project_id,
        member_id: model.member_id,
    }
}

fn milestone_model_to_data(model: milestone::Model) -> MilestoneData {
    MilestoneData {
        id: model.id,
        project_id: model.project_id,
        date: model.date,
        name: model.name,
    }
}

fn day_off_model_to_data(model: day_off::Model) -> DayOffData {
    DayOffData {
        id: model.id,
        member_id: model.member_id,
        date: model.date,
    }
}

// ============================================================================
// Shared write helpers
// ============================================================================

/// Apply one timeline change on a connection or transaction
///
/// Deletes run before inserts so a change can rewrite a day or shrink a
/// group range in place.
async fn apply_change_on<C: ConnectionTrait>(
    conn: &C,
    change: &TimelineChange,
) -> anyhow::Result<AppliedTimelineChange> {
    let mut applied = AppliedTimelineChange::default();

    if !change.delete_group_ids.is_empty() {
        assignment_group::Entity::delete_many()
            .filter(assignment_group::Column::Id.is_in(change.delete_group_ids.clone()))
            .exec(conn)
            .await?;
    }

    if !change.delete_days.is_empty() {
        day_assignment::Entity::delete_many()
            .filter(day_assignment::Column::AssignmentId.eq(change.assignment_id))
            .filter(day_assignment::Column::Date.is_in(change.delete_days.clone()))
            .exec(conn)
            .await?;
    }

    for day in &change.insert_days {
        let model = day_assignment::ActiveModel {
            id: NotSet,
            assignment_id: Set(change.assignment_id),
            date: Set(day.date),
            comment: Set(day.comment.clone()),
        }
        .insert(conn)
        .await?;
        applied.created_days.push(day_model_to_data(model));
    }

    for group in &change.upsert_groups {
        let model = match group.id {
            Some(id) => assignment_group::ActiveModel {
                id: Set(id),
                assignment_id: Set(change.assignment_id),
                start_date: Set(group.start_date),
                end_date: Set(group.end_date),
                priority: Set(group.priority.to_string()),
                comment: Set(group.comment.clone()),
            }
            .update(conn)
            .await?,
            None => assignment_group::ActiveModel {
                id: NotSet,
                assignment_id: Set(change.assignment_id),
                start_date: Set(group.start_date),
                end_date: Set(group.end_date),
                priority: Set(group.priority.to_string()),
                comment: Set(group.comment.clone()),
            }
            .insert(conn)
            .await?,
        };
        applied.groups.push(group_model_to_data(model));
    }

    Ok(applied)
}

/// Delete an assignment with its day assignments and groups
async fn delete_assignment_cascade_on<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
) -> anyhow::Result<()> {
    day_assignment::Entity::delete_many()
        .filter(day_assignment::Column::AssignmentId.eq(assignment_id))
        .exec(conn)
        .await?;
    assignment_group::Entity::delete_many()
        .filter(assignment_group::Column::AssignmentId.eq(assignment_id))
        .exec(conn)
        .await?;
    assignment::Entity::delete_by_id(assignment_id).exec(conn).await?;
    Ok(())
}

/// Delete a project with its assignments and milestones
async fn delete_project_cascade_on<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> anyhow::Result<()> {
    let assignment_ids: Vec<i64> = assignment::Entity::find()
        .select_only()
        .column(assignment::Column::Id)
        .filter(assignment::Column::ProjectId.eq(project_id))
        .into_tuple::<i64>()
        .all(conn)
        .await?;
    for assignment_id in assignment_ids {
        delete_assignment_cascade_on(conn, assignment_id).await?;
    }
    milestone::Entity::delete_many()
        .filter(milestone::Column::ProjectId.eq(project_id))
        .exec(conn)
        .await?;
    project::Entity::delete_by_id(project_id).exec(conn).await?;
    Ok(())
}

// ============================================================================
// TimelineStore implementation
// ============================================================================

#[async_trait]
impl TimelineStore for ExternalDbScheduleStore {
    async fn day_get_by_id(&self, id: i64) -> anyhow::Result<Option<DayAssignmentData>> {
        let model = day_assignment::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(day_model_to_data))
    }

    async fn day_find(
        &self,
        assignment_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Option<DayAssignmentData>> {
        let model = day_assignment::Entity::find()
            .filter(day_assignment::Column::AssignmentId.eq(assignment_id))
            .filter(day_assignment::Column::Date.eq(date))
            .one(&self.db)
            .await?;
        Ok(model.map(day_model_to_data))
    }

    async fn days_find_in_range(
        &self,
        filter: &TimelineQueryFilter,
    ) -> anyhow::Result<Vec<DayAssignmentData>> {
        let mut query = day_assignment::Entity::find()
            .filter(day_assignment::Column::Date.between(filter.start_date, filter.end_date));
        if filter.project_id.is_some() || filter.member_id.is_some() {
            let ids = self
                .assignment_ids(filter.project_id, filter.member_id)
                .await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(day_assignment::Column::AssignmentId.is_in(ids));
        }
        let models = query
            .order_by_asc(day_assignment::Column::AssignmentId)
            .order_by_asc(day_assignment::Column::Date)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(day_model_to_data).collect())
    }

    async fn group_get_by_id(&self, id: i64) -> anyhow::Result<Option<AssignmentGroupData>> {
        let model = assignment_group::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(group_model_to_data))
    }

    async fn groups_find_in_range(
        &self,
        filter: &TimelineQueryFilter,
    ) -> anyhow::Result<Vec<AssignmentGroupData>> {
        let mut query = assignment_group::Entity::find()
            .filter(assignment_group::Column::StartDate.lte(filter.end_date))
            .filter(assignment_group::Column::EndDate.gte(filter.start_date));
        if filter.project_id.is_some() || filter.member_id.is_some() {
            let ids = self
                .assignment_ids(filter.project_id, filter.member_id)
                .await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(assignment_group::Column::AssignmentId.is_in(ids));
        }
        let models = query
            .order_by_asc(assignment_group::Column::AssignmentId)
            .order_by_asc(assignment_group::Column::StartDate)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(group_model_to_data).collect())
    }

    async fn group_update_metadata(
        &self,
        id: i64,
        priority: Priority,
        comment: Option<String>,
    ) -> anyhow::Result<Option<AssignmentGroupData>> {
        let Some(model) = assignment_group::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active: assignment_group::ActiveModel = model.into();
        active.priority = Set(priority.to_string());
        active.comment = Set(comment);
        let updated = active.update(&self.db).await?;
        Ok(Some(group_model_to_data(updated)))
    }

    async fn timeline_snapshot(&self, assignment_id: i64) -> anyhow::Result<TimelineSnapshot> {
        let days: Vec<NaiveDate> = day_assignment::Entity::find()
            .select_only()
            .column(day_assignment::Column::Date)
            .filter(day_assignment::Column::AssignmentId.eq(assignment_id))
            .into_tuple::<NaiveDate>()
            .all(&self.db)
            .await?;
        let groups = assignment_group::Entity::find()
            .filter(assignment_group::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(assignment_group::Column::StartDate)
            .all(&self.db)
            .await?;
        Ok(TimelineSnapshot {
            days: days.into_iter().collect(),
            groups: groups.into_iter().map(group_model_to_data).collect(),
        })
    }

    async fn apply_change(
        &self,
        change: &TimelineChange,
    ) -> anyhow::Result<AppliedTimelineChange> {
        if change.is_empty() {
            return Ok(AppliedTimelineChange::default());
        }
        let tx = self.db.begin().await?;
        let applied = apply_change_on(&tx, change).await?;
        tx.commit().await?;
        Ok(applied)
    }

    async fn apply_changes(
        &self,
        changes: &[TimelineChange],
    ) -> anyhow::Result<Vec<AppliedTimelineChange>> {
        let tx = self.db.begin().await?;
        let mut applied = Vec::with_capacity(changes.len());
        for change in changes {
            applied.push(apply_change_on(&tx, change).await?);
        }
        tx.commit().await?;
        Ok(applied)
    }

    async fn member_days_on(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<DayAssignmentData>> {
        let ids = self.assignment_ids(None, Some(member_id)).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = day_assignment::Entity::find()
            .filter(day_assignment::Column::AssignmentId.is_in(ids))
            .filter(day_assignment::Column::Date.eq(date))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(day_model_to_data).collect())
    }
}

// ============================================================================
// RosterStore implementation
// ============================================================================

#[async_trait]
impl RosterStore for ExternalDbScheduleStore {
    async fn customer_create(&self, name: &str) -> anyhow::Result<CustomerData> {
        let now = chrono::Utc::now().naive_utc();
        let model = customer::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(customer_model_to_data(model))
    }

    async fn customer_find_all(&self) -> anyhow::Result<Vec<CustomerData>> {
        let models = customer::Entity::find()
            .order_by_asc(customer::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(customer_model_to_data).collect())
    }

    async fn customer_get_by_id(&self, id: i64) -> anyhow::Result<Option<CustomerData>> {
        let model = customer::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(customer_model_to_data))
    }

    async fn customer_delete(&self, id: i64) -> anyhow::Result<bool> {
        let tx = self.db.begin().await?;
        if customer::Entity::find_by_id(id).one(&tx).await?.is_none() {
            return Ok(false);
        }
        let project_ids: Vec<i64> = project::Entity::find()
            .select_only()
            .column(project::Column::Id)
            .filter(project::Column::CustomerId.eq(id))
            .into_tuple::<i64>()
            .all(&tx)
            .await?;
        for project_id in project_ids {
            delete_project_cascade_on(&tx, project_id).await?;
        }
        customer::Entity::delete_by_id(id).exec(&tx).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn project_create(
        &self,
        customer_id: i64,
        name: &str,
        color: Option<String>,
    ) -> anyhow::Result<ProjectData> {
        let now = chrono::Utc::now().naive_utc();
        let model = project::ActiveModel {
            id: NotSet,
            customer_id: Set(customer_id),
            name: Set(name.to_string()),
            color: Set(color),
            archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(project_model_to_data(model))
    }

    async fn project_find_all(&self) -> anyhow::Result<Vec<ProjectData>> {
        let models = project::Entity::find()
            .order_by_asc(project::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(project_model_to_data).collect())
    }

    async fn project_get_by_id(&self, id: i64) -> anyhow::Result<Option<ProjectData>> {
        let model = project::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(project_model_to_data))
    }

    async fn project_update(
        &self,
        id: i64,
        name: Option<String>,
        color: Option<String>,
        archived: Option<bool>,
    ) -> anyhow::Result<Option<ProjectData>> {
        let Some(model) = project::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active: project::ActiveModel = model.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(color) = color {
            active.color = Set(Some(color));
        }
        if let Some(archived) = archived {
            active.archived = Set(archived);
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let updated = active.update(&self.db).await?;
        Ok(Some(project_model_to_data(updated)))
    }

    async fn project_delete(&self, id: i64) -> anyhow::Result<bool> {
        let tx = self.db.begin().await?;
        if project::Entity::find_by_id(id).one(&tx).await?.is_none() {
            return Ok(false);
        }
        delete_project_cascade_on(&tx, id).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn member_create(
        &self,
        name: &str,
        email: Option<String>,
        work_schedule: &str,
    ) -> anyhow::Result<TeamMemberData> {
        let now = chrono::Utc::now().naive_utc();
        let model = team_member::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            email: Set(email),
            work_schedule: Set(work_schedule.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(member_model_to_data(model))
    }

    async fn member_find_all(&self) -> anyhow::Result<Vec<TeamMemberData>> {
        let models = team_member::Entity::find()
            .order_by_asc(team_member::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(member_model_to_data).collect())
    }

    async fn member_get_by_id(&self, id: i64) -> anyhow::Result<Option<TeamMemberData>> {
        let model = team_member::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(member_model_to_data))
    }

    async fn member_update(
        &self,
        id: i64,
        name: Option<String>,
        email: Option<String>,
        work_schedule: Option<String>,
    ) -> anyhow::Result<Option<TeamMemberData>> {
        let Some(model) = team_member::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active: team_member::ActiveModel = model.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            active.email = Set(Some(email));
        }
        if let Some(work_schedule) = work_schedule {
            active.work_schedule = Set(work_schedule);
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let updated = active.update(&self.db).await?;
        Ok(Some(member_model_to_data(updated)))
    }

    async fn member_delete(&self, id: i64) -> anyhow::Result<bool> {
        let tx = self.db.begin().await?;
        if team_member::Entity::find_by_id(id).one(&tx).await?.is_none() {
            return Ok(false);
        }
        let assignment_ids: Vec<i64> = assignment::Entity::find()
            .select_only()
            .column(assignment::Column::Id)
            .filter(assignment::Column::MemberId.eq(id))
            .into_tuple::<i64>()
            .all(&tx)
            .await?;
        for assignment_id in assignment_ids {
            delete_assignment_cascade_on(&tx, assignment_id).await?;
        }
        day_off::Entity::delete_many()
            .filter(day_off::Column::MemberId.eq(id))
            .exec(&tx)
            .await?;
        team_member::Entity::delete_by_id(id).exec(&tx).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn assignment_create(
        &self,
        project_id: i64,
        member_id: i64,
    ) -> anyhow::Result<AssignmentData> {
        let model = assignment::ActiveModel {
            id: NotSet,
            project_id: Set(project_id),
            member_id: Set(member_id),
        }
        .insert(&self.db)
        .await?;
        Ok(assignment_model_to_data(model))
    }

    async fn assignment_get_by_id(&self, id: i64) -> anyhow::Result<Option<AssignmentData>> {
        let model = assignment::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(assignment_model_to_data))
    }

    async fn assignment_find(
        &self,
        project_id: i64,
        member_id: i64,
    ) -> anyhow::Result<Option<AssignmentData>> {
        let model = assignment::Entity::find()
            .filter(assignment::Column::ProjectId.eq(project_id))
            .filter(assignment::Column::MemberId.eq(member_id))
            .one(&self.db)
            .await?;
        Ok(model.map(assignment_model_to_data))
    }

    async fn assignments_find(
        &self,
        project_id: Option<i64>,
        member_id: Option<i64>,
    ) -> anyhow::Result<Vec<AssignmentData>> {
        let mut query = assignment::Entity::find();
        if let Some(project_id) = project_id {
            query = query.filter(assignment::Column::ProjectId.eq(project_id));
        }
        if let Some(member_id) = member_id {
            query = query.filter(assignment::Column::MemberId.eq(member_id));
        }
        let models = query
            .order_by_asc(assignment::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(assignment_model_to_data).collect())
    }

    async fn assignment_delete(&self, id: i64) -> anyhow::Result<bool> {
        let tx = self.db.begin().await?;
        if assignment::Entity::find_by_id(id).one(&tx).await?.is_none() {
            return Ok(false);
        }
        delete_assignment_cascade_on(&tx, id).await?;
        tx.commit().await?;
        Ok(true)
    }
}

// ============================================================================
// CalendarStore implementation
// ============================================================================

#[async_trait]
impl CalendarStore for ExternalDbScheduleStore {
    async fn milestone_create(
        &self,
        project_id: i64,
        date: NaiveDate,
        name: Option<String>,
    ) -> anyhow::Result<MilestoneData> {
        let model = milestone::ActiveModel {
            id: NotSet,
            project_id: Set(project_id),
            date: Set(date),
            name: Set(name),
        }
        .insert(&self.db)
        .await?;
        Ok(milestone_model_to_data(model))
    }

    async fn milestone_get_by_id(&self, id: i64) -> anyhow::Result<Option<MilestoneData>> {
        let model = milestone::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(milestone_model_to_data))
    }

    async fn milestone_update(
        &self,
        id: i64,
        date: Option<NaiveDate>,
        name: Option<String>,
    ) -> anyhow::Result<Option<MilestoneData>> {
        let Some(model) = milestone::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active: milestone::ActiveModel = model.into();
        if let Some(date) = date {
            active.date = Set(date);
        }
        if let Some(name) = name {
            active.name = Set(Some(name));
        }
        let updated = active.update(&self.db).await?;
        Ok(Some(milestone_model_to_data(updated)))
    }

    async fn milestone_delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = milestone::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn milestones_find_in_range(
        &self,
        project_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> anyhow::Result<Vec<MilestoneData>> {
        let models = milestone::Entity::find()
            .filter(milestone::Column::ProjectId.eq(project_id))
            .filter(milestone::Column::Date.between(start_date, end_date))
            .order_by_asc(milestone::Column::Date)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(milestone_model_to_data).collect())
    }

    async fn day_off_create(
        &self,
        member_id: i64,
        date: NaiveDate,
        changes: &[TimelineChange],
    ) -> anyhow::Result<DayOffData> {
        let tx = self.db.begin().await?;
        let model = day_off::ActiveModel {
            id: NotSet,
            member_id: Set(member_id),
            date: Set(date),
        }
        .insert(&tx)
        .await?;
        for change in changes {
            apply_change_on(&tx, change).await?;
        }
        tx.commit().await?;
        Ok(day_off_model_to_data(model))
    }

    async fn day_off_get_by_id(&self, id: i64) -> anyhow::Result<Option<DayOffData>> {
        let model = day_off::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(day_off_model_to_data))
    }

    async fn day_off_find(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> anyhow::Result<Option<DayOffData>> {
        let model = day_off::Entity::find()
            .filter(day_off::Column::MemberId.eq(member_id))
            .filter(day_off::Column::Date.eq(date))
            .one(&self.db)
            .await?;
        Ok(model.map(day_off_model_to_data))
    }

    async fn day_off_delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = day_off::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn day_offs_find_in_range(
        &self,
        member_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> anyhow::Result<Vec<DayOffData>> {
        let models = day_off::Entity::find()
            .filter(day_off::Column::MemberId.eq(member_id))
            .filter(day_off::Column::Date.between(start_date, end_date))
            .order_by_asc(day_off::Column::Date)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(day_off_model_to_data).collect())
    }
}
