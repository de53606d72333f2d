//! Roster persistence trait
//!
//! Defines the interface for customer, project, team member, and assignment
//! storage operations.

use async_trait::async_trait;

use crate::model::{AssignmentData, CustomerData, ProjectData, TeamMemberData};

/// Roster storage operations
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Create a customer
    async fn customer_create(&self, name: &str) -> anyhow::Result<CustomerData>;

    /// Find all customers
    async fn customer_find_all(&self) -> anyhow::Result<Vec<CustomerData>>;

    /// Get a customer by id
    async fn customer_get_by_id(&self, id: i64) -> anyhow::Result<Option<CustomerData>>;

    /// Delete a customer, cascading its projects
    async fn customer_delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Create a project under a customer
    async fn project_create(
        &self,
        customer_id: i64,
        name: &str,
        color: Option<String>,
    ) -> anyhow::Result<ProjectData>;

    /// Find all projects
    async fn project_find_all(&self) -> anyhow::Result<Vec<ProjectData>>;

    /// Get a project by id
    async fn project_get_by_id(&self, id: i64) -> anyhow::Result<Option<ProjectData>>;

    /// Update a project; absent fields are left unchanged
    async fn project_update(
        &self,
        id: i64,
        name: Option<String>,
        color: Option<String>,
        archived: Option<bool>,
    ) -> anyhow::Result<Option<ProjectData>>;

    /// Delete a project, cascading its assignments and milestones
    async fn project_delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Create a team member
    async fn member_create(
        &self,
        name: &str,
        email: Option<String>,
        work_schedule: &str,
    ) -> anyhow::Result<TeamMemberData>;

    /// Find all team members
    async fn member_find_all(&self) -> anyhow::Result<Vec<TeamMemberData>>;

    /// Get a team member by id
    async fn member_get_by_id(&self, id: i64) -> anyhow::Result<Option<TeamMemberData>>;

    /// Update a team member; absent fields are left unchanged
    async fn member_update(
        &self,
        id: i64,
        name: Option<String>,
        email: Option<String>,
        work_schedule: Option<String>,
    ) -> anyhow::Result<Option<TeamMemberData>>;

    /// Delete a team member, cascading assignments and day offs
    async fn member_delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Create an assignment linking a member to a project
    async fn assignment_create(
        &self,
        project_id: i64,
        member_id: i64,
    ) -> anyhow::Result<AssignmentData>;

    /// Get an assignment by id
    async fn assignment_get_by_id(&self, id: i64) -> anyhow::Result<Option<AssignmentData>>;

    /// Get the assignment of one member on one project
    async fn assignment_find(
        &self,
        project_id: i64,
        member_id: i64,
    ) -> anyhow::Result<Option<AssignmentData>>;

    /// Find assignments, optionally narrowed to one project or one member
    async fn assignments_find(
        &self,
        project_id: Option<i64>,
        member_id: Option<i64>,
    ) -> anyhow::Result<Vec<AssignmentData>>;

    /// Delete an assignment, cascading its day assignments and groups
    async fn assignment_delete(&self, id: i64) -> anyhow::Result<bool>;
}
