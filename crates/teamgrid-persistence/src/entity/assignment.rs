//! `SeaORM` Entity for assignment table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: i64,
    pub member_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::team_member::Entity",
        from = "Column::MemberId",
        to = "super::team_member::Column::Id"
    )]
    TeamMember,
    #[sea_orm(has_many = "super::day_assignment::Entity")]
    DayAssignment,
    #[sea_orm(has_many = "super::assignment_group::Entity")]
    AssignmentGroup,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMember.def()
    }
}

impl Related<super::day_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DayAssignment.def()
    }
}

impl Related<super::assignment_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
