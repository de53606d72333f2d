//! `SeaORM` Entity for team_member table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(nullable)]
    pub email: Option<String>,
    /// JSON array of seven booleans, Monday through Sunday
    #[sea_orm(column_type = "Text")]
    pub work_schedule: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignment,
    #[sea_orm(has_many = "super::day_off::Entity")]
    DayOff,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::day_off::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DayOff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
