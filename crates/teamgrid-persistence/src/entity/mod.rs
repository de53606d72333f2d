//! `SeaORM` entity definitions for the Teamgrid schema

pub mod prelude;

pub mod assignment;
pub mod assignment_group;
pub mod customer;
pub mod day_assignment;
pub mod day_off;
pub mod milestone;
pub mod project;
pub mod team_member;
