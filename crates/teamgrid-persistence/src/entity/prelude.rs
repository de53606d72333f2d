//! `SeaORM` entity prelude

pub use super::assignment::Entity as Assignment;
pub use super::assignment_group::Entity as AssignmentGroup;
pub use super::customer::Entity as Customer;
pub use super::day_assignment::Entity as DayAssignment;
pub use super::day_off::Entity as DayOff;
pub use super::milestone::Entity as Milestone;
pub use super::project::Entity as Project;
pub use super::team_member::Entity as TeamMember;
