//! Entity to model mappers
//!
//! Conversions between domain entities (roster-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database writes

mod birthday;
mod member;
mod role;

pub use birthday::BirthdayInsert;
pub use member::{member_with_roles, MemberInsert};
pub use role::RoleInsert;
