//! Database models - SQLx-compatible structs for SQLite tables

mod birthday;
mod member;
mod role;
mod setting;

pub use birthday::BirthdayModel;
pub use member::{MemberModel, MemberRoleModel};
pub use role::RoleModel;
pub use setting::SettingModel;
