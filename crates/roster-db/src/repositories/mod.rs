//! Repository implementations
//!
//! SQLite implementations of the repository traits defined in roster-core.
//! Each repository handles database operations for a specific domain entity.

mod birthday;
mod error;
mod member;
mod role;
mod setting;

pub use birthday::SqliteBirthdayRepository;
pub use member::SqliteMemberRepository;
pub use role::SqliteRoleRepository;
pub use setting::SqliteSettingRepository;
