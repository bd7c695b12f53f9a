//! # roster-core
//!
//! Domain layer containing entities, value objects, platform events, and the
//! ports (repository, platform, clock) the rest of the workspace implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{AttendanceDirection, AttendanceRecord, BirthdayEntry, Member, Role};
pub use error::DomainError;
pub use events::{BirthdayCommand, PlatformEvent};
pub use traits::{
    BirthdayRepository, Clock, FixedClock, MemberRepository, NewChannel, PlatformClient,
    PlatformError, PlatformMember, PlatformResult, PlatformRole, RepoResult, RoleRepository,
    SettingRepository, SystemClock,
};
pub use value_objects::{
    Access, BirthdayDate, Capability, ChannelId, MatchMode, MemberId, Permissions, RoleId,
};
