//! Ports implemented by the infrastructure crates

mod clock;
mod platform;
mod repositories;

pub use clock::{Clock, FixedClock, SystemClock};
pub use platform::{
    NewChannel, PlatformClient, PlatformError, PlatformMember, PlatformResult, PlatformRole,
};
pub use repositories::{
    BirthdayRepository, MemberRepository, RepoResult, RoleRepository, SettingRepository,
};
