//! Value objects - immutable types that represent domain concepts

mod access;
mod birthday_date;
mod ids;
mod permissions;

pub use access::Access;
pub use birthday_date::{BirthdayDate, MatchMode};
pub use ids::{ChannelId, MemberId, RoleId};
pub use permissions::{Capability, Permissions};
