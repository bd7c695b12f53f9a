//! Domain entities - core business objects

mod attendance;
mod birthday;
mod member;
mod role;

pub use attendance::{AttendanceDirection, AttendanceRecord};
pub use birthday::BirthdayEntry;
pub use member::Member;
pub use role::Role;
