//! Business logic services
//!
//! Services borrow the [`ServiceContext`] for the duration of one unit of
//! work (a request or an event). Process-scoped state lives in the context.

pub mod attendance;
pub mod auto_role;
pub mod birthday;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod mirror;
pub mod permission;
pub mod registry;
pub mod settings;

// Re-export all services for convenience
pub use attendance::AttendanceLog;
pub use auto_role::AutoRoleService;
pub use birthday::{BirthdayService, SweepReport};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dashboard::DashboardService;
pub use error::{ServiceError, ServiceResult};
pub use mirror::MembershipMirror;
pub use permission::PermissionResolver;
pub use registry::RoleRegistry;
pub use settings::{BirthdaySettings, SettingsStore};
