//! # roster-service
//!
//! Application layer: the membership mirror, role registry, permission
//! resolver, settings store, attendance log, and birthday automation, plus
//! the DTOs the web surface renders.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use services::{
    AttendanceLog, AutoRoleService, BirthdayService, BirthdaySettings, DashboardService,
    MembershipMirror, PermissionResolver, RoleRegistry, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SettingsStore, SweepReport,
};
