//! Data transfer objects for the dashboard
//!
//! This module provides:
//! - Request DTOs with validation for the admin forms
//! - Response DTOs (view models) for the pages
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{UpdateAutoRolesRequest, UpdateBirthdaySettingsRequest, UpdateLoginRolesRequest};

pub use responses::{
    AnnouncementsView, ApiResponse, AttendanceRecordResponse, AttendanceView,
    BirthdayEntryResponse, BirthdaySettingsView, BoardEntryResponse, HealthChecks,
    HealthResponse, MemberDetailResponse, MemberResponse, MembersView, ReadinessResponse,
    RoleListView, RoleResponse, StatusView, TimelineResponse, ViewerResponse,
};
