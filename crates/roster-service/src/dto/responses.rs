//! Response DTOs (view models) for the dashboard pages
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Platform ids are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use roster_core::entities::AttendanceDirection;
use roster_core::value_objects::{Access, Capability};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Members and roles
// ============================================================================

/// Role response
#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    /// Raw permission bitmask as a string
    pub permissions: String,
    pub capabilities: Vec<Capability>,
}

/// Mirrored member response
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub display_name: Option<String>,
    /// Display name or id
    pub label: String,
    pub role_ids: Vec<String>,
    /// Last stored admin snapshot
    pub is_admin: bool,
    pub updated_at: DateTime<Utc>,
}

/// Members page
#[derive(Debug, Clone, Serialize)]
pub struct MembersView {
    pub count: usize,
    pub members: Vec<MemberResponse>,
}

/// Member detail page
#[derive(Debug, Clone, Serialize)]
pub struct MemberDetailResponse {
    pub member: MemberResponse,
    /// Held roles known to the registry
    pub roles: Vec<RoleResponse>,
    /// Held role ids the registry does not know
    pub unknown_role_ids: Vec<String>,
    pub access: Access,
    pub birthday: Option<String>,
    pub attendance: Vec<AttendanceRecordResponse>,
}

// ============================================================================
// Viewer
// ============================================================================

/// The logged-in identity and what it may do
#[derive(Debug, Clone, Serialize)]
pub struct ViewerResponse {
    pub id: String,
    pub display_name: String,
    pub access: Access,
}

/// Announcements page
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementsView {
    pub viewer: ViewerResponse,
}

// ============================================================================
// Attendance
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecordResponse {
    pub direction: AttendanceDirection,
    pub at: DateTime<Utc>,
    pub display_name: String,
}

/// Latest record of one identity
#[derive(Debug, Clone, Serialize)]
pub struct BoardEntryResponse {
    pub user_id: String,
    pub direction: AttendanceDirection,
    pub at: DateTime<Utc>,
    pub display_name: String,
}

/// Attendance page
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceView {
    pub viewer: ViewerResponse,
    pub board: Vec<BoardEntryResponse>,
    pub history: Vec<AttendanceRecordResponse>,
}

/// One identity's full timeline
#[derive(Debug, Clone, Serialize)]
pub struct TimelineResponse {
    pub user_id: String,
    pub records: Vec<AttendanceRecordResponse>,
}

/// Status page
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub timelines: Vec<TimelineResponse>,
}

// ============================================================================
// Settings pages
// ============================================================================

/// Auto-role page and login-roles page
#[derive(Debug, Clone, Serialize)]
pub struct RoleListView {
    /// Configured role ids, including ones no longer in the registry
    pub role_ids: Vec<String>,
    /// Every known role, for the picker
    pub roles: Vec<RoleResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BirthdayEntryResponse {
    pub user_id: String,
    pub date: String,
    pub registered_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Birthday settings page
#[derive(Debug, Clone, Serialize)]
pub struct BirthdaySettingsView {
    pub category_id: Option<String>,
    pub channel_format: String,
    pub role_id: Option<String>,
    pub roles: Vec<RoleResponse>,
    pub entries: Vec<BirthdayEntryResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    /// Informational; an offline bot does not make the web surface unready
    pub bot: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, bot_online: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                bot: if bot_online { "online" } else { "offline" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
