//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use roster_core::entities::{AttendanceRecord, BirthdayEntry, Member, Role};

use super::responses::{
    AttendanceRecordResponse, BirthdayEntryResponse, BoardEntryResponse, MemberResponse,
    RoleResponse,
};
use crate::services::attendance::BoardEntry;

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.to_string(),
            name: role.name.clone(),
            permissions: role.permissions.to_i64().to_string(),
            capabilities: role.permissions.capabilities(),
        }
    }
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.to_string(),
            display_name: member.display_name.clone(),
            label: member.label().to_string(),
            role_ids: member.role_ids.iter().map(ToString::to_string).collect(),
            is_admin: member.is_admin,
            updated_at: member.updated_at,
        }
    }
}

impl From<&AttendanceRecord> for AttendanceRecordResponse {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            direction: record.direction,
            at: record.at,
            display_name: record.display_name.clone(),
        }
    }
}

impl From<&BoardEntry> for BoardEntryResponse {
    fn from(entry: &BoardEntry) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            direction: entry.record.direction,
            at: entry.record.at,
            display_name: entry.record.display_name.clone(),
        }
    }
}

impl From<&BirthdayEntry> for BirthdayEntryResponse {
    fn from(entry: &BirthdayEntry) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            date: entry.date.to_string(),
            registered_by: entry.registered_by.as_ref().map(ToString::to_string),
            updated_at: entry.updated_at,
        }
    }
}
