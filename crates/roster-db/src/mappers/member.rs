//! Member entity <-> model mapper

use roster_core::entities::Member;
use roster_core::value_objects::{MemberId, RoleId};

use crate::models::MemberModel;

/// Convert a member row plus its role rows to a Member entity
pub fn member_with_roles(model: MemberModel, role_ids: Vec<String>) -> Member {
    Member {
        id: MemberId::new(model.id),
        display_name: model.display_name,
        role_ids: role_ids.into_iter().map(RoleId::new).collect(),
        is_admin: model.is_admin,
        updated_at: model.updated_at,
    }
}

/// Member entity reference as values for database writes
pub struct MemberInsert<'a> {
    pub id: &'a str,
    pub display_name: Option<&'a str>,
    pub is_admin: bool,
    pub role_ids: Vec<&'a str>,
}

impl<'a> MemberInsert<'a> {
    pub fn new(member: &'a Member) -> Self {
        Self {
            id: member.id.as_str(),
            display_name: member.display_name.as_deref(),
            is_admin: member.is_admin,
            role_ids: member.role_ids.iter().map(RoleId::as_str).collect(),
        }
    }
}
