//! Role entity <-> model mapper

use roster_core::entities::Role;
use roster_core::value_objects::{Permissions, RoleId};

use crate::models::RoleModel;

/// Convert RoleModel to Role entity
impl From<RoleModel> for Role {
    fn from(model: RoleModel) -> Self {
        Role {
            id: RoleId::new(model.id),
            name: model.name,
            permissions: Permissions::from_i64(model.permissions),
            updated_at: model.updated_at,
        }
    }
}

/// Role entity reference as values for database writes
pub struct RoleInsert<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub permissions: i64,
}

impl<'a> RoleInsert<'a> {
    pub fn new(role: &'a Role) -> Self {
        Self {
            id: role.id.as_str(),
            name: &role.name,
            permissions: role.permissions.to_i64(),
        }
    }
}
