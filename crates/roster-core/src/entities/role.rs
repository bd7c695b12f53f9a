//! Role entity - mirrored platform role with its permission bitmask

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::{Capability, Permissions, RoleId};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub permissions: Permissions,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Create a new Role
    pub fn new(id: RoleId, name: String, permissions: Permissions) -> Self {
        Self {
            id,
            name,
            permissions,
            updated_at: Utc::now(),
        }
    }

    /// Check if this role grants a capability
    #[inline]
    pub fn grants(&self, capability: Capability) -> bool {
        self.permissions.grants(capability)
    }

    #[inline]
    pub fn is_administrator(&self) -> bool {
        self.grants(Capability::Administrator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_creation() {
        let role = Role::new(
            RoleId::new("1"),
            "Moderator".to_string(),
            Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS,
        );
        assert_eq!(role.name, "Moderator");
        assert!(role.grants(Capability::KickMembers));
        assert!(!role.is_administrator());
    }

    #[test]
    fn test_administrator_role() {
        let role = Role::new(RoleId::new("1"), "Admin".to_string(), Permissions::from_i64(8));
        assert!(role.is_administrator());
    }
}
