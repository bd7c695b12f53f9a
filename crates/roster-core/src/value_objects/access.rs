//! Resolved access flags for one identity

use serde::{Deserialize, Serialize};

/// What an identity may do, decided fresh for every request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub is_admin: bool,
    pub can_manage_access: bool,
    pub can_login: bool,
}

impl Access {
    /// Deny everything
    pub const fn denied() -> Self {
        Self {
            is_admin: false,
            can_manage_access: false,
            can_login: false,
        }
    }

    /// Admin with login, as granted by the fixed override roles
    pub const fn administrator(can_manage_access: bool) -> Self {
        Self {
            is_admin: true,
            can_manage_access,
            can_login: true,
        }
    }

    /// Whether a session may be opened or kept for this identity
    #[inline]
    pub fn may_enter(&self) -> bool {
        self.can_login || self.can_manage_access
    }
}
