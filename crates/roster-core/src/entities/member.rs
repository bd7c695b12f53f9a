//! Member entity - the mirrored view of one guild member

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::value_objects::{MemberId, RoleId};

/// Mirrored guild member
///
/// `is_admin` is a snapshot refreshed on sync and on login. Gating always
/// re-resolves from roles and never trusts this flag alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub display_name: Option<String>,
    pub role_ids: BTreeSet<RoleId>,
    pub is_admin: bool,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new Member; duplicate role ids collapse
    pub fn new(
        id: MemberId,
        display_name: Option<String>,
        role_ids: impl IntoIterator<Item = RoleId>,
    ) -> Self {
        Self {
            id,
            display_name,
            role_ids: role_ids.into_iter().collect(),
            is_admin: false,
            updated_at: Utc::now(),
        }
    }

    /// Display name, falling back to the raw id
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }

    #[inline]
    pub fn has_role(&self, role_id: &RoleId) -> bool {
        self.role_ids.contains(role_id)
    }

    /// Check if member holds at least one of the given roles
    pub fn has_any_role<'a>(&self, candidates: impl IntoIterator<Item = &'a RoleId>) -> bool {
        candidates.into_iter().any(|r| self.role_ids.contains(r))
    }

    /// Replace the role set (events always carry the full set)
    pub fn set_roles(&mut self, role_ids: impl IntoIterator<Item = RoleId>) {
        self.role_ids = role_ids.into_iter().collect();
        self.updated_at = Utc::now();
    }

    #[inline]
    pub fn role_count(&self) -> usize {
        self.role_ids.len()
    }
}
