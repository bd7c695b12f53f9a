//! Member database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for members table
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub id: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
    pub updated_at: DateTime<Utc>,
}

/// Database model for member_roles table
#[derive(Debug, Clone, FromRow)]
pub struct MemberRoleModel {
    pub member_id: String,
    pub role_id: String,
}
