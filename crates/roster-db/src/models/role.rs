//! Role database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for roles table
#[derive(Debug, Clone, FromRow)]
pub struct RoleModel {
    pub id: String,
    pub name: String,
    pub permissions: i64,
    pub updated_at: DateTime<Utc>,
}
