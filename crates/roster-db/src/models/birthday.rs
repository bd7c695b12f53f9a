//! Birthday database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for birthdays table
#[derive(Debug, Clone, FromRow)]
pub struct BirthdayModel {
    pub user_id: String,
    pub date: String,
    pub registered_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}
