//! Birthday entry entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::{BirthdayDate, MemberId};

/// A registered birthday, one per identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdayEntry {
    pub user_id: MemberId,
    pub date: BirthdayDate,
    /// Admin who issued the registration command
    pub registered_by: Option<MemberId>,
    pub updated_at: DateTime<Utc>,
}

impl BirthdayEntry {
    pub fn new(user_id: MemberId, date: BirthdayDate, registered_by: Option<MemberId>) -> Self {
        Self {
            user_id,
            date,
            registered_by,
            updated_at: Utc::now(),
        }
    }
}
