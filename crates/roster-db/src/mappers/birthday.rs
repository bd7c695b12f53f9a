//! BirthdayEntry entity <-> model mapper

use roster_core::entities::BirthdayEntry;
use roster_core::error::DomainError;
use roster_core::value_objects::{BirthdayDate, MemberId};

use crate::models::BirthdayModel;

/// Rows are validated on the way in, so a bad date here means the file was
/// edited by hand.
impl TryFrom<BirthdayModel> for BirthdayEntry {
    type Error = DomainError;

    fn try_from(model: BirthdayModel) -> Result<Self, Self::Error> {
        let date = BirthdayDate::parse(&model.date).map_err(|_| {
            DomainError::DatabaseError(format!(
                "corrupt birthday row for {}: {}",
                model.user_id, model.date
            ))
        })?;
        Ok(BirthdayEntry {
            user_id: MemberId::new(model.user_id),
            date,
            registered_by: model.registered_by.map(MemberId::new),
            updated_at: model.updated_at,
        })
    }
}

/// BirthdayEntry reference as values for database writes
pub struct BirthdayInsert<'a> {
    pub user_id: &'a str,
    pub date: &'a str,
    pub registered_by: Option<&'a str>,
}

impl<'a> BirthdayInsert<'a> {
    pub fn new(entry: &'a BirthdayEntry) -> Self {
        Self {
            user_id: entry.user_id.as_str(),
            date: entry.date.as_str(),
            registered_by: entry.registered_by.as_ref().map(MemberId::as_str),
        }
    }
}
