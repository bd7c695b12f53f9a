//! Attendance log
//!
//! Append-only, in-process check-in/check-out history per identity. Nothing
//! is persisted; a restart starts from an empty log.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use roster_core::entities::{AttendanceDirection, AttendanceRecord};
use roster_core::value_objects::MemberId;
use tracing::debug;

/// Latest record for one identity, as shown on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub user_id: MemberId,
    pub record: AttendanceRecord,
}

#[derive(Debug, Default)]
pub struct AttendanceLog {
    records: RwLock<HashMap<MemberId, Vec<AttendanceRecord>>>,
}

impl AttendanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record; no alternation check
    pub fn record(
        &self,
        user_id: &MemberId,
        direction: AttendanceDirection,
        display_name: &str,
        at: DateTime<Utc>,
    ) -> AttendanceRecord {
        let record = AttendanceRecord::new(direction, at, display_name.to_string());
        self.records
            .write()
            .entry(user_id.clone())
            .or_default()
            .push(record.clone());
        debug!(user_id = %user_id, direction = %direction, "Attendance recorded");
        record
    }

    pub fn check_in(
        &self,
        user_id: &MemberId,
        display_name: &str,
        at: DateTime<Utc>,
    ) -> AttendanceRecord {
        self.record(user_id, AttendanceDirection::In, display_name, at)
    }

    pub fn check_out(
        &self,
        user_id: &MemberId,
        display_name: &str,
        at: DateTime<Utc>,
    ) -> AttendanceRecord {
        self.record(user_id, AttendanceDirection::Out, display_name, at)
    }

    /// Records for one identity in append order
    pub fn history(&self, user_id: &MemberId) -> Vec<AttendanceRecord> {
        self.records.read().get(user_id).cloned().unwrap_or_default()
    }

    /// Latest record per identity, newest first
    pub fn board(&self) -> Vec<BoardEntry> {
        let mut board: Vec<BoardEntry> = self
            .records
            .read()
            .iter()
            .filter_map(|(user_id, records)| {
                records.last().map(|record| BoardEntry {
                    user_id: user_id.clone(),
                    record: record.clone(),
                })
            })
            .collect();
        board.sort_by(|a, b| {
            b.record
                .at
                .cmp(&a.record.at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        board
    }

    /// Every identity's full timeline, ordered by identity
    pub fn all(&self) -> Vec<(MemberId, Vec<AttendanceRecord>)> {
        let mut all: Vec<_> = self
            .records
            .read()
            .iter()
            .map(|(id, records)| (id.clone(), records.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}
