//! Attendance records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Check-in or check-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceDirection {
    In,
    Out,
}

impl fmt::Display for AttendanceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => f.write_str("in"),
            Self::Out => f.write_str("out"),
        }
    }
}

/// One attendance event
///
/// The display name is copied at the time of the event so later renames
/// do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub direction: AttendanceDirection,
    pub at: DateTime<Utc>,
    pub display_name: String,
}

impl AttendanceRecord {
    pub fn new(direction: AttendanceDirection, at: DateTime<Utc>, display_name: String) -> Self {
        Self {
            direction,
            at,
            display_name,
        }
    }
}
