//! Attendance Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type AttendanceId = RecordId;

/// Attendance status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        Self::Present
    }
}

/// Attendance record (one clock-in / clock-out pair per employee per day)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AttendanceId>,

    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,

    /// Employee name snapshot
    pub employee_name: String,

    #[serde(default)]
    pub status: AttendanceStatus,

    /// Clock-in time (Unix timestamp millis)
    pub clock_in: i64,

    /// Clock-out time (Unix timestamp millis)
    pub clock_out: Option<i64>,

    pub note: Option<String>,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Clock-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockIn {
    pub employee_id: String,
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    pub note: Option<String>,
}

/// Clock-out payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockOut {
    pub note: Option<String>,
}
