//! Schedule Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ScheduleId = RecordId;

/// Work schedule entry: one employee, one date, one shift window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ScheduleId>,

    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,

    /// Employee name snapshot
    pub employee_name: String,

    /// Calendar date, "YYYY-MM-DD"
    pub date: String,

    /// Shift start, "HH:MM" local time
    pub shift_start: String,

    /// Shift end, "HH:MM" local time
    pub shift_end: String,

    pub note: Option<String>,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Create schedule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCreate {
    pub employee_id: String,
    pub date: String,
    pub shift_start: String,
    pub shift_end: String,
    pub note: Option<String>,
}

/// Update schedule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
