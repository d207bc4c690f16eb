use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::bulk::DayEntry;
use crate::timesheet::Adjust;

use super::*;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreateAttendance {
    pub(super) employee_id: Uuid,
    pub(super) date: NaiveDate,
    #[serde(default)]
    pub(super) actual_in: Option<String>,
    #[serde(default)]
    pub(super) actual_out: Option<String>,
    pub(super) status: AttendanceStatus,
    #[serde(default)]
    pub(super) overtime_hours: Option<f64>,
    #[serde(default)]
    pub(super) remarks: Option<String>,
}

/// Partial update. `late_minutes`/`undertime_hours` carry the three-way
/// sentinel: absent keeps the stored value, `null` recalculates, a number
/// (0 included) overrides.
#[derive(Debug, Deserialize)]
pub(super) struct UpdateAttendance {
    #[serde(default)]
    pub(super) actual_in: Option<String>,
    #[serde(default)]
    pub(super) actual_out: Option<String>,
    #[serde(default)]
    pub(super) status: Option<AttendanceStatus>,
    #[serde(default)]
    pub(super) overtime_hours: Option<f64>,
    #[serde(default)]
    pub(super) late_minutes: Adjust<i32>,
    #[serde(default)]
    pub(super) undertime_hours: Adjust<f64>,
    #[serde(default)]
    pub(super) remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListAttendance {
    pub(super) employee_id: Uuid,
    pub(super) start: NaiveDate,
    pub(super) end: NaiveDate,
}

/// Listing row: the stored record plus the read-only derived overtime
/// (actual-out past scheduled-out), which is display-only and never written.
#[derive(Debug, Serialize)]
pub(super) struct AttendanceView {
    #[serde(flatten)]
    pub(super) record: attendance::Model,
    pub(super) derived_overtime_hours: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct BulkCreateAttendance {
    pub(super) employee_id: Uuid,
    pub(super) start_date: NaiveDate,
    pub(super) end_date: NaiveDate,
    #[serde(default)]
    pub(super) include_saturday: bool,
    #[serde(default)]
    pub(super) include_sunday: bool,
    #[serde(default)]
    pub(super) entries: BTreeMap<NaiveDate, DayEntry>,
    #[serde(default)]
    pub(super) excluded: Vec<NaiveDate>,
}

/// Partial-batch report: items that failed do not roll back items that
/// succeeded, and the error list is capped.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct BulkOutcome {
    pub(super) created: usize,
    pub(super) failed: usize,
    pub(super) errors: Vec<String>,
}
