//! Derives late/undertime/overtime for a single attendance entry from the
//! scheduled and actual punch times.

use serde::{Deserialize, Deserializer};

use crate::clock::time_to_minutes;
use crate::consts::LUNCH_BREAK_MINUTES;
use crate::entity::sea_orm_active_enums::AttendanceStatus;

/// Canonical output of resolving one attendance entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTimes {
    pub actual_in: Option<String>,
    pub actual_out: Option<String>,
    pub late_minutes: i32,
    pub undertime_hours: f64,
    pub overtime_hours: Option<f64>,
}

/// Resolves an attendance entry.
///
/// Absent and leave days are an unconditional override: whatever punches or
/// overtime were supplied are discarded. Overtime on present days is the
/// manually supplied value; the auto-derived figure only exists in the
/// read-only listing via [`derived_overtime_hours`].
pub fn resolve(
    schedule_in: &str,
    schedule_out: &str,
    actual_in: Option<&str>,
    actual_out: Option<&str>,
    status: &AttendanceStatus,
    manual_overtime: Option<f64>,
) -> ResolvedTimes {
    if matches!(status, AttendanceStatus::Absent | AttendanceStatus::Leave) {
        return ResolvedTimes {
            actual_in: None,
            actual_out: None,
            late_minutes: 0,
            undertime_hours: 0.0,
            overtime_hours: None,
        };
    }

    let undertime_hours = undertime_hours(schedule_out, actual_out);
    let late_minutes = match actual_in {
        // If the employee has undertime, don't count as late
        _ if undertime_hours > 0.0 => 0,
        Some(actual_in) => late_minutes(schedule_in, actual_in),
        None => 0,
    };

    ResolvedTimes {
        actual_in: actual_in.filter(|v| !v.is_empty()).map(str::to_string),
        actual_out: actual_out.filter(|v| !v.is_empty()).map(str::to_string),
        late_minutes,
        undertime_hours,
        overtime_hours: manual_overtime,
    }
}

/// Minutes clocked in after the scheduled start, never negative.
pub fn late_minutes(schedule_in: &str, actual_in: &str) -> i32 {
    if actual_in.is_empty() {
        return 0;
    }

    (time_to_minutes(actual_in) as i64 - time_to_minutes(schedule_in) as i64).max(0) as i32
}

/// Hours clocked out before the scheduled end, never negative.
///
/// This is the canonical two-argument formula (the one the listing page has
/// always used). The lunch-adjusted four-argument variant from the edit
/// dialog survives as [`undertime_with_lunch`].
pub fn undertime_hours(schedule_out: &str, actual_out: Option<&str>) -> f64 {
    let Some(actual_out) = actual_out.filter(|v| !v.is_empty()) else {
        return 0.0;
    };

    (time_to_minutes(schedule_out) as f64 - time_to_minutes(actual_out) as f64).max(0.0) / 60.0
}

/// Legacy edit-dialog formula: compares worked spans with the unpaid lunch
/// hour removed from both sides, so a late clock-in also shows up as
/// undertime. Kept as an adapter for callers that still want that behavior.
pub fn undertime_with_lunch(
    schedule_in: &str,
    schedule_out: &str,
    actual_in: &str,
    actual_out: &str,
) -> f64 {
    if actual_in.is_empty() || actual_out.is_empty() {
        return 0.0;
    }

    let lunch = LUNCH_BREAK_MINUTES as f64;
    let scheduled = time_to_minutes(schedule_out) as f64 - time_to_minutes(schedule_in) as f64 - lunch;
    let actual = time_to_minutes(actual_out) as f64 - time_to_minutes(actual_in) as f64 - lunch;

    (scheduled - actual).max(0.0) / 60.0
}

/// Read-only listing figure: hours clocked out past the scheduled end.
/// Never used on the edit path, where overtime is whatever the user typed.
pub fn derived_overtime_hours(schedule_out: &str, actual_out: Option<&str>) -> f64 {
    let Some(actual_out) = actual_out.filter(|v| !v.is_empty()) else {
        return 0.0;
    };

    (time_to_minutes(actual_out) as f64 - time_to_minutes(schedule_out) as f64).max(0.0) / 60.0
}

/// Three-way update sentinel for a stored derived field.
///
/// In the update payload a missing field keeps the stored value, JSON `null`
/// asks for recalculation, and a number is an explicit override (0 included).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Adjust<T> {
    #[default]
    Keep,
    Recalculate,
    Set(T),
}

impl<T> Adjust<T> {
    pub fn apply(self, stored: Option<T>, recalculated: T) -> Option<T> {
        match self {
            Adjust::Keep => stored,
            Adjust::Recalculate => Some(recalculated),
            Adjust::Set(value) => Some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Adjust<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only reached when the field is present; `#[serde(default)]` on the
        // payload field produces `Keep` for absent ones.
        Ok(match Option::<T>::deserialize(deserializer)? {
            None => Adjust::Recalculate,
            Some(value) => Adjust::Set(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_quarter_hour() {
        let resolved = resolve("09:00", "18:00", Some("09:15"), Some("18:00"), &AttendanceStatus::Present, None);

        assert_eq!(resolved.late_minutes, 15);
        assert_eq!(resolved.undertime_hours, 0.0);
        assert_eq!(resolved.overtime_hours, None);
        assert_eq!(resolved.actual_in.as_deref(), Some("09:15"));
    }

    #[test]
    fn test_undertime_suppresses_late() {
        // Clocked in at 09:30 and out at 17:00: one hour of undertime, and
        // the 30 late minutes are deliberately not counted on top of it.
        let resolved = resolve("09:00", "18:00", Some("09:30"), Some("17:00"), &AttendanceStatus::Present, None);

        assert_eq!(resolved.undertime_hours, 1.0);
        assert_eq!(resolved.late_minutes, 0);
    }

    #[test]
    fn test_late_never_negative() {
        assert_eq!(late_minutes("09:00", "08:45"), 0);
        assert_eq!(late_minutes("09:00", "09:00"), 0);
        assert_eq!(late_minutes("09:00", ""), 0);
    }

    #[test]
    fn test_absent_and_leave_clear_everything() {
        for status in [AttendanceStatus::Absent, AttendanceStatus::Leave] {
            let resolved = resolve("09:00", "18:00", Some("09:15"), Some("19:00"), &status, Some(2.0));

            assert_eq!(resolved.actual_in, None);
            assert_eq!(resolved.actual_out, None);
            assert_eq!(resolved.late_minutes, 0);
            assert_eq!(resolved.undertime_hours, 0.0);
            assert_eq!(resolved.overtime_hours, None);
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let first = resolve("08:00", "17:00", Some("08:20"), Some("16:30"), &AttendanceStatus::Present, Some(1.5));
        let second = resolve("08:00", "17:00", Some("08:20"), Some("16:30"), &AttendanceStatus::Present, Some(1.5));

        assert_eq!(first, second);
    }

    #[test]
    fn test_undertime_with_lunch_counts_lateness() {
        // 09:00-18:00 schedule, 10:00-18:00 actual: the late hour surfaces
        // as undertime under the legacy formula but not the canonical one.
        assert_eq!(undertime_with_lunch("09:00", "18:00", "10:00", "18:00"), 1.0);
        assert_eq!(undertime_hours("18:00", Some("18:00")), 0.0);
    }

    #[test]
    fn test_derived_overtime() {
        assert_eq!(derived_overtime_hours("18:00", Some("19:30")), 1.5);
        assert_eq!(derived_overtime_hours("18:00", Some("17:00")), 0.0);
        assert_eq!(derived_overtime_hours("18:00", None), 0.0);
    }

    #[test]
    fn test_adjust_sentinel_from_json() {
        #[derive(Debug, Deserialize)]
        struct Payload {
            #[serde(default)]
            late: Adjust<i32>,
            #[serde(default)]
            undertime: Adjust<f64>,
        }

        let payload: Payload = serde_json::from_str(r#"{ "undertime": null }"#).unwrap();
        assert_eq!(payload.late, Adjust::Keep);
        assert_eq!(payload.undertime, Adjust::Recalculate);

        let payload: Payload = serde_json::from_str(r#"{ "late": 0, "undertime": 2.5 }"#).unwrap();
        assert_eq!(payload.late, Adjust::Set(0));
        assert_eq!(payload.undertime, Adjust::Set(2.5));
    }

    #[test]
    fn test_adjust_apply() {
        assert_eq!(Adjust::Keep.apply(Some(10), 4), Some(10));
        assert_eq!(Adjust::Keep.apply(None, 4), None);
        assert_eq!(Adjust::Recalculate.apply(Some(10), 4), Some(4));
        assert_eq!(Adjust::Set(0).apply(Some(10), 4), Some(0));
    }
}
