//! Bulk attendance drafting: expands a date range against an employee's
//! weekly schedule, keeps track of interactively excluded dates, and
//! validates the whole batch before anything is written.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::employee::WeekSchedule;
use crate::entity::sea_orm_active_enums::AttendanceStatus;
use crate::timesheet::{self, ResolvedTimes};
use crate::utils::days_inclusive;

/// Per-date form input. Seeded blank with a `present` status for every
/// eligible date that has no entry yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(default)]
    pub time_in: String,
    #[serde(default)]
    pub time_out: String,
    pub status: Option<AttendanceStatus>,
    #[serde(default)]
    pub overtime_hours: Option<f64>,
}

impl DayEntry {
    fn seeded() -> Self {
        Self {
            time_in: String::new(),
            time_out: String::new(),
            status: Some(AttendanceStatus::Present),
            overtime_hours: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BulkError {
    #[error("start date {0} is after end date {1}")]
    StartAfterEnd(NaiveDate, NaiveDate),
    #[error("no eligible dates in the selected range")]
    EmptyRange,
    #[error("{date}: status is required")]
    MissingStatus { date: NaiveDate },
    #[error("{date}: time in or time out is required when status is present")]
    MissingTimes { date: NaiveDate },
}

/// One validated attendance-creation request, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAttendance {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub schedule_in: String,
    pub schedule_out: String,
    pub actual_in: Option<String>,
    pub actual_out: Option<String>,
    pub status: AttendanceStatus,
    pub late_minutes: i32,
    pub undertime_hours: f64,
    pub overtime_hours: Option<f64>,
}

/// Draft for one bulk-creation workflow. Owned by a single request/dialog
/// lifetime and submitted as one atomic batch through [`BulkDraft::build`].
#[derive(Debug, Clone)]
pub struct BulkDraft {
    employee_id: Uuid,
    schedule: WeekSchedule,
    start_date: NaiveDate,
    end_date: NaiveDate,
    include_saturday: bool,
    include_sunday: bool,
    entries: BTreeMap<NaiveDate, DayEntry>,
    excluded: BTreeSet<NaiveDate>,
}

impl BulkDraft {
    pub fn new(
        employee_id: Uuid,
        schedule: WeekSchedule,
        start_date: NaiveDate,
        end_date: NaiveDate,
        include_saturday: bool,
        include_sunday: bool,
    ) -> Self {
        let mut draft = Self {
            employee_id,
            schedule,
            start_date,
            end_date,
            include_saturday,
            include_sunday,
            entries: BTreeMap::new(),
            excluded: BTreeSet::new(),
        };
        draft.seed_entries();

        draft
    }

    /// Eligible dates in order: workdays per the weekly schedule, plus
    /// weekend days when the matching flag is on, minus exclusions.
    pub fn dates(&self) -> Vec<NaiveDate> {
        days_inclusive(self.start_date, self.end_date)
            .filter(|date| self.is_eligible(*date))
            .filter(|date| !self.excluded.contains(date))
            .collect()
    }

    /// Excluded dates still inside the current range.
    pub fn excluded_dates(&self) -> Vec<NaiveDate> {
        self.excluded.iter().copied().collect()
    }

    /// Re-scopes the draft to a new range. Exclusions survive as long as
    /// the date remains eligible in the new range; the rest are dropped.
    pub fn set_range(&mut self, start_date: NaiveDate, end_date: NaiveDate) {
        self.start_date = start_date;
        self.end_date = end_date;

        let schedule = self.schedule.clone();
        let (saturday, sunday) = (self.include_saturday, self.include_sunday);
        self.excluded
            .retain(|date| (start_date..=end_date).contains(date) && eligible_day(&schedule, saturday, sunday, *date));
        self.seed_entries();
    }

    pub fn exclude(&mut self, date: NaiveDate) {
        if self.is_eligible(date) {
            self.excluded.insert(date);
        }
    }

    pub fn restore(&mut self, date: NaiveDate) {
        self.excluded.remove(&date);
        self.seed_entries();
    }

    pub fn set_entry(&mut self, date: NaiveDate, entry: DayEntry) {
        self.entries.insert(date, entry);
    }

    pub fn entry(&self, date: NaiveDate) -> Option<&DayEntry> {
        self.entries.get(&date)
    }

    /// Validates every eligible date and produces one creation request per
    /// date, in calendar order. Nothing is written here; the whole batch
    /// fails on the first structural problem so error messages can name the
    /// offending date.
    pub fn build(&self) -> Result<Vec<NewAttendance>, BulkError> {
        if self.start_date > self.end_date {
            return Err(BulkError::StartAfterEnd(self.start_date, self.end_date));
        }

        let dates = self.dates();
        if dates.is_empty() {
            return Err(BulkError::EmptyRange);
        }

        let mut records = Vec::with_capacity(dates.len());

        for date in dates {
            let entry = self.entries.get(&date).cloned().unwrap_or_else(DayEntry::seeded);

            let Some(status) = entry.status else {
                return Err(BulkError::MissingStatus { date });
            };

            if status == AttendanceStatus::Present && entry.time_in.is_empty() && entry.time_out.is_empty() {
                return Err(BulkError::MissingTimes { date });
            }

            let day_schedule = self.schedule.on(date.weekday());

            let ResolvedTimes {
                actual_in,
                actual_out,
                late_minutes,
                undertime_hours,
                overtime_hours,
            } = timesheet::resolve(
                &day_schedule.time_in,
                &day_schedule.time_out,
                Some(entry.time_in.as_str()),
                Some(entry.time_out.as_str()),
                &status,
                entry.overtime_hours,
            );

            records.push(NewAttendance {
                employee_id: self.employee_id,
                date,
                schedule_in: day_schedule.time_in.clone(),
                schedule_out: day_schedule.time_out.clone(),
                actual_in,
                actual_out,
                status,
                late_minutes,
                undertime_hours,
                overtime_hours,
            });
        }

        Ok(records)
    }

    fn is_eligible(&self, date: NaiveDate) -> bool {
        (self.start_date..=self.end_date).contains(&date)
            && eligible_day(&self.schedule, self.include_saturday, self.include_sunday, date)
    }

    fn seed_entries(&mut self) {
        for date in self.dates() {
            self.entries.entry(date).or_insert_with(DayEntry::seeded);
        }
    }
}

fn eligible_day(schedule: &WeekSchedule, include_saturday: bool, include_sunday: bool, date: NaiveDate) -> bool {
    let weekday = date.weekday();

    schedule.on(weekday).is_workday
        || (weekday == chrono::Weekday::Sat && include_saturday)
        || (weekday == chrono::Weekday::Sun && include_sunday)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(start: NaiveDate, end: NaiveDate, saturday: bool, sunday: bool) -> BulkDraft {
        BulkDraft::new(Uuid::new_v4(), WeekSchedule::default(), start, end, saturday, sunday)
    }

    #[test]
    fn test_weekdays_only_by_default() {
        // 2024-07-01 is a Monday; the full week holds five workdays
        let draft = draft(date(2024, 7, 1), date(2024, 7, 7), false, false);

        let dates = draft.dates();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], date(2024, 7, 1));
        assert_eq!(dates[4], date(2024, 7, 5));
    }

    #[test]
    fn test_weekend_flags_extend_the_range() {
        let with_saturday = draft(date(2024, 7, 1), date(2024, 7, 7), true, false);
        assert_eq!(with_saturday.dates().len(), 6);

        let with_both = draft(date(2024, 7, 1), date(2024, 7, 7), true, true);
        assert_eq!(with_both.dates().len(), 7);
    }

    #[test]
    fn test_exclude_and_restore() {
        let mut draft = draft(date(2024, 7, 1), date(2024, 7, 5), false, false);

        draft.exclude(date(2024, 7, 3));
        assert!(!draft.dates().contains(&date(2024, 7, 3)));
        assert_eq!(draft.excluded_dates(), vec![date(2024, 7, 3)]);

        draft.restore(date(2024, 7, 3));
        assert!(draft.dates().contains(&date(2024, 7, 3)));
        assert!(draft.excluded_dates().is_empty());
    }

    #[test]
    fn test_exclusions_follow_range_edits() {
        let mut draft = draft(date(2024, 7, 1), date(2024, 7, 12), false, false);
        draft.exclude(date(2024, 7, 3));
        draft.exclude(date(2024, 7, 10));

        // 7/10 falls out of the narrowed range and its exclusion is dropped
        draft.set_range(date(2024, 7, 1), date(2024, 7, 5));
        assert_eq!(draft.excluded_dates(), vec![date(2024, 7, 3)]);

        // widening again does not resurrect it
        draft.set_range(date(2024, 7, 1), date(2024, 7, 12));
        assert_eq!(draft.excluded_dates(), vec![date(2024, 7, 3)]);
        assert!(draft.dates().contains(&date(2024, 7, 10)));
    }

    #[test]
    fn test_build_seeds_and_validates() {
        let mut draft = draft(date(2024, 7, 1), date(2024, 7, 2), false, false);

        // seeded entries are present with empty punches, so the first build
        // must point at the first offending date
        assert_eq!(
            draft.build().unwrap_err(),
            BulkError::MissingTimes { date: date(2024, 7, 1) }
        );

        draft.set_entry(
            date(2024, 7, 1),
            DayEntry {
                time_in: "09:15".to_string(),
                time_out: "18:00".to_string(),
                status: Some(AttendanceStatus::Present),
                overtime_hours: None,
            },
        );
        draft.set_entry(
            date(2024, 7, 2),
            DayEntry {
                time_in: String::new(),
                time_out: String::new(),
                status: Some(AttendanceStatus::Leave),
                overtime_hours: Some(3.0),
            },
        );

        let records = draft.build().unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].late_minutes, 15);
        assert_eq!(records[0].schedule_in, "09:00");
        assert_eq!(records[0].actual_in.as_deref(), Some("09:15"));

        // leave day: punches and overtime cleared no matter what was typed
        assert_eq!(records[1].status, AttendanceStatus::Leave);
        assert_eq!(records[1].actual_in, None);
        assert_eq!(records[1].actual_out, None);
        assert_eq!(records[1].overtime_hours, None);
        assert_eq!(records[1].late_minutes, 0);
    }

    #[test]
    fn test_missing_status_is_an_error() {
        let mut draft = draft(date(2024, 7, 1), date(2024, 7, 1), false, false);
        draft.set_entry(
            date(2024, 7, 1),
            DayEntry {
                time_in: "09:00".to_string(),
                time_out: "18:00".to_string(),
                status: None,
                overtime_hours: None,
            },
        );

        assert_eq!(
            draft.build().unwrap_err(),
            BulkError::MissingStatus { date: date(2024, 7, 1) }
        );
    }

    #[test]
    fn test_degenerate_ranges_fail_before_any_write() {
        let reversed = draft(date(2024, 7, 5), date(2024, 7, 1), false, false);
        assert_eq!(
            reversed.build().unwrap_err(),
            BulkError::StartAfterEnd(date(2024, 7, 5), date(2024, 7, 1))
        );

        // a weekend-only range with both flags off leaves nothing to create
        let empty = draft(date(2024, 7, 6), date(2024, 7, 7), false, false);
        assert_eq!(empty.build().unwrap_err(), BulkError::EmptyRange);
    }
}
