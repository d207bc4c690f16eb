use chrono::{Datelike as _, Days, NaiveDate, Weekday};

/// Every calendar day from `start` to `end`, inclusive. Empty when `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let mut current = Some(start);

    std::iter::from_fn(move || {
        let day = current.filter(|day| *day <= end)?;
        current = day.checked_add_days(Days::new(1));
        Some(day)
    })
}

pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> i64 {
    days_inclusive(start, end)
        .filter(|day| day.weekday() != Weekday::Sat && day.weekday() != Weekday::Sun)
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();

        let days = days_inclusive(start, end).collect::<Vec<_>>();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], start);
        assert_eq!(days[4], end);

        assert_eq!(days_inclusive(end, start).count(), 0);
        assert_eq!(days_inclusive(start, start).count(), 1);
    }

    #[test]
    fn test_count_working_days() {
        // June 2024 has 20 weekdays
        let period_start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let period_end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        assert_eq!(count_working_days(period_start, period_end), 20);
    }
}
