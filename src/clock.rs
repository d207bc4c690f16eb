//! Wall-clock string arithmetic. Attendance times are stored as "HH:MM"
//! strings (24-hour clock) and all late/undertime/overtime math happens on
//! minutes-since-midnight.

/// Parses a 24-hour "HH:MM" string to minutes since midnight.
///
/// Empty and malformed input both resolve to 0 rather than failing: a blank
/// punch field means "not clocked", and every caller treats 0 the same way.
pub fn time_to_minutes(value: &str) -> u32 {
    let Some((hour, minute)) = value.split_once(':') else {
        return 0;
    };

    let (Ok(hour), Ok(minute)) = (hour.parse::<u32>(), minute.parse::<u32>()) else {
        return 0;
    };

    if minute >= 60 {
        return 0;
    }

    hour * 60 + minute
}

/// Inverse of [`time_to_minutes`], zero-padded. Values past midnight wrap.
pub fn minutes_to_time(minutes: u32) -> String {
    let minutes = minutes % (24 * 60);

    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// "HH:MM" -> "h:mm AM/PM", display only.
pub fn format_time_12_hour(value: &str) -> String {
    let minutes = time_to_minutes(value) % (24 * 60);
    let (hour, minute) = (minutes / 60, minutes % 60);

    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let hour = match hour % 12 {
        0 => 12,
        hour => hour,
    };

    format!("{hour}:{minute:02} {meridiem}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("00:00"), 0);
        assert_eq!(time_to_minutes("09:00"), 540);
        assert_eq!(time_to_minutes("18:30"), 1110);
        assert_eq!(time_to_minutes("23:59"), 1439);
    }

    #[test]
    fn test_time_to_minutes_bad_input() {
        assert_eq!(time_to_minutes(""), 0);
        assert_eq!(time_to_minutes("9"), 0);
        assert_eq!(time_to_minutes("ab:cd"), 0);
        assert_eq!(time_to_minutes("09:75"), 0);
    }

    #[test]
    fn test_minutes_to_time() {
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(540), "09:00");
        assert_eq!(minutes_to_time(1110), "18:30");

        // hour >= 24 wraps instead of crashing
        assert_eq!(minutes_to_time(24 * 60 + 15), "00:15");
    }

    #[test]
    fn test_format_time_12_hour() {
        assert_eq!(format_time_12_hour("00:05"), "12:05 AM");
        assert_eq!(format_time_12_hour("09:00"), "9:00 AM");
        assert_eq!(format_time_12_hour("12:00"), "12:00 PM");
        assert_eq!(format_time_12_hour("18:30"), "6:30 PM");
    }
}
