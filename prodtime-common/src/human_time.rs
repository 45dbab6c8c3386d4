//! Human-readable duration formatting for reports
//!
//! Display only: formatted values are never fed back into calculations.

/// Format minutes as hours and minutes
///
/// # Examples
///
/// ```
/// use prodtime_common::human_time::format_minutes;
///
/// assert_eq!(format_minutes(0), "0m");
/// assert_eq!(format_minutes(45), "45m");
/// assert_eq!(format_minutes(750), "12h 30m");
/// assert_eq!(format_minutes(2_000), "33h 20m");
/// assert_eq!(format_minutes(120), "2h");
/// ```
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {:02}m", h, m),
    }
}

/// Format minutes as decimal hours with at most one decimal place
///
/// Trailing `.0` is dropped so whole hours read as `"50h"`.
///
/// # Examples
///
/// ```
/// use prodtime_common::human_time::format_hours;
///
/// assert_eq!(format_hours(750), "12.5h");
/// assert_eq!(format_hours(2_000), "33.3h");
/// assert_eq!(format_hours(3_000), "50h");
/// ```
pub fn format_hours(minutes: u64) -> String {
    let hours = crate::totals::minutes_to_hours(minutes);
    if hours.fract() == 0.0 {
        format!("{:.0}h", hours)
    } else {
        format!("{:.1}h", hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_durations() {
        assert_eq!(format_minutes(1), "1m");
        assert_eq!(format_minutes(59), "59m");
    }

    #[test]
    fn test_hours_with_padding() {
        assert_eq!(format_minutes(61), "1h 01m");
        assert_eq!(format_minutes(3_600), "60h");
    }

    #[test]
    fn test_decimal_hours() {
        assert_eq!(format_hours(0), "0h");
        assert_eq!(format_hours(90), "1.5h");
        assert_eq!(format_hours(100), "1.7h");
    }
}
