//! Completion-time parsing and production-minute calculation
//!
//! Completion time arrives as free-form text such as `"5m"`, `"12 хв"` or
//! `"7м"`. Parsing never fails: anything that is not a positive whole number
//! of minutes contributes zero.
//!
//! Production minutes are computed as `(completion_hours * rate)` converted
//! back to minutes and rounded half-up exactly once, per lesson. Rollups add
//! the rounded per-lesson integers and never round again.

use tracing::trace;

/// Minute-unit suffixes accepted after the number, checked in order
pub const MINUTE_SUFFIXES: [&str; 3] = ["хв", "м", "m"];

/// Parse a completion-time string into whole minutes
///
/// Accepts a bare integer or an integer followed by one minute suffix
/// (`m`, `м`, `хв`), with optional whitespace in between. Empty,
/// unparseable and non-positive values yield `0`.
///
/// # Examples
///
/// ```
/// use prodtime_common::completion::parse_completion_minutes;
///
/// assert_eq!(parse_completion_minutes("5m"), 5);
/// assert_eq!(parse_completion_minutes("12 хв"), 12);
/// assert_eq!(parse_completion_minutes("7м"), 7);
/// assert_eq!(parse_completion_minutes(""), 0);
/// assert_eq!(parse_completion_minutes("-3m"), 0);
/// assert_eq!(parse_completion_minutes("soon"), 0);
/// ```
pub fn parse_completion_minutes(raw: &str) -> u32 {
    let lowered = raw.trim().to_lowercase();
    let number = strip_minute_suffix(&lowered).trim();

    match number.parse::<i64>() {
        Ok(minutes) if minutes > 0 => u32::try_from(minutes).unwrap_or(u32::MAX),
        Ok(_) => 0,
        Err(_) => {
            if !number.is_empty() {
                trace!("Unparseable completion time '{}', counting 0 minutes", raw);
            }
            0
        }
    }
}

/// Parse an optional completion time; a missing value counts as zero
pub fn parse_optional_minutes(raw: Option<&str>) -> u32 {
    raw.map(parse_completion_minutes).unwrap_or(0)
}

fn strip_minute_suffix(value: &str) -> &str {
    MINUTE_SUFFIXES
        .iter()
        .find_map(|suffix| value.strip_suffix(suffix))
        .unwrap_or(value)
}

/// Production minutes for a completion time already expressed in minutes
///
/// Computed as `round((minutes / 60) * rate * 60)`: the completion time is
/// converted to hours, multiplied by the rate, and the resulting production
/// hours are converted back to minutes before the single rounding step.
pub fn production_minutes(completion_minutes: u32, rate: u32) -> u64 {
    if completion_minutes == 0 || rate == 0 {
        return 0;
    }
    let completion_hours = f64::from(completion_minutes) / 60.0;
    let production_hours = completion_hours * f64::from(rate);
    (production_hours * 60.0).round() as u64
}

/// Parse a raw completion time and convert it to production minutes
///
/// # Examples
///
/// ```
/// use prodtime_common::completion::calculate_production_minutes;
///
/// assert_eq!(calculate_production_minutes("5m", 150), 750);
/// assert_eq!(calculate_production_minutes("10m", 200), 2000);
/// assert_eq!(calculate_production_minutes("", 400), 0);
/// ```
pub fn calculate_production_minutes(completion_time_raw: &str, rate: u32) -> u64 {
    production_minutes(parse_completion_minutes(completion_time_raw), rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_completion_minutes("5m"), 5);
        assert_eq!(parse_completion_minutes("5M"), 5);
        assert_eq!(parse_completion_minutes("5 m"), 5);
        assert_eq!(parse_completion_minutes("15м"), 15);
        assert_eq!(parse_completion_minutes("20хв"), 20);
        assert_eq!(parse_completion_minutes(" 20 ХВ "), 20);
        assert_eq!(parse_completion_minutes("45"), 45);
    }

    #[test]
    fn test_parse_invalid_is_zero() {
        assert_eq!(parse_completion_minutes(""), 0);
        assert_eq!(parse_completion_minutes("   "), 0);
        assert_eq!(parse_completion_minutes("m"), 0);
        assert_eq!(parse_completion_minutes("abc"), 0);
        assert_eq!(parse_completion_minutes("2.5m"), 0);
        assert_eq!(parse_completion_minutes("5h"), 0);
        assert_eq!(parse_completion_minutes("5mm"), 0);
    }

    #[test]
    fn test_parse_non_positive_is_zero() {
        assert_eq!(parse_completion_minutes("0m"), 0);
        assert_eq!(parse_completion_minutes("-10m"), 0);
    }

    #[test]
    fn test_parse_huge_value_saturates() {
        assert_eq!(parse_completion_minutes("99999999999m"), u32::MAX);
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional_minutes(None), 0);
        assert_eq!(parse_optional_minutes(Some("8m")), 8);
    }

    #[test]
    fn test_worked_examples() {
        assert_eq!(calculate_production_minutes("5m", 150), 750);
        assert_eq!(calculate_production_minutes("10m", 200), 2000);
        assert_eq!(calculate_production_minutes("6m", 500), 3000);
        assert_eq!(calculate_production_minutes("", 200), 0);
    }

    #[test]
    fn test_zero_rate() {
        assert_eq!(production_minutes(30, 0), 0);
    }

    #[test]
    fn test_hours_path_matches_exact_product() {
        // The float path must land on minutes * rate for whole-minute input
        for rate in [1, 7, 150, 200, 300, 333, 400, 999] {
            for minutes in 1..=720u32 {
                assert_eq!(
                    production_minutes(minutes, rate),
                    u64::from(minutes) * u64::from(rate),
                    "minutes={} rate={}",
                    minutes,
                    rate
                );
            }
        }
    }
}
