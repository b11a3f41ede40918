//! Human-readable duration and date formatting
//!
//! All inputs are milliseconds (or epoch milliseconds) as the ClickUp API
//! reports them. Negative durations clamp to zero.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Counter text shown before a timer has ever ticked.
pub const WATCH_ZERO: &str = "00:00:00";

const MS_PER_SECOND: i64 = 1_000;
const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Format a duration as the coarsest readable summary.
///
/// - one day or more: `"Xd Yh Zm"`
/// - one hour or more: `"Yh Zm"`
/// - one minute or more: `"Zm"`
/// - otherwise: `"Ws"`
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "foundation")]
/// # {
/// use clicktick_common::time::format::format_duration;
///
/// assert_eq!(format_duration(0), "0s");
/// assert_eq!(format_duration(90_000), "1m");
/// assert_eq!(format_duration(3_661_000), "1h 1m");
/// assert_eq!(format_duration(90_000_000), "1d 1h 0m");
/// # }
/// ```
pub fn format_duration(millis: i64) -> String {
    let total_secs = millis.max(0) / MS_PER_SECOND;

    let days = total_secs / SECONDS_PER_DAY;
    let hours = (total_secs % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total_secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_secs % SECONDS_PER_MINUTE;

    if days >= 1 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else if minutes >= 1 {
        format!("{minutes}m")
    } else {
        format!("{seconds}s")
    }
}

/// Format a whole number of seconds with [`format_duration`].
pub fn format_seconds(seconds: i64) -> String {
    format_duration(seconds.saturating_mul(MS_PER_SECOND))
}

/// Format a duration as a stopwatch, `HH:mm:ss`.
///
/// Hours are not wrapped at a day boundary, so 25 hours renders as
/// `"25:00:00"`.
pub fn format_duration_watch(millis: i64) -> String {
    if millis <= 0 {
        return WATCH_ZERO.to_string();
    }

    let total_secs = millis / MS_PER_SECOND;
    let hours = total_secs / SECONDS_PER_HOUR;
    let minutes = (total_secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_secs % SECONDS_PER_MINUTE;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Stopwatch text for the span between two epoch-millis instants.
pub fn format_duration_between(from_ms: i64, to_ms: i64) -> String {
    format_duration_watch(to_ms.saturating_sub(from_ms))
}

/// Localized date and time, e.g. `"1/15/2024, 9:05:00 AM"`.
///
/// Returns `"N/A"` for instants chrono cannot represent.
pub fn format_timestamp<Tz>(epoch_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    with_zone(epoch_ms, tz).map_or_else(
        || "N/A".to_string(),
        |local| local.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
    )
}

/// Short day label, e.g. `"Jan 15"`.
pub fn format_day<Tz>(epoch_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    with_zone(epoch_ms, tz)
        .map_or_else(|| "N/A".to_string(), |local| local.format("%b %-d").to_string())
}

fn with_zone<Tz: TimeZone>(epoch_ms: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp_millis(epoch_ms).map(|utc| utc.with_timezone(tz))
}

#[cfg(test)]
mod tests {
    //! Unit tests for time::format.
    use chrono::{FixedOffset, Utc};

    use super::*;

    /// Validates the summary thresholds of `format_duration`.
    ///
    /// Assertions:
    /// - Sub-minute values render as seconds.
    /// - Minute, hour and day thresholds pick the matching layout.
    #[test]
    fn test_format_duration_thresholds() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59_999), "59s");
        assert_eq!(format_duration(90_000), "1m");
        assert_eq!(format_duration(3_600_000), "1h 0m");
        assert_eq!(format_duration(3_661_000), "1h 1m");
        assert_eq!(format_duration(90_000_000), "1d 1h 0m");
        assert_eq!(format_duration(2 * 86_400_000 + 125 * 60_000), "2d 2h 5m");
    }

    /// Validates that negative durations clamp to zero.
    #[test]
    fn test_format_duration_negative() {
        assert_eq!(format_duration(-1), "0s");
        assert_eq!(format_duration_watch(-5_000), WATCH_ZERO);
    }

    /// Validates `format_seconds` delegates with a unit conversion.
    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(120), "2m");
        assert_eq!(format_seconds(3_660), "1h 1m");
    }

    /// Validates the stopwatch layout.
    ///
    /// Assertions:
    /// - Components are zero padded.
    /// - Hours keep counting past a day.
    #[test]
    fn test_format_duration_watch() {
        assert_eq!(format_duration_watch(0), "00:00:00");
        assert_eq!(format_duration_watch(3_661_000), "01:01:01");
        assert_eq!(format_duration_watch(90_000_000), "25:00:00");
        assert_eq!(format_duration_between(1_000, 121_000), "00:02:00");
        assert_eq!(format_duration_between(5_000, 1_000), "00:00:00");
    }

    /// Validates date formatting honours the supplied zone.
    #[test]
    fn test_format_dates_in_zone() {
        // 2024-01-15T23:30:00Z
        let instant = 1_705_361_400_000;
        assert_eq!(format_day(instant, &Utc), "Jan 15");
        assert_eq!(format_timestamp(instant, &Utc), "1/15/2024, 11:30:00 PM");

        let tokyo = FixedOffset::east_opt(9 * 3_600).unwrap();
        assert_eq!(format_day(instant, &tokyo), "Jan 16");
    }
}
