//! Reporting periods in the caller's local zone
//!
//! Weeks start on Sunday. Every range is inclusive: it ends one millisecond
//! before the next period's local midnight.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};
use clicktick_domain::{ClickTickError, Result, TimeRange};

/// Reporting window, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Since local midnight.
    Today,
    /// Monday to Sunday.
    ThisWeek,
    /// Calendar month.
    ThisMonth,
}

impl Period {
    /// Every period in display order.
    pub const ALL: [Period; 3] = [Period::Today, Period::ThisWeek, Period::ThisMonth];

    /// Lower-case label used in report headers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this week",
            Self::ThisMonth => "this month",
        }
    }
}

/// Inclusive epoch-millis range of `period` around `now`.
///
/// # Errors
/// `Internal` when the calendar arithmetic leaves chrono's range or local
/// midnight does not exist in the zone.
pub fn period_range<Tz: TimeZone>(period: Period, now: &DateTime<Tz>) -> Result<TimeRange> {
    let today = now.date_naive();
    let (first_day, next_first_day) = match period {
        Period::Today => (today, add_days(today, 1)?),
        Period::ThisWeek => {
            let offset = u64::from(today.weekday().num_days_from_sunday());
            let sunday = today
                .checked_sub_days(Days::new(offset))
                .ok_or_else(|| out_of_range(today))?;
            (sunday, add_days(sunday, 7)?)
        }
        Period::ThisMonth => {
            let first = today.with_day(1).ok_or_else(|| out_of_range(today))?;
            let next = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            }
            .ok_or_else(|| out_of_range(first))?;
            (first, next)
        }
    };

    let tz = now.timezone();
    Ok(TimeRange::new(local_midnight(&tz, first_day)?, local_midnight(&tz, next_first_day)? - 1))
}

/// One range covering today, this week and this month.
///
/// # Errors
/// See [`period_range`].
pub fn superset_range<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<TimeRange> {
    let week = period_range(Period::ThisWeek, now)?;
    let month = period_range(Period::ThisMonth, now)?;
    Ok(TimeRange::new(
        week.start_date.min(month.start_date),
        week.end_date.max(month.end_date),
    ))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| out_of_range(date))
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<i64> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|local| local.timestamp_millis())
        .ok_or_else(|| ClickTickError::Internal(format!("no local midnight on {date}")))
}

fn out_of_range(date: NaiveDate) -> ClickTickError {
    ClickTickError::Internal(format!("date arithmetic out of range near {date}"))
}
