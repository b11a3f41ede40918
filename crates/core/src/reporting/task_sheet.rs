//! Per-task tracked history view

use std::fmt::Display;

use chrono::TimeZone;
use clicktick_common::time::{format_duration, format_timestamp};
use clicktick_domain::{Interval, Task, Tracking};

use crate::tracking::display::{format_interval, format_tracking_duration};

/// One tracked interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalRow {
    /// Interval id.
    pub id: String,
    /// `"1h 2m on Jan 1"`
    pub label: String,
    /// Localized `start - end`.
    pub tooltip: String,
}

/// Top-level row of a time sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRow {
    /// An interval of a single-user history.
    Interval(IntervalRow),
    /// One user's tracking, with its intervals nested.
    User { label: String, intervals: Vec<IntervalRow> },
}

/// Tracked history of a task, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTimeSheet {
    /// Task the history belongs to.
    pub task_id: String,
    /// `Total: 1h 2m`
    pub header: String,
    /// Task label and due date.
    pub tooltip: String,
    /// Rows in display order.
    pub rows: Vec<SheetRow>,
}

impl TaskTimeSheet {
    /// A single tracking lists its intervals directly; several trackings are
    /// listed per user.
    pub fn build<Tz>(task: &Task, trackings: &[Tracking], tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let total = format_tracking_duration(trackings);

        let rows = match trackings {
            [single] => single
                .intervals
                .iter()
                .map(|interval| SheetRow::Interval(interval_row(interval, tz)))
                .collect(),
            _ => trackings
                .iter()
                .map(|tracking| SheetRow::User {
                    label: user_label(tracking),
                    intervals: tracking.intervals.iter().map(|i| interval_row(i, tz)).collect(),
                })
                .collect(),
        };

        Self {
            task_id: task.id.clone(),
            header: format!("Total Time: {total}"),
            tooltip: format!("{} ({total})", task.name),
            rows,
        }
    }
}

fn user_label(tracking: &Tracking) -> String {
    let name = tracking
        .user
        .as_ref()
        .and_then(|user| user.username.clone())
        .unwrap_or_else(|| "Unknown user".to_string());
    format!("{name} ({})", format_duration(tracking.time))
}

fn interval_row<Tz>(interval: &Interval, tz: &Tz) -> IntervalRow
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = |millis: Option<i64>| {
        millis.map_or_else(|| "N/A".to_string(), |millis| format_timestamp(millis, tz))
    };
    IntervalRow {
        id: interval.id.clone(),
        label: format_interval(interval, tz),
        tooltip: format!("{} - {}", stamp(interval.start_ms()), stamp(interval.end_ms())),
    }
}
