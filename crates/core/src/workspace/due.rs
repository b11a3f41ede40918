//! Due date classification

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// How a due date relates to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    /// The task has no due date.
    NoDate,
    /// Due today.
    Today,
    /// Before today.
    Overdue,
    /// After today.
    Upcoming,
}

/// Formatted due date of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDate {
    /// Localized date, `N/A` when the task has no due date.
    pub label: String,
    /// How the date relates to today.
    pub state: DueState,
}

/// Classify a due date against `now` in `now`'s zone.
///
/// A due date later today counts as `Today`, not `Upcoming`.
pub fn due_state<Tz>(due_ms: Option<i64>, now: &DateTime<Tz>) -> DueDate
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(due) = due_ms
        .and_then(DateTime::from_timestamp_millis)
        .map(|utc| utc.with_timezone(&now.timezone()))
    else {
        return DueDate { label: "N/A".to_string(), state: DueState::NoDate };
    };

    let state = if due.date_naive() == now.date_naive() {
        DueState::Today
    } else if due < *now {
        DueState::Overdue
    } else {
        DueState::Upcoming
    };

    DueDate { label: due.format("%-m/%-d/%Y").to_string(), state }
}
