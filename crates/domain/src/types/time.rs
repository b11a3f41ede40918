//! Time tracking records
//!
//! The service encodes instants and durations as epoch-millis strings. The
//! accessors here parse them; values that fail to parse count as absent.

use serde::{Deserialize, Deserializer, Serialize};

use super::parse_millis;
use super::task::{Tag, TaskStatus, User};
use crate::constants::RUNNING_DURATION;

/// Task summary embedded in a time entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTask {
    /// Service id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Workspace-specific id, if enabled.
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Current status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl EntryTask {
    /// Custom id when set, else the id.
    pub fn display_id(&self) -> &str {
        self.custom_id.as_deref().filter(|id| !id.is_empty()).unwrap_or(&self.id)
    }
}

/// Containers of the task an entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLocation {
    /// Folder id.
    #[serde(default)]
    pub folder_id: Option<String>,
    /// List id.
    #[serde(default)]
    pub list_id: Option<String>,
    /// Space id.
    #[serde(default)]
    pub space_id: Option<String>,
}

/// A server-recorded interval of work, open or closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Service id.
    pub id: String,
    /// Task tracked, absent for task-less entries.
    #[serde(default)]
    pub task: Option<EntryTask>,
    /// Workspace id.
    #[serde(default)]
    pub wid: Option<String>,
    /// The member.
    #[serde(default)]
    pub user: Option<User>,
    /// Whether the time is billable.
    #[serde(default)]
    pub billable: bool,
    /// Epoch millis as a string.
    pub start: String,
    /// Epoch millis as a string; absent while running.
    #[serde(default)]
    pub end: Option<String>,
    /// Millis as a string; negative while running.
    pub duration: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Tags attached to it.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Client that recorded it.
    #[serde(default)]
    pub source: Option<String>,
    /// Last change, epoch millis.
    #[serde(default)]
    pub at: Option<String>,
    /// Containers of the task.
    #[serde(default)]
    pub task_location: Option<TaskLocation>,
    /// Web URL of the task.
    #[serde(default)]
    pub task_url: Option<String>,
}

impl TimeEntry {
    /// Start in epoch millis.
    pub fn start_ms(&self) -> Option<i64> {
        parse_millis(&self.start)
    }

    /// `None` while running.
    pub fn end_ms(&self) -> Option<i64> {
        self.end.as_deref().and_then(parse_millis)
    }

    /// Duration in millis; negative while running.
    pub fn duration_ms(&self) -> Option<i64> {
        parse_millis(&self.duration)
    }

    /// Id of the task the entry tracks.
    pub fn task_id(&self) -> Option<&str> {
        self.task.as_ref().map(|task| task.id.as_str())
    }

    /// An entry is open while its duration is negative or it has no end.
    pub fn is_running(&self) -> bool {
        self.duration_ms().is_some_and(|duration| duration < 0)
            || self.end.as_deref().map_or(true, str::is_empty)
    }

    /// Finalized duration; zero for open or unparsable entries.
    pub fn closed_duration_ms(&self) -> i64 {
        if self.is_running() {
            return 0;
        }
        self.duration_ms().unwrap_or(0).max(0)
    }
}

/// One tracked interval in a task's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Service id.
    pub id: String,
    /// Epoch millis as a string.
    pub start: String,
    /// Epoch millis as a string; absent while open.
    #[serde(default)]
    pub end: Option<String>,
    /// Duration in millis as a string.
    #[serde(deserialize_with = "string_or_number")]
    pub time: String,
    /// Client that recorded it.
    #[serde(default)]
    pub source: Option<String>,
    /// Creation time, epoch millis as a string.
    #[serde(default)]
    pub date_added: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Interval {
    /// Start in epoch millis.
    pub fn start_ms(&self) -> Option<i64> {
        parse_millis(&self.start)
    }

    /// `None` while the interval is open.
    pub fn end_ms(&self) -> Option<i64> {
        self.end.as_deref().and_then(parse_millis)
    }

    /// Recorded duration of a closed interval; open intervals count as zero.
    pub fn closed_ms(&self) -> i64 {
        parse_millis(&self.time).filter(|time| *time > 0).unwrap_or(0)
    }

    /// `end - start`, when both instants are known.
    pub fn span_ms(&self) -> Option<i64> {
        Some(self.end_ms()?.saturating_sub(self.start_ms()?))
    }
}

/// Tracked history of one user on one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracking {
    /// Recorded intervals.
    #[serde(default)]
    pub intervals: Vec<Interval>,
    /// Total of the intervals in millis.
    #[serde(default)]
    pub time: i64,
    /// Who tracked the intervals.
    #[serde(default)]
    pub user: Option<User>,
}

impl Tracking {
    /// Sum of the closed intervals, saturating on absurd server values.
    pub fn total_ms(&self) -> i64 {
        self.intervals.iter().map(Interval::closed_ms).fold(0, i64::saturating_add)
    }
}

/// Sum of every closed interval across a task's tracking history.
pub fn total_tracked_ms(trackings: &[Tracking]) -> i64 {
    trackings.iter().map(Tracking::total_ms).fold(0, i64::saturating_add)
}

/// Request body that opens a running entry for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTimeEntry {
    /// Task id.
    pub tid: String,
    /// Epoch millis.
    pub start: i64,
    /// `-1` opens a running entry.
    pub duration: i64,
    /// Whether the time is billable.
    pub billable: bool,
    /// Whether the entry was entered manually.
    #[serde(rename = "fromTimesheet")]
    pub from_timesheet: bool,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags attached to it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Track on behalf of this user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,
}

impl CreateTimeEntry {
    /// Open entry starting at `start_ms`, left running until stopped.
    pub fn running(task_id: impl Into<String>, start_ms: i64, billable: bool) -> Self {
        Self {
            tid: task_id.into(),
            start: start_ms,
            duration: RUNNING_DURATION,
            billable,
            from_timesheet: false,
            description: None,
            tags: Vec::new(),
            assignee: None,
        }
    }
}

/// Inclusive epoch-millis window for time entry queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Epoch millis, inclusive.
    pub start_date: i64,
    /// Epoch millis, inclusive.
    pub end_date: i64,
}

impl TimeRange {
    /// Window from `start_date` to `end_date`.
    pub fn new(start_date: i64, end_date: i64) -> Self {
        Self { start_date, end_date }
    }

    /// Bounds are inclusive.
    pub fn contains(&self, instant_ms: i64) -> bool {
        instant_ms >= self.start_date && instant_ms <= self.end_date
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(raw) => Ok(raw),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number, got {other}"))),
    }
}
