//! Timer display model and tracking-aware formatting

use std::fmt::Display;

use chrono::TimeZone;
use clicktick_common::time::{format_day, format_duration, format_duration_watch};
use clicktick_domain::constants::DEFAULT_TIME;
use clicktick_domain::{total_tracked_ms, Interval, Tracking};

/// Which affordance the timer item offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Start affordance, showing the accumulated total.
    Idle,
    /// Stop affordance, showing the running elapsed time.
    Running,
}

/// What the status surface should render for a timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerDisplay {
    /// Running or idle.
    pub mode: DisplayMode,
    /// Compact duration, e.g. `2m`.
    pub text: String,
    /// Task label with the counter.
    pub tooltip: String,
}

impl TimerDisplay {
    /// Idle display showing the tracked total.
    pub fn idle(total_ms: i64, task_label: &str) -> Self {
        Self {
            mode: DisplayMode::Idle,
            text: format_duration(total_ms),
            tooltip: format!("Start Timer for {task_label}"),
        }
    }

    /// Running display showing the elapsed time.
    pub fn running(elapsed_ms: i64, task_label: &str) -> Self {
        Self {
            mode: DisplayMode::Running,
            text: format_duration(elapsed_ms),
            tooltip: format!(
                "Stop Timer for {task_label} ({})",
                format_duration_watch(elapsed_ms)
            ),
        }
    }

    /// Whether the display shows a running entry.
    pub fn is_running(&self) -> bool {
        self.mode == DisplayMode::Running
    }
}

/// Stopwatch text for the running counter; the default when not counting.
pub fn counter_text(elapsed_ms: Option<i64>) -> String {
    elapsed_ms.map_or_else(|| DEFAULT_TIME.to_string(), format_duration_watch)
}

/// Total of all closed intervals across a task's trackings.
pub fn format_tracking_duration(trackings: &[Tracking]) -> String {
    format_duration(total_tracked_ms(trackings))
}

/// `"<duration> on <day>"`, e.g. `"1h 2m on Jan 1"`.
///
/// The duration is the interval's span when both ends are known, else its
/// recorded time.
pub fn format_interval<Tz>(interval: &Interval, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let span = interval.span_ms().unwrap_or_else(|| interval.closed_ms());
    let day = interval.start_ms().map_or_else(|| "N/A".to_string(), |start| format_day(start, tz));
    format!("{} on {day}", format_duration(span))
}
