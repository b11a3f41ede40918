//! Plain-text rendering of command results

use std::fmt::Write as _;

use clicktick_common::time::format_duration;
use clicktick_core::reporting::{BucketStatus, IntervalRow, SheetRow, TaskTimeSheet, TimeBucket, TrackedTimeReport};
use clicktick_core::tracking::TimerState;
use clicktick_core::workspace::{DueState, ListSummary};
use clicktick_domain::constants::{NO_TASK_SELECTED_MESSAGE, NO_TOKEN_MESSAGE};
use clicktick_domain::{Folder, Task, Team};
use clicktick_infra::api::{TokenSource, TokenStatus};

use crate::commands::{SpaceListing, StatusReport, TaskListing};

/// `Selected [id] name`
pub fn task_selected(task: &Task) -> String {
    format!("Selected {}", task.label())
}

/// One-line outcome of start or stop.
pub fn timer_state(state: Option<TimerState>) -> String {
    match state {
        None => NO_TASK_SELECTED_MESSAGE.to_string(),
        Some(TimerState::Running) => "Timer running".to_string(),
        Some(TimerState::Idle) => "Timer stopped".to_string(),
        Some(TimerState::Stopped) => "Timer released".to_string(),
    }
}

/// Selected task, timer and due date, one per line.
pub fn status(report: &StatusReport) -> String {
    let Some(task) = report.task.as_ref() else {
        return NO_TASK_SELECTED_MESSAGE.to_string();
    };

    let mut out = task.label();
    if let Some(status) = task.status.as_ref() {
        let _ = write!(out, " ({})", status.status);
    }
    if let Some(display) = report.display.as_ref() {
        let state = match report.state {
            Some(TimerState::Running) => "running",
            Some(TimerState::Idle) => "idle",
            _ => "released",
        };
        let _ = write!(out, "\nTimer: {state}, {}", display.text);
        if let Some(counter) = report.counter.as_ref().filter(|_| display.is_running()) {
            let _ = write!(out, " ({counter})");
        }
    }
    if let Some(due) = report.due.as_ref() {
        let suffix = match due.state {
            DueState::Overdue => " (overdue)",
            DueState::Today => " (today)",
            DueState::Upcoming | DueState::NoDate => "",
        };
        let _ = write!(out, "\nDue: {}{suffix}", due.label);
    }
    out
}

/// The three buckets separated by blank lines.
pub fn report(report: &TrackedTimeReport) -> String {
    report.buckets().iter().map(|bucket| bucket_text(bucket)).collect::<Vec<_>>().join("\n\n")
}

fn bucket_text(bucket: &TimeBucket) -> String {
    let mut out = bucket.header();
    match (bucket.status, bucket.target_ms) {
        (BucketStatus::BelowTarget, Some(target)) => {
            let _ = write!(out, " (target {})", format_duration(target));
        }
        (BucketStatus::OnTarget, _) => out.push_str(" (target met)"),
        _ => {}
    }
    for task in &bucket.tasks {
        let _ = write!(out, "\n  {}", task.label());
        if !task.tags.is_empty() {
            let _ = write!(out, " #{}", task.tags.join(" #"));
        }
    }
    out
}

/// Tracked intervals, grouped per user when several tracked.
pub fn time_sheet(sheet: &TaskTimeSheet) -> String {
    let mut out = format!("{}\n{}", sheet.tooltip, sheet.header);
    for row in &sheet.rows {
        match row {
            SheetRow::Interval(interval) => push_interval(&mut out, interval, 1),
            SheetRow::User { label, intervals } => {
                let _ = write!(out, "\n  {label}");
                for interval in intervals {
                    push_interval(&mut out, interval, 2);
                }
            }
        }
    }
    out
}

fn push_interval(out: &mut String, interval: &IntervalRow, depth: usize) {
    let _ = write!(out, "\n{}{}  [{}]", "  ".repeat(depth), interval.label, interval.tooltip);
}

/// `id  name` per team.
pub fn teams(teams: &[Team]) -> String {
    teams.iter().map(|team| format!("{}  {}", team.id, team.name)).collect::<Vec<_>>().join("\n")
}

/// Spaces with `[x]` marking the visible ones.
pub fn spaces(listing: &SpaceListing) -> String {
    listing
        .spaces
        .iter()
        .map(|space| {
            let mark = if listing.is_visible(&space.id) { 'x' } else { ' ' };
            format!("[{mark}] {}  {}", space.id, space.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Outcome of `filter-spaces`.
pub fn filter_saved(saved: bool) -> String {
    if saved {
        "Space filter saved".to_string()
    } else {
        "Nothing to filter: the team has a single space".to_string()
    }
}

/// `id  name (n lists)` per folder.
pub fn folders(folders: &[Folder]) -> String {
    folders
        .iter()
        .map(|folder| format!("{}  {} ({} lists)", folder.id, folder.name, folder.lists.len()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `id  name (tasks)` per list.
pub fn lists(lists: &[ListSummary]) -> String {
    lists.iter().map(|summary| format!("{}  {}", summary.list.id, summary.label())).collect::<Vec<_>>().join("\n")
}

/// One task per line, with its status when known.
pub fn tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No open tasks".to_string();
    }
    tasks
        .iter()
        .map(|task| match task.status.as_ref() {
            Some(status) => format!("{} ({})", task.label(), status.status),
            None => task.label(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tasks under the id of their list.
pub fn task_listing(listing: &TaskListing) -> String {
    format!("List {}\n{}", listing.list_id, tasks(&listing.tasks))
}

/// Masked token and where it comes from.
pub fn token_status(status: &TokenStatus) -> String {
    match (status.source, status.masked.as_deref()) {
        (TokenSource::Config, Some(masked)) => format!("{masked} (from configuration)"),
        (TokenSource::Stored, Some(masked)) => format!("{masked} (stored)"),
        _ => NO_TOKEN_MESSAGE.to_string(),
    }
}
