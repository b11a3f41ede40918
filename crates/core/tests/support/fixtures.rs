//! Domain fixtures

use clicktick_domain::{EntryTask, Interval, List, Task, TimeEntry, Tracking, User};
use serde_json::json;

pub const TEAM_ID: &str = "9001";
/// 2023-11-14T22:13:20Z
pub const NOW_MS: i64 = 1_700_000_000_000;

pub fn task(id: &str, name: &str) -> Task {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "team_id": TEAM_ID,
        "url": format!("https://app.clickup.com/t/{id}"),
        "status": {"status": "in progress"}
    }))
    .unwrap()
}

/// A list as ClickUp returns it; `task_count` is omitted when `None`.
pub fn list(id: &str, name: &str, task_count: Option<u64>) -> List {
    let mut raw = json!({"id": id, "name": name});
    if let Some(count) = task_count {
        raw["task_count"] = json!(count);
    }
    serde_json::from_value(raw).unwrap()
}

pub fn closed_interval(id: &str, start: i64, duration: i64) -> Interval {
    Interval {
        id: id.into(),
        start: start.to_string(),
        end: Some((start + duration).to_string()),
        time: duration.to_string(),
        source: None,
        date_added: None,
        description: None,
    }
}

/// One user's history made of the given closed durations.
pub fn history(durations: &[i64]) -> Vec<Tracking> {
    let intervals: Vec<Interval> = durations
        .iter()
        .enumerate()
        .map(|(i, duration)| closed_interval(&format!("i{i}"), NOW_MS - 86_400_000, *duration))
        .collect();
    vec![Tracking {
        time: durations.iter().sum(),
        intervals,
        user: Some(User { id: 7, username: Some("dana".into()), ..User::default() }),
    }]
}

pub fn running_entry(task_id: &str, start_ms: i64) -> TimeEntry {
    TimeEntry {
        id: format!("te-{task_id}"),
        task: Some(EntryTask {
            id: task_id.into(),
            name: "running".into(),
            custom_id: None,
            status: None,
        }),
        wid: Some(TEAM_ID.into()),
        user: None,
        billable: false,
        start: start_ms.to_string(),
        end: None,
        duration: "-1".into(),
        description: None,
        tags: Vec::new(),
        source: None,
        at: None,
        task_location: None,
        task_url: None,
    }
}

pub fn closed_entry(id: &str, task_id: &str, start_ms: i64, duration: i64) -> TimeEntry {
    TimeEntry {
        id: id.into(),
        end: Some((start_ms + duration).to_string()),
        duration: duration.to_string(),
        ..running_entry(task_id, start_ms)
    }
}
