//! ClickUp v2 adapter for the core tracking and workspace ports

use std::sync::Arc;

use async_trait::async_trait;
use clicktick_core::tracking::{TaskDirectory, TimeEntryClient, WorkspaceDirectory};
use clicktick_domain::constants::MAX_TASK_PAGES;
use clicktick_domain::{
    ClickTickError, CreateTimeEntry, Folder, List, Result, Space, Task, Team, TimeEntry, TimeRange,
    Tracking, User,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::client::ApiClient;
use super::errors::ApiError;

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TeamsEnvelope {
    #[serde(default)]
    teams: Vec<Team>,
}

#[derive(Debug, Deserialize)]
struct SpacesEnvelope {
    #[serde(default)]
    spaces: Vec<Space>,
}

#[derive(Debug, Deserialize)]
struct FoldersEnvelope {
    #[serde(default)]
    folders: Vec<Folder>,
}

#[derive(Debug, Deserialize)]
struct ListsEnvelope {
    #[serde(default)]
    lists: Vec<List>,
}

/// Tasks are kept raw so one malformed task does not hide the rest.
#[derive(Debug, Deserialize)]
struct TasksEnvelope {
    #[serde(default)]
    tasks: Vec<Value>,
    #[serde(default)]
    last_page: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

/// Remote ports backed by the ClickUp REST API.
#[derive(Clone)]
pub struct ClickUpClient {
    api: Arc<ApiClient>,
}

impl ClickUpClient {
    /// Adapter over an authenticated client.
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

/// Ids are interpolated into the path, so anything beyond a plain token is
/// rejected before it reaches the wire.
fn path_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    let valid = !id.is_empty()
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(ClickTickError::InvalidInput(format!("invalid {kind} id: {id:?}")))
    }
}

/// The current-entry endpoint answers `null` or `{}` when nothing runs.
fn running_entry(data: Option<Value>) -> Result<Option<TimeEntry>> {
    match data {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// The stop reply is informational: a 2xx already confirms the stop, so a
/// body that is not a full entry yields `None` instead of an error.
fn stopped_entry(reply: Value) -> Option<TimeEntry> {
    let data = match reply {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Object(map)),
        other => other,
    };
    match serde_json::from_value(data) {
        Ok(entry) => Some(entry),
        Err(err) => {
            debug!(error = %err, "Stop reply carries no full time entry");
            None
        }
    }
}

/// Task lookups may come back as the task itself or wrapped in a
/// collection; the first element wins.
fn first_task(value: Value) -> Result<Option<Task>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => items.into_iter().next().map(serde_json::from_value).transpose().map_err(Into::into),
        Value::Object(mut map) => match map.remove("tasks") {
            Some(tasks) => first_task(tasks),
            None => Ok(Some(serde_json::from_value(Value::Object(map))?)),
        },
        other => Err(ClickTickError::Serialization(format!("unexpected task payload: {other}"))),
    }
}

fn decode_tasks(raw: Vec<Value>) -> Vec<Task> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<Task>(value) {
            Ok(task) => Some(task),
            Err(err) => {
                warn!(error = %err, "Skipping undecodable task");
                None
            }
        })
        .collect()
}

fn unarchived() -> Vec<(&'static str, String)> {
    vec![("archived", "false".to_string())]
}

#[async_trait]
impl TimeEntryClient for ClickUpClient {
    #[instrument(skip(self, entry), fields(task_id = %entry.tid))]
    async fn start_time_entry(&self, team_id: &str, entry: &CreateTimeEntry) -> Result<TimeEntry> {
        let path = format!("/team/{}/time_entries", path_id("team", team_id)?);
        let reply: DataEnvelope<TimeEntry> = self.api.post(&path, entry).await?;
        info!(entry_id = %reply.data.id, "Time entry started");
        Ok(reply.data)
    }

    #[instrument(skip(self))]
    async fn stop_time_entry(&self, team_id: &str) -> Result<Option<TimeEntry>> {
        let path = format!("/team/{}/time_entries/stop", path_id("team", team_id)?);
        let reply: Value = self.api.post_empty(&path).await?;
        let entry = stopped_entry(reply);
        match &entry {
            Some(entry) => info!(entry_id = %entry.id, duration = %entry.duration, "Time entry stopped"),
            None => info!("Time entry stopped"),
        }
        Ok(entry)
    }

    #[instrument(skip(self))]
    async fn get_running_time_entry(&self, team_id: &str) -> Result<Option<TimeEntry>> {
        let path = format!("/team/{}/time_entries/current", path_id("team", team_id)?);
        let reply: DataEnvelope<Option<Value>> = self.api.get(&path, &[]).await?;
        running_entry(reply.data)
    }

    #[instrument(skip(self))]
    async fn get_tracked_intervals(&self, task_id: &str) -> Result<Vec<Tracking>> {
        let path = format!("/task/{}/time", path_id("task", task_id)?);
        let reply: DataEnvelope<Vec<Tracking>> = self.api.get(&path, &[]).await?;
        debug!(users = reply.data.len(), "Fetched tracked intervals");
        Ok(reply.data)
    }

    #[instrument(skip(self), fields(start = range.start_date, end = range.end_date))]
    async fn get_time_entries(&self, team_id: &str, range: TimeRange) -> Result<Vec<TimeEntry>> {
        let path = format!("/team/{}/time_entries", path_id("team", team_id)?);
        let query = [
            ("start_date", range.start_date.to_string()),
            ("end_date", range.end_date.to_string()),
        ];
        let reply: DataEnvelope<Vec<TimeEntry>> = self.api.get(&path, &query).await?;
        debug!(count = reply.data.len(), "Fetched time entries");
        Ok(reply.data)
    }
}

#[async_trait]
impl TaskDirectory for ClickUpClient {
    #[instrument(skip(self))]
    async fn get_task_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        let path = format!("/task/{}", path_id("task", task_id)?);
        match self.api.get::<Value>(&path, &[]).await {
            Ok(value) => first_task(value),
            Err(ApiError::NotFound(message)) => {
                debug!(%message, "Task not found");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl WorkspaceDirectory for ClickUpClient {
    #[instrument(skip(self))]
    async fn get_teams(&self) -> Result<Vec<Team>> {
        let reply: TeamsEnvelope = self.api.get("/team", &[]).await?;
        Ok(reply.teams)
    }

    #[instrument(skip(self))]
    async fn get_spaces(&self, team_id: &str) -> Result<Vec<Space>> {
        let path = format!("/team/{}/space", path_id("team", team_id)?);
        let reply: SpacesEnvelope = self.api.get(&path, &unarchived()).await?;
        Ok(reply.spaces)
    }

    #[instrument(skip(self))]
    async fn get_folders(&self, space_id: &str) -> Result<Vec<Folder>> {
        let path = format!("/space/{}/folder", path_id("space", space_id)?);
        let reply: FoldersEnvelope = self.api.get(&path, &unarchived()).await?;
        Ok(reply.folders)
    }

    #[instrument(skip(self))]
    async fn get_folderless_lists(&self, space_id: &str) -> Result<Vec<List>> {
        let path = format!("/space/{}/list", path_id("space", space_id)?);
        let reply: ListsEnvelope = self.api.get(&path, &unarchived()).await?;
        Ok(reply.lists)
    }

    #[instrument(skip(self))]
    async fn get_lists(&self, folder_id: &str) -> Result<Vec<List>> {
        let path = format!("/folder/{}/list", path_id("folder", folder_id)?);
        let reply: ListsEnvelope = self.api.get(&path, &unarchived()).await?;
        Ok(reply.lists)
    }

    /// Open tasks and subtasks of a list, following pages until the service
    /// reports the last one.
    #[instrument(skip(self))]
    async fn get_tasks(&self, list_id: &str) -> Result<Vec<Task>> {
        let path = format!("/list/{}/task", path_id("list", list_id)?);
        let mut tasks = Vec::new();

        for page in 0..MAX_TASK_PAGES {
            let mut query = unarchived();
            query.push(("subtasks", "true".to_string()));
            query.push(("page", page.to_string()));

            let reply: TasksEnvelope = self.api.get(&path, &query).await?;
            let fetched = reply.tasks.len();
            tasks.extend(decode_tasks(reply.tasks));

            if fetched == 0 || reply.last_page.unwrap_or(true) {
                return Ok(tasks);
            }
        }

        warn!(list_id, pages = MAX_TASK_PAGES, "Task listing truncated");
        Ok(tasks)
    }

    #[instrument(skip(self))]
    async fn get_authorized_user(&self) -> Result<User> {
        let reply: UserEnvelope = self.api.get("/user", &[]).await?;
        Ok(reply.user)
    }

    #[instrument(skip(self))]
    async fn get_my_tasks(&self, team_id: &str, user_id: i64, space_ids: &[String]) -> Result<Vec<Task>> {
        let path = format!("/team/{}/task", path_id("team", team_id)?);
        let mut query = vec![
            ("assignees[]", user_id.to_string()),
            ("subtasks", "true".to_string()),
            ("include_closed", "false".to_string()),
        ];
        for space_id in space_ids {
            query.push(("space_ids[]", path_id("space", space_id)?.to_string()));
        }

        let reply: TasksEnvelope = self.api.get(&path, &query).await?;
        Ok(decode_tasks(reply.tasks))
    }
}
