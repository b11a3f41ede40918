//! Recording mocks for the core ports

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use clicktick_core::storage_ports::KeyValueStore;
use clicktick_core::surface_ports::{NoticeLevel, StatusSurface};
use clicktick_core::tracking::{TaskDirectory, TimeEntryClient, TimerDisplay, WorkspaceDirectory};
use clicktick_domain::{
    ClickTickError, CreateTimeEntry, Folder, List, Result, Space, Task, Team, TimeEntry, TimeRange,
    Tracking, User,
};
use parking_lot::Mutex;
use serde_json::Value;

use super::fixtures::running_entry;

/// A call received by [`MockTimeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Start { team_id: String, body: CreateTimeEntry },
    Stop { team_id: String },
    Running { team_id: String },
    Intervals { task_id: String },
    Entries { team_id: String, range: TimeRange },
}

/// Scriptable `TimeEntryClient`.
#[derive(Default)]
pub struct MockTimeClient {
    calls: Mutex<Vec<ClientCall>>,
    running: Mutex<Option<TimeEntry>>,
    trackings: Mutex<HashMap<String, Vec<Tracking>>>,
    entries: Mutex<Vec<TimeEntry>>,
    start_error: Mutex<Option<ClickTickError>>,
    stop_error: Mutex<Option<ClickTickError>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTimeClient {
    pub fn with_running(self, entry: TimeEntry) -> Self {
        *self.running.lock() = Some(entry);
        self
    }

    pub fn with_trackings(self, task_id: &str, trackings: Vec<Tracking>) -> Self {
        self.trackings.lock().insert(task_id.to_string(), trackings);
        self
    }

    pub fn with_entries(self, entries: Vec<TimeEntry>) -> Self {
        *self.entries.lock() = entries;
        self
    }

    pub fn fail_start(&self, error: ClickTickError) {
        *self.start_error.lock() = Some(error);
    }

    pub fn fail_stop(&self, error: ClickTickError) {
        *self.stop_error.lock() = Some(error);
    }

    pub fn recover(&self) {
        *self.start_error.lock() = None;
        *self.stop_error.lock() = None;
    }

    /// Delay every response by `delay` (tokio time).
    pub fn delay_responses(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().clone()
    }

    pub fn start_calls(&self) -> usize {
        self.count(|call| matches!(call, ClientCall::Start { .. }))
    }

    pub fn stop_calls(&self) -> usize {
        self.count(|call| matches!(call, ClientCall::Stop { .. }))
    }

    fn count(&self, predicate: impl Fn(&ClientCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    async fn record(&self, call: ClientCall) {
        self.calls.lock().push(call);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TimeEntryClient for MockTimeClient {
    async fn start_time_entry(&self, team_id: &str, entry: &CreateTimeEntry) -> Result<TimeEntry> {
        self.record(ClientCall::Start { team_id: team_id.into(), body: entry.clone() }).await;
        if let Some(error) = self.start_error.lock().clone() {
            return Err(error);
        }
        let started = running_entry(&entry.tid, entry.start);
        *self.running.lock() = Some(started.clone());
        Ok(started)
    }

    async fn stop_time_entry(&self, team_id: &str) -> Result<Option<TimeEntry>> {
        self.record(ClientCall::Stop { team_id: team_id.into() }).await;
        if let Some(error) = self.stop_error.lock().clone() {
            return Err(error);
        }
        Ok(self.running.lock().take())
    }

    async fn get_running_time_entry(&self, team_id: &str) -> Result<Option<TimeEntry>> {
        self.record(ClientCall::Running { team_id: team_id.into() }).await;
        Ok(self.running.lock().clone())
    }

    async fn get_tracked_intervals(&self, task_id: &str) -> Result<Vec<Tracking>> {
        self.record(ClientCall::Intervals { task_id: task_id.into() }).await;
        Ok(self.trackings.lock().get(task_id).cloned().unwrap_or_default())
    }

    async fn get_time_entries(&self, team_id: &str, range: TimeRange) -> Result<Vec<TimeEntry>> {
        self.record(ClientCall::Entries { team_id: team_id.into(), range }).await;
        Ok(self.entries.lock().clone())
    }
}

/// `TaskDirectory` backed by a fixed task list.
#[derive(Default)]
pub struct MockTaskDirectory {
    tasks: Mutex<HashMap<String, Task>>,
    lookups: Mutex<Vec<String>>,
}

impl MockTaskDirectory {
    pub fn with_task(self, task: Task) -> Self {
        self.tasks.lock().insert(task.id.clone(), task);
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl TaskDirectory for MockTaskDirectory {
    async fn get_task_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        self.lookups.lock().push(task_id.to_string());
        Ok(self.tasks.lock().get(task_id).cloned())
    }
}

/// `WorkspaceDirectory` counting its fetches.
#[derive(Default)]
pub struct MockWorkspaceDirectory {
    pub teams: Vec<Team>,
    pub spaces: HashMap<String, Vec<Space>>,
    pub folders: HashMap<String, Vec<Folder>>,
    pub space_lists: HashMap<String, Vec<List>>,
    pub folder_lists: HashMap<String, Vec<List>>,
    pub tasks: HashMap<String, Vec<Task>>,
    pub user: User,
    pub my_tasks: Vec<Task>,
    my_task_queries: Mutex<Vec<(String, i64, Vec<String>)>>,
    fetches: Mutex<usize>,
}

impl MockWorkspaceDirectory {
    pub fn new(teams: Vec<Team>, spaces: HashMap<String, Vec<Space>>) -> Self {
        Self { teams, spaces, ..Self::default() }
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock()
    }

    /// `(team_id, user_id, space_ids)` of every my-tasks query.
    pub fn my_task_queries(&self) -> Vec<(String, i64, Vec<String>)> {
        self.my_task_queries.lock().clone()
    }

    fn fetched(&self) {
        *self.fetches.lock() += 1;
    }
}

#[async_trait]
impl WorkspaceDirectory for MockWorkspaceDirectory {
    async fn get_teams(&self) -> Result<Vec<Team>> {
        self.fetched();
        Ok(self.teams.clone())
    }

    async fn get_spaces(&self, team_id: &str) -> Result<Vec<Space>> {
        self.fetched();
        Ok(self.spaces.get(team_id).cloned().unwrap_or_default())
    }

    async fn get_folders(&self, space_id: &str) -> Result<Vec<Folder>> {
        self.fetched();
        Ok(self.folders.get(space_id).cloned().unwrap_or_default())
    }

    async fn get_folderless_lists(&self, space_id: &str) -> Result<Vec<List>> {
        self.fetched();
        Ok(self.space_lists.get(space_id).cloned().unwrap_or_default())
    }

    async fn get_lists(&self, folder_id: &str) -> Result<Vec<List>> {
        self.fetched();
        Ok(self.folder_lists.get(folder_id).cloned().unwrap_or_default())
    }

    async fn get_tasks(&self, list_id: &str) -> Result<Vec<Task>> {
        self.fetched();
        self.tasks
            .get(list_id)
            .cloned()
            .ok_or_else(|| ClickTickError::NotFound(format!("list {list_id}")))
    }

    async fn get_authorized_user(&self) -> Result<User> {
        self.fetched();
        Ok(self.user.clone())
    }

    async fn get_my_tasks(&self, team_id: &str, user_id: i64, space_ids: &[String]) -> Result<Vec<Task>> {
        self.fetched();
        self.my_task_queries.lock().push((team_id.to_string(), user_id, space_ids.to_vec()));
        Ok(self.my_tasks.clone())
    }
}

/// `KeyValueStore` over a plain map.
#[derive(Default)]
pub struct MapStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MapStore {
    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.values.lock().insert(key.to_string(), value);
    }
}

#[async_trait]
impl KeyValueStore for MapStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    ShowTimer(TimerDisplay),
    HideTimer,
    ShowTask(String),
    HideTask,
    Notify(NoticeLevel, String),
}

/// `StatusSurface` recording every call.
#[derive(Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    pub fn last_timer(&self) -> Option<TimerDisplay> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            SurfaceCall::ShowTimer(display) => Some(display.clone()),
            _ => None,
        })
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Notify(level, message) => Some((*level, message.clone())),
                _ => None,
            })
            .collect()
    }
}

impl StatusSurface for RecordingSurface {
    fn show_timer(&self, display: &TimerDisplay) {
        self.calls.lock().push(SurfaceCall::ShowTimer(display.clone()));
    }

    fn hide_timer(&self) {
        self.calls.lock().push(SurfaceCall::HideTimer);
    }

    fn show_task(&self, text: &str, _tooltip: &str) {
        self.calls.lock().push(SurfaceCall::ShowTask(text.to_string()));
    }

    fn hide_task(&self) {
        self.calls.lock().push(SurfaceCall::HideTask);
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        self.calls.lock().push(SurfaceCall::Notify(level, message.to_string()));
    }
}
