//! Task selection controller
//!
//! Owns the single active [`TaskTimer`]. Selecting a task persists it,
//! destroys the previous timer, binds a new one and reconciles it with the
//! server's running entry. Forgetting a task tears the timer down without
//! touching the remote entry.

use std::future::Future;
use std::sync::Arc;

use clicktick_common::time::Clock;
use clicktick_domain::constants::TASK_FORGOTTEN_MESSAGE;
use clicktick_domain::{ClickTickError, Result, Task, TaskRecord, Tracking};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::store::SelectedTaskStore;
use crate::storage_ports::KeyValueStore;
use crate::surface_ports::{NoticeLevel, StatusSurface};
use crate::tracking::events::{self, TimerEventReceiver, TimerEventSender};
use crate::tracking::{TaskDirectory, TaskTimer, TimeEntryClient, TimerDeps, TimerSettings, TimerState};

/// Where a selection request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// The user picked the task; tracking starts right away.
    User,
    /// Startup restore of the persisted selection; tracking only resumes if
    /// the server has the entry running.
    StorageRestore,
}

/// Collaborators of the controller.
#[derive(Clone)]
pub struct SelectionDeps {
    /// Time entry endpoints.
    pub time_entries: Arc<dyn TimeEntryClient>,
    /// Task lookups for partial selections.
    pub tasks: Arc<dyn TaskDirectory>,
    /// Where the selection is persisted.
    pub store: Arc<dyn KeyValueStore>,
    /// Where notices and the timer are shown.
    pub surface: Arc<dyn StatusSurface>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Settings handed to every timer.
    pub settings: TimerSettings,
}

/// Owns the selected task and its timer.
///
/// Selections are serialized; at most one timer is active at a time.
pub struct TaskSelectionController {
    deps: SelectionDeps,
    selection_store: SelectedTaskStore,
    events: TimerEventSender,
    selected: RwLock<Option<Task>>,
    active: Mutex<Option<Arc<TaskTimer>>>,
    // Serializes select/forget sequences.
    selection_lock: tokio::sync::Mutex<()>,
}

impl TaskSelectionController {
    /// Controller with nothing selected.
    pub fn new(deps: SelectionDeps) -> Self {
        let (events, _) = events::channel();
        Self {
            selection_store: SelectedTaskStore::new(Arc::clone(&deps.store)),
            deps,
            events,
            selected: RwLock::new(None),
            active: Mutex::new(None),
            selection_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Receive lifecycle events of every timer this controller creates.
    pub fn subscribe(&self) -> TimerEventReceiver {
        self.events.subscribe()
    }

    /// Make `record` the selected task and bind a fresh timer to it.
    ///
    /// Partial records are re-fetched first. The resolved task is persisted,
    /// the previous timer destroyed, and the new timer restored from the
    /// server's running entry when it belongs to this task. User selections
    /// then start tracking; a start on a restored timer is a no-op.
    ///
    /// # Errors
    /// Fails only when a partial record cannot be resolved. Storage and
    /// remote timer failures are logged and surfaced, not returned.
    #[instrument(skip_all, fields(task_id = %record.id(), origin = ?origin))]
    pub async fn select_task(
        &self,
        record: TaskRecord,
        history: Vec<Tracking>,
        origin: SelectionOrigin,
    ) -> Result<Task> {
        let _selection = self.selection_lock.lock().await;

        let task = self.resolve(record).await?;

        if let Err(err) = self.selection_store.save(&task).await {
            warn!(error = %err, "Failed to persist selected task");
        }
        *self.selected.write() = Some(task.clone());

        if let Some(previous) = self.active.lock().take() {
            previous.destroy();
        }

        let timer = Arc::new(TaskTimer::new(task.clone(), &history, self.timer_deps()));
        self.deps.surface.show_task(&task.label(), &task_tooltip(&task));
        *self.active.lock() = Some(Arc::clone(&timer));

        self.restore_running(&timer, &task).await;

        if origin == SelectionOrigin::User {
            // Failures were already reported by the timer.
            if let Err(err) = timer.start().await {
                debug!(error = %err, "Timer did not start after selection");
            }
        }

        info!(task_id = %task.id, state = ?timer.state(), "Task selected");
        Ok(task)
    }

    /// Restore the persisted selection, if any, without starting tracking.
    ///
    /// # Errors
    /// Propagates storage read failures and unresolvable partial records.
    pub async fn init_selected_task(&self) -> Result<Option<Task>> {
        let Some(record) = self.selection_store.load().await? else {
            debug!("No persisted task selection");
            return Ok(None);
        };

        let history = match self
            .remote(self.deps.time_entries.get_tracked_intervals(record.id()))
            .await
        {
            Ok(history) => history,
            Err(err) => {
                warn!(task_id = %record.id(), error = %err, "Tracked history unavailable");
                Vec::new()
            }
        };

        self.select_task(record, history, SelectionOrigin::StorageRestore).await.map(Some)
    }

    /// Drop the selection. The remote running entry, if any, keeps running.
    ///
    /// # Errors
    /// Propagates failures clearing the persisted records.
    pub async fn forget_task(&self, show_message: bool) -> Result<()> {
        let _selection = self.selection_lock.lock().await;

        if let Some(timer) = self.active.lock().take() {
            timer.destroy();
        }
        *self.selected.write() = None;
        self.deps.surface.hide_task();

        self.selection_store.clear().await?;

        if show_message {
            self.deps.surface.notify(NoticeLevel::Info, TASK_FORGOTTEN_MESSAGE);
        }
        info!("Task selection forgotten");
        Ok(())
    }

    /// Start the active timer; `None` when no task is selected.
    ///
    /// # Errors
    /// See [`TaskTimer::start`].
    pub async fn start_timer(&self) -> Result<Option<TimerState>> {
        match self.active_timer() {
            Some(timer) => timer.start().await.map(Some),
            None => Ok(None),
        }
    }

    /// Stop the active timer; `None` when no task is selected.
    ///
    /// # Errors
    /// See [`TaskTimer::stop`].
    pub async fn stop_timer(&self) -> Result<Option<TimerState>> {
        match self.active_timer() {
            Some(timer) => timer.stop().await.map(Some),
            None => Ok(None),
        }
    }

    /// Persist the list the user last browsed.
    ///
    /// # Errors
    /// Propagates storage write failures.
    pub async fn remember_list(&self, list_id: &str) -> Result<()> {
        self.selection_store.remember_list(list_id).await
    }

    /// The list remembered by [`remember_list`](Self::remember_list).
    ///
    /// # Errors
    /// Propagates storage read failures.
    pub async fn remembered_list(&self) -> Result<Option<String>> {
        self.selection_store.list_id().await
    }

    /// The task currently bound to the timer.
    pub fn selected_task(&self) -> Option<Task> {
        self.selected.read().clone()
    }

    /// The timer of the selected task, if one has been built.
    pub fn active_timer(&self) -> Option<Arc<TaskTimer>> {
        self.active.lock().clone()
    }

    /// Shorthand for the active timer's state.
    pub fn timer_state(&self) -> Option<TimerState> {
        self.active_timer().map(|timer| timer.state())
    }

    async fn resolve(&self, record: TaskRecord) -> Result<Task> {
        match record {
            TaskRecord::Full(task) => Ok(*task),
            TaskRecord::Partial(reference) => {
                debug!(task_id = %reference.id, "Re-fetching partial task");
                match self.remote(self.deps.tasks.get_task_by_id(&reference.id)).await {
                    Ok(Some(task)) => Ok(task),
                    Ok(None) => {
                        let err = ClickTickError::NotFound(format!("task {}", reference.id));
                        self.report(&err);
                        Err(err)
                    }
                    Err(err) => {
                        self.report(&err);
                        Err(err)
                    }
                }
            }
        }
    }

    async fn restore_running(&self, timer: &TaskTimer, task: &Task) {
        let running = match self
            .remote(self.deps.time_entries.get_running_time_entry(&task.team_id))
            .await
        {
            Ok(running) => running,
            Err(err) => {
                warn!(team_id = %task.team_id, error = %err, "Running entry lookup failed");
                return;
            }
        };

        let Some(entry) = running.filter(|entry| entry.is_running()) else {
            return;
        };
        if entry.task_id() != Some(task.id.as_str()) {
            debug!(
                running_task = entry.task_id().unwrap_or("none"),
                "Running entry belongs to another task"
            );
            return;
        }
        let Some(start_ms) = entry.start_ms() else {
            warn!(entry_id = %entry.id, start = %entry.start, "Running entry has no usable start");
            return;
        };

        if let Err(err) = timer.restore(start_ms) {
            warn!(error = %err, "Could not restore timer");
        }
    }

    async fn remote<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = self.deps.settings.request_timeout;
        tokio::time::timeout(limit, call).await.map_err(|_| ClickTickError::Timeout(limit))?
    }

    fn report(&self, err: &ClickTickError) {
        warn!(error_kind = err.label(), error = %err, "Task selection failed");
        self.deps.surface.notify(NoticeLevel::Error, &format!("Could not select task: {err}"));
    }

    fn timer_deps(&self) -> TimerDeps {
        TimerDeps {
            client: Arc::clone(&self.deps.time_entries),
            surface: Arc::clone(&self.deps.surface),
            clock: Arc::clone(&self.deps.clock),
            events: self.events.clone(),
            settings: self.deps.settings,
        }
    }
}

fn task_tooltip(task: &Task) -> String {
    match task.status.as_ref() {
        Some(status) => format!("{} ({})", task.name, status.status),
        None => task.name.clone(),
    }
}
