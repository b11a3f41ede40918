//! Application context - dependency injection container

use std::sync::Arc;

use clicktick_common::time::{Clock, SystemClock};
use clicktick_core::reporting::TrackedTimeAggregator;
use clicktick_core::selection::{SelectionDeps, TaskSelectionController};
use clicktick_core::storage_ports::KeyValueStore;
use clicktick_core::surface_ports::StatusSurface;
use clicktick_core::tracking::{TaskDirectory, TimeEntryClient, TimerSettings, WorkspaceDirectory};
use clicktick_core::workspace::WorkspaceCatalog;
use clicktick_domain::{ClickTickError, Config, Result, Task};
use clicktick_infra::api::{ApiClient, ApiClientConfig, ClickUpClient, TokenManager};
use clicktick_infra::storage::{JsonFileStore, MemoryStore};
use tracing::{debug, info};

use crate::surface::TerminalSurface;

/// Remote and storage adapters the context is assembled from.
#[derive(Clone)]
pub struct AppPorts {
    /// Time entry endpoints.
    pub time_entries: Arc<dyn TimeEntryClient>,
    /// Task lookups.
    pub tasks: Arc<dyn TaskDirectory>,
    /// Teams, spaces, folders, lists and tasks.
    pub workspace: Arc<dyn WorkspaceDirectory>,
    /// Persistent state.
    pub store: Arc<dyn KeyValueStore>,
    /// API token source.
    pub tokens: Arc<TokenManager>,
}

impl AppPorts {
    /// ClickUp over HTTP and the state store named in `config`: the JSON
    /// file, or process memory when `storage.in_memory` is set.
    ///
    /// # Errors
    /// `Config` when the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if config.storage.in_memory {
            debug!("Using in-memory state store");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(JsonFileStore::new(&config.storage.path))
        };
        let tokens = Arc::new(TokenManager::new(config.api.token.clone(), Arc::clone(&store)));

        let api = ApiClient::new(ApiClientConfig::from(&config.api), tokens.clone())?;
        let clickup = Arc::new(ClickUpClient::new(Arc::new(api)));

        Ok(Self { time_entries: clickup.clone(), tasks: clickup.clone(), workspace: clickup, store, tokens })
    }
}

/// Application context - holds all services and dependencies
pub struct AppContext {
    /// Effective configuration.
    pub config: Config,
    /// Timer settings derived from `config`.
    pub settings: TimerSettings,
    /// Terminal the timer is drawn on.
    pub surface: Arc<TerminalSurface>,
    /// Persistent state.
    pub store: Arc<dyn KeyValueStore>,
    /// Time entry endpoints.
    pub time_entries: Arc<dyn TimeEntryClient>,
    /// Task lookups.
    pub tasks: Arc<dyn TaskDirectory>,
    /// Selected task and its timer.
    pub controller: Arc<TaskSelectionController>,
    /// Tracked time reports.
    pub aggregator: Arc<TrackedTimeAggregator>,
    /// Workspace navigation.
    pub catalog: Arc<WorkspaceCatalog>,
    /// Stored and configured API token.
    pub tokens: Arc<TokenManager>,
}

impl AppContext {
    /// Production wiring: ClickUp, the state file, stdout and the system clock.
    ///
    /// # Errors
    /// See [`AppPorts::from_config`].
    pub fn new(config: Config) -> Result<Self> {
        let ports = AppPorts::from_config(&config)?;
        Ok(Self::with_ports(config, ports, Arc::new(TerminalSurface::stdout()), Arc::new(SystemClock)))
    }

    /// Wire the context over explicit ports, used by tests.
    pub fn with_ports(
        config: Config,
        ports: AppPorts,
        surface: Arc<TerminalSurface>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let settings = TimerSettings::from(&config.timer);
        let status: Arc<dyn StatusSurface> = surface.clone();

        let controller = Arc::new(TaskSelectionController::new(SelectionDeps {
            time_entries: Arc::clone(&ports.time_entries),
            tasks: Arc::clone(&ports.tasks),
            store: Arc::clone(&ports.store),
            surface: status,
            clock,
            settings,
        }));
        let aggregator = Arc::new(TrackedTimeAggregator::new(
            Arc::clone(&ports.time_entries),
            config.reporting.clone(),
            settings.request_timeout,
        ));
        let catalog = Arc::new(WorkspaceCatalog::new(ports.workspace, Arc::clone(&ports.store)));

        info!(
            storage = %config.storage.path,
            in_memory = config.storage.in_memory,
            "Application context ready"
        );

        Self {
            config,
            settings,
            surface,
            store: ports.store,
            time_entries: ports.time_entries,
            tasks: ports.tasks,
            controller,
            aggregator,
            catalog,
            tokens: ports.tokens,
        }
    }

    /// Restore the persisted selection, resuming a running entry if the
    /// server has one.
    ///
    /// # Errors
    /// See [`TaskSelectionController::init_selected_task`].
    pub async fn restore_selection(&self) -> Result<Option<Task>> {
        self.controller.init_selected_task().await
    }

    /// The selected task, or `InvalidState` when there is none.
    ///
    /// # Errors
    /// `InvalidState` without a selection.
    pub fn require_selection(&self) -> Result<Task> {
        self.controller.selected_task().ok_or_else(|| {
            ClickTickError::InvalidState(clicktick_domain::constants::NO_TASK_SELECTED_MESSAGE.into())
        })
    }

    /// Team scoping a command: explicit, then the selected task's, then the
    /// first team of the account.
    ///
    /// # Errors
    /// Propagates team lookup failures.
    pub async fn resolve_team(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(team_id) = explicit.filter(|id| !id.is_empty()) {
            return Ok(team_id.to_string());
        }
        if let Some(task) = self.controller.selected_task() {
            return Ok(task.team_id);
        }
        Ok(self.catalog.default_team().await?.id)
    }

    /// Release the active timer. A running remote entry keeps running.
    pub fn shutdown(&self) {
        if let Some(timer) = self.controller.active_timer() {
            timer.destroy();
        }
        debug!("Application context shut down");
    }
}
