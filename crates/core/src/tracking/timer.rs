//! Task timer state machine
//!
//! A [`TaskTimer`] is bound to one task for its whole life. It mirrors the
//! server's running time entry: `start` and `stop` go through the
//! [`TimeEntryClient`] first and only touch local state once the remote call
//! succeeded, `restore` resumes counting from an entry the server already
//! has open.
//!
//! ```text
//!            start() ok                 stop() ok
//!   Idle ───────────────▶ Running ───────────────▶ Idle
//!     │   restore(t)         │
//!     └──────────────────────┘
//!   any ── destroy() ──▶ Stopped (terminal)
//! ```
//!
//! Remote failures leave the state untouched: a failed start stays `Idle`,
//! a failed stop keeps ticking.

use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use clicktick_common::time::{spawn_ticker, Clock, TickerHandle};
use clicktick_domain::config::TimerConfig;
use clicktick_domain::{total_tracked_ms, ClickTickError, CreateTimeEntry, Result, Task, Tracking};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::display::{counter_text, TimerDisplay};
use super::events::{TimerAction, TimerEvent, TimerEventSender};
use super::ports::TimeEntryClient;
use crate::surface_ports::{NoticeLevel, StatusSurface};

/// Lifecycle of a [`TaskTimer`].
///
/// `Idle` and `Running` alternate; `Stopped` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Shows the tracked total; no remote entry is open.
    Idle,
    /// A remote entry is open and the counter ticks.
    Running,
    /// Released; the timer is no longer usable.
    Stopped,
}

/// Tunables for a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    /// Period of the display tick.
    pub tick_interval: Duration,
    /// Bound on each remote call.
    pub request_timeout: Duration,
    /// Mark started entries billable.
    pub billable: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::from(&TimerConfig::default())
    }
}

impl From<&TimerConfig> for TimerSettings {
    fn from(config: &TimerConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            request_timeout: config.request_timeout(),
            billable: config.billable,
        }
    }
}

/// Collaborators shared by every timer a controller creates.
#[derive(Clone)]
pub struct TimerDeps {
    /// Time entry endpoints.
    pub client: Arc<dyn TimeEntryClient>,
    /// Where the display is pushed.
    pub surface: Arc<dyn StatusSurface>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Lifecycle events are broadcast here.
    pub events: TimerEventSender,
    /// Tick and timeout settings.
    pub settings: TimerSettings,
}

struct TimerInner {
    state: TimerState,
    start_ms: Option<i64>,
    elapsed_ms: i64,
    ticks: u64,
    seed_ms: i64,
    display: TimerDisplay,
    ticker: Option<TickerHandle>,
}

impl TimerInner {
    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

/// Live timer for one task.
pub struct TaskTimer {
    task: Task,
    label: String,
    deps: TimerDeps,
    inner: Arc<Mutex<TimerInner>>,
    // Serializes start/stop so their remote calls never interleave.
    op_lock: tokio::sync::Mutex<()>,
}

impl TaskTimer {
    /// Bind a timer to `task`, seeded with its prior tracked history.
    ///
    /// The idle display is shown immediately.
    pub fn new(task: Task, history: &[Tracking], deps: TimerDeps) -> Self {
        let label = task.label();
        let seed_ms = total_tracked_ms(history);
        let display = TimerDisplay::idle(seed_ms, &label);
        deps.surface.show_timer(&display);

        debug!(task_id = %task.id, seed_ms, "Timer created");
        let _ = deps.events.send(TimerEvent::Created { task_id: task.id.clone(), seed_ms });

        Self {
            task,
            label,
            deps,
            inner: Arc::new(Mutex::new(TimerInner {
                state: TimerState::Idle,
                start_ms: None,
                elapsed_ms: 0,
                ticks: 0,
                seed_ms,
                display,
                ticker: None,
            })),
            op_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Open a remote entry and start counting.
    ///
    /// A no-op while already running.
    ///
    /// # Errors
    /// `InvalidState` once destroyed; the remote failure (or `Timeout`) when
    /// the service rejects the start, in which case the timer stays idle.
    pub async fn start(&self) -> Result<TimerState> {
        let _op = self.op_lock.lock().await;

        match self.state() {
            TimerState::Stopped => return Err(self.destroyed_error()),
            TimerState::Running => {
                debug!(task_id = %self.task.id, "Start ignored, timer already running");
                return Ok(TimerState::Running);
            }
            TimerState::Idle => {}
        }

        let now = self.deps.clock.millis_since_epoch();
        let body = CreateTimeEntry::running(&self.task.id, now, self.deps.settings.billable);

        let entry = match self
            .remote(self.deps.client.start_time_entry(&self.task.team_id, &body))
            .await
        {
            Ok(entry) => entry,
            Err(err) => {
                self.report_failure(TimerAction::Start, &err);
                return Err(err);
            }
        };

        let mut inner = self.inner.lock();
        if inner.state == TimerState::Stopped {
            warn!(
                task_id = %self.task.id,
                entry_id = %entry.id,
                "Timer destroyed while starting, remote entry left running"
            );
            return Ok(TimerState::Stopped);
        }

        self.begin_count(&mut inner, now);
        drop(inner);

        info!(task_id = %self.task.id, entry_id = %entry.id, "Timer started");
        self.emit(TimerEvent::Started { task_id: self.task.id.clone(), start_ms: now });
        Ok(TimerState::Running)
    }

    /// Close the remote entry and return to idle.
    ///
    /// A no-op while idle. On failure the timer keeps running.
    ///
    /// # Errors
    /// `InvalidState` once destroyed; the remote failure (or `Timeout`).
    pub async fn stop(&self) -> Result<TimerState> {
        let _op = self.op_lock.lock().await;

        match self.state() {
            TimerState::Stopped => return Err(self.destroyed_error()),
            TimerState::Idle => {
                debug!(task_id = %self.task.id, "Stop ignored, timer not running");
                return Ok(TimerState::Idle);
            }
            TimerState::Running => {}
        }

        if let Err(err) = self.remote(self.deps.client.stop_time_entry(&self.task.team_id)).await {
            self.report_failure(TimerAction::Stop, &err);
            return Err(err);
        }

        let now = self.deps.clock.millis_since_epoch();
        let mut inner = self.inner.lock();
        if inner.state != TimerState::Running {
            return Ok(inner.state);
        }

        inner.cancel_ticker();
        let elapsed_ms = inner.start_ms.map_or(0, |start| now.saturating_sub(start).max(0));
        inner.seed_ms = inner.seed_ms.saturating_add(elapsed_ms);
        inner.elapsed_ms = 0;
        inner.start_ms = None;
        inner.state = TimerState::Idle;
        inner.display = TimerDisplay::idle(inner.seed_ms, &self.label);
        self.deps.surface.show_timer(&inner.display);
        drop(inner);

        info!(task_id = %self.task.id, elapsed_ms, "Timer stopped");
        self.emit(TimerEvent::Stopped { task_id: self.task.id.clone(), elapsed_ms });
        Ok(TimerState::Idle)
    }

    /// Resume counting from an entry the server already has open.
    ///
    /// Never calls the remote start endpoint. Restoring a running timer
    /// re-anchors it on `start_ms`.
    ///
    /// # Errors
    /// `InvalidState` once destroyed.
    pub fn restore(&self, start_ms: i64) -> Result<TimerState> {
        let mut inner = self.inner.lock();
        if inner.state == TimerState::Stopped {
            return Err(self.destroyed_error());
        }

        self.begin_count(&mut inner, start_ms);
        drop(inner);

        info!(task_id = %self.task.id, start_ms, "Timer restored from running entry");
        self.emit(TimerEvent::Restored { task_id: self.task.id.clone(), start_ms });
        Ok(TimerState::Running)
    }

    /// Release the display and cancel the tick. The remote entry is left as
    /// it is. Idempotent.
    pub fn destroy(&self) {
        let mut inner = self.inner.lock();
        if inner.state == TimerState::Stopped {
            return;
        }

        inner.cancel_ticker();
        inner.state = TimerState::Stopped;
        inner.start_ms = None;
        self.deps.surface.hide_timer();
        drop(inner);

        debug!(task_id = %self.task.id, "Timer destroyed");
        self.emit(TimerEvent::Destroyed { task_id: self.task.id.clone() });
    }

    /// Task the timer tracks.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TimerState {
        self.inner.lock().state
    }

    /// Display most recently pushed to the surface.
    pub fn display(&self) -> TimerDisplay {
        self.inner.lock().display.clone()
    }

    /// Stopwatch text of the running counter, `00:00:00` when not counting.
    pub fn counter_text(&self) -> String {
        let inner = self.inner.lock();
        counter_text((inner.state == TimerState::Running).then_some(inner.elapsed_ms))
    }

    /// Whether a periodic tick is currently scheduled.
    pub fn is_ticking(&self) -> bool {
        self.inner.lock().ticker.as_ref().is_some_and(|ticker| !ticker.is_cancelled())
    }

    /// Accumulated tracked time, excluding the running interval.
    pub fn seed_ms(&self) -> i64 {
        self.inner.lock().seed_ms
    }

    /// Time since the running entry started, `0` when idle.
    pub fn elapsed_ms(&self) -> i64 {
        self.inner.lock().elapsed_ms
    }

    /// Start of the running entry in epoch millis.
    pub fn start_ms(&self) -> Option<i64> {
        self.inner.lock().start_ms
    }

    /// Ticks observed since the last start or restore.
    pub fn ticks(&self) -> u64 {
        self.inner.lock().ticks
    }

    fn begin_count(&self, inner: &mut TimerInner, from_ms: i64) {
        inner.cancel_ticker();

        let now = self.deps.clock.millis_since_epoch();
        inner.state = TimerState::Running;
        inner.start_ms = Some(from_ms);
        inner.elapsed_ms = now.saturating_sub(from_ms).max(0);
        inner.ticks = 0;
        inner.display = TimerDisplay::running(inner.elapsed_ms, &self.label);
        self.deps.surface.show_timer(&inner.display);

        inner.ticker = Some(spawn_ticker(
            self.deps.settings.tick_interval,
            tick_fn(
                Arc::downgrade(&self.inner),
                Arc::clone(&self.deps.clock),
                Arc::clone(&self.deps.surface),
                self.label.clone(),
            ),
        ));
    }

    async fn remote<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = self.deps.settings.request_timeout;
        tokio::time::timeout(limit, call).await.map_err(|_| ClickTickError::Timeout(limit))?
    }

    fn report_failure(&self, action: TimerAction, err: &ClickTickError) {
        error!(
            task_id = %self.task.id,
            action = action.as_str(),
            error_kind = err.label(),
            error = %err,
            "Time entry request failed"
        );
        self.deps
            .surface
            .notify(NoticeLevel::Warning, &format!("Could not {} timer: {err}", action.as_str()));
        self.emit(TimerEvent::Failed {
            task_id: self.task.id.clone(),
            action,
            message: err.to_string(),
        });
    }

    fn destroyed_error(&self) -> ClickTickError {
        ClickTickError::InvalidState(format!("timer for task {} was destroyed", self.task.id))
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is fine.
        let _ = self.deps.events.send(event);
    }
}

impl Drop for TaskTimer {
    fn drop(&mut self) {
        self.inner.lock().cancel_ticker();
    }
}

fn tick_fn(
    inner: Weak<Mutex<TimerInner>>,
    clock: Arc<dyn Clock>,
    surface: Arc<dyn StatusSurface>,
    label: String,
) -> impl FnMut() + Send + 'static {
    move || {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let mut inner = inner.lock();
        if inner.state != TimerState::Running {
            return;
        }
        let Some(start_ms) = inner.start_ms else {
            return;
        };

        inner.ticks += 1;
        inner.elapsed_ms = clock.millis_since_epoch().saturating_sub(start_ms).max(0);
        inner.display = TimerDisplay::running(inner.elapsed_ms, &label);
        surface.show_timer(&inner.display);
    }
}
