//! Task selection and timer commands

use std::future::Future;

use chrono::Local;
use clicktick_core::tracking::{TimerDisplay, TimerEvent, TimerState};
use clicktick_core::workspace::{due_state, DueDate};
use clicktick_core::SelectionOrigin;
use clicktick_domain::{Result, Task, TaskRecord, TaskRef};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, with_timeout};

/// Snapshot of the selection and its timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Selected task, if any.
    pub task: Option<Task>,
    /// Timer state, absent without a timer.
    pub state: Option<TimerState>,
    /// What the status line shows.
    pub display: Option<TimerDisplay>,
    /// `HH:mm:ss` of the running interval.
    pub counter: Option<String>,
    /// Due date of the task.
    pub due: Option<DueDate>,
}

/// Select `task_id` and start tracking it.
///
/// The task is fetched with its tracked history; a remote entry already
/// running for it is resumed rather than restarted.
pub async fn select_task(ctx: &AppContext, task_id: &str) -> Result<Task> {
    execute_command("tracking::select_task", || async {
        info!(task_id, "Selecting task");

        let history = match with_timeout(
            ctx.settings.request_timeout,
            ctx.time_entries.get_tracked_intervals(task_id),
        )
        .await
        {
            Ok(history) => history,
            Err(err) => {
                warn!(task_id, error = %err, "Tracked history unavailable, starting from zero");
                Vec::new()
            }
        };

        let task = ctx
            .controller
            .select_task(TaskRecord::Partial(TaskRef::new(task_id)), history, SelectionOrigin::User)
            .await?;

        if let Some(list) = task.list.as_ref() {
            if let Err(err) = ctx.controller.remember_list(&list.id).await {
                debug!(list_id = %list.id, error = %err, "Could not remember task list");
            }
        }
        Ok(task)
    })
    .await
}

/// Start the selected task's timer. `None` without a selection.
pub async fn start_timer(ctx: &AppContext) -> Result<Option<TimerState>> {
    execute_command("tracking::start_timer", || ctx.controller.start_timer()).await
}

/// Stop the selected task's timer. `None` without a selection.
pub async fn stop_timer(ctx: &AppContext) -> Result<Option<TimerState>> {
    execute_command("tracking::stop_timer", || ctx.controller.stop_timer()).await
}

/// Drop the selection, leaving any remote entry running.
pub async fn forget_task(ctx: &AppContext) -> Result<()> {
    execute_command("tracking::forget_task", || ctx.controller.forget_task(true)).await
}

/// Snapshot of the selected task and its timer.
pub async fn status(ctx: &AppContext) -> Result<StatusReport> {
    execute_command("tracking::status", || async {
        let task = ctx.controller.selected_task();
        let timer = ctx.controller.active_timer();
        let due = task.as_ref().map(|task| due_state(task.due_date_ms(), &Local::now()));

        Ok(StatusReport {
            state: timer.as_ref().map(|timer| timer.state()),
            display: timer.as_ref().map(|timer| timer.display()),
            counter: timer.as_ref().map(|timer| timer.counter_text()),
            task,
            due,
        })
    })
    .await
}

/// Keep the live status line drawn until `shutdown` resolves.
///
/// Timer events are logged while watching. The timer is released on exit
/// but its remote entry is left as it is.
pub async fn watch<F>(ctx: &AppContext, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    execute_command("tracking::watch", || async {
        let mut events = ctx.controller.subscribe();
        ctx.surface.set_live(true);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                event = events.recv() => match event {
                    Ok(event) => log_event(&event),
                    Err(RecvError::Lagged(skipped)) => debug!(skipped, "Timer events lagged"),
                    Err(RecvError::Closed) => break,
                },
            }
        }

        ctx.surface.set_live(false);
        ctx.shutdown();
        Ok(())
    })
    .await
}

fn log_event(event: &TimerEvent) {
    match event {
        TimerEvent::Failed { task_id, action, message } => {
            warn!(task_id = %task_id, action = action.as_str(), message = %message, "Timer request failed");
        }
        other => debug!(event = ?other, "Timer event"),
    }
}
