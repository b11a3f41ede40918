//! Tracked-time report commands

use chrono::{DateTime, Local, TimeZone};
use clicktick_core::reporting::{TaskTimeSheet, TrackedTimeReport};
use clicktick_domain::{ClickTickError, Result, Task};
use tracing::info;

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, with_timeout};

/// Today, this week and this month of a team in the local zone.
pub async fn tracked_time_report(ctx: &AppContext, team: Option<&str>) -> Result<TrackedTimeReport> {
    tracked_time_report_at(ctx, team, &Local::now()).await
}

/// [`tracked_time_report`] anchored on `now`.
pub async fn tracked_time_report_at<Tz>(
    ctx: &AppContext,
    team: Option<&str>,
    now: &DateTime<Tz>,
) -> Result<TrackedTimeReport>
where
    Tz: TimeZone,
{
    execute_command("reports::tracked_time", || async {
        let team_id = ctx.resolve_team(team).await?;
        info!(team_id = %team_id, "Building tracked time report");
        ctx.aggregator.report(&team_id, now).await
    })
    .await
}

/// Tracked history of `task_id`, or of the selected task.
pub async fn task_time_sheet(ctx: &AppContext, task_id: Option<&str>) -> Result<TaskTimeSheet> {
    execute_command("reports::task_time_sheet", || async {
        let task = match task_id {
            Some(id) => fetch_task(ctx, id).await?,
            None => ctx.require_selection()?,
        };

        let trackings = with_timeout(
            ctx.settings.request_timeout,
            ctx.time_entries.get_tracked_intervals(&task.id),
        )
        .await?;

        Ok(TaskTimeSheet::build(&task, &trackings, &Local))
    })
    .await
}

async fn fetch_task(ctx: &AppContext, task_id: &str) -> Result<Task> {
    with_timeout(ctx.settings.request_timeout, ctx.tasks.get_task_by_id(task_id))
        .await?
        .ok_or_else(|| ClickTickError::NotFound(format!("task {task_id}")))
}
