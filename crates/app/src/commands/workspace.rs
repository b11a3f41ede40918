//! Workspace browsing: teams, spaces, folders, lists and tasks

use clicktick_core::workspace::{ListScope, ListSummary};
use clicktick_domain::constants::NO_LIST_REMEMBERED_MESSAGE;
use clicktick_domain::{ClickTickError, Folder, Result, Space, Task, Team};
use tracing::info;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Spaces of one team with the saved filter applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceListing {
    /// Team the spaces belong to.
    pub team_id: String,
    /// Every space of the team.
    pub spaces: Vec<Space>,
    /// Ids shown after filtering; every id when no filter is saved.
    pub visible: Vec<String>,
}

impl SpaceListing {
    /// Whether the filter keeps `space_id`.
    pub fn is_visible(&self, space_id: &str) -> bool {
        self.visible.iter().any(|id| id == space_id)
    }
}

/// Teams of the account. `refresh` drops the cached list first.
pub async fn list_teams(ctx: &AppContext, refresh: bool) -> Result<Vec<Team>> {
    execute_command("workspace::list_teams", || async {
        if refresh {
            ctx.catalog.reset_teams().await?;
        }
        ctx.catalog.teams().await
    })
    .await
}

/// Spaces of a team, defaulting to the selected task's team.
pub async fn list_spaces(ctx: &AppContext, team: Option<&str>, refresh: bool) -> Result<SpaceListing> {
    execute_command("workspace::list_spaces", || async {
        let team_id = ctx.resolve_team(team).await?;
        let spaces = if refresh {
            ctx.catalog.refresh_spaces(&team_id).await?
        } else {
            ctx.catalog.spaces(&team_id).await?
        };
        let visible =
            ctx.catalog.visible_spaces(&team_id).await?.into_iter().map(|space| space.id).collect();

        Ok(SpaceListing { team_id, spaces, visible })
    })
    .await
}

/// Show only `space_ids` of a team. `false` when the team has a single space.
pub async fn filter_spaces(ctx: &AppContext, team: Option<&str>, space_ids: &[String]) -> Result<bool> {
    execute_command("workspace::filter_spaces", || async {
        let team_id = ctx.resolve_team(team).await?;
        let saved = ctx.catalog.save_space_filter(&team_id, space_ids).await?;
        info!(team_id = %team_id, saved, "Space filter updated");
        Ok(saved)
    })
    .await
}

/// Folders of a space.
pub async fn list_folders(ctx: &AppContext, space_id: &str) -> Result<Vec<Folder>> {
    execute_command("workspace::list_folders", || async { ctx.catalog.folders(space_id).await }).await
}

/// Lists of a folder, or the folderless lists of a space, with task counts.
pub async fn list_lists(ctx: &AppContext, scope: ListScope<'_>) -> Result<Vec<ListSummary>> {
    execute_command("workspace::list_lists", || async { ctx.catalog.lists(scope).await }).await
}

/// Tasks of a list that can be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListing {
    /// List the tasks belong to, now remembered.
    pub list_id: String,
    /// Open tasks of the list.
    pub tasks: Vec<Task>,
}

/// Tasks of `list_id`, or of the last browsed list when omitted.
///
/// The browsed list is remembered for the next call.
///
/// # Errors
/// `InvalidInput` when no list is given and none was browsed before.
pub async fn list_tasks(ctx: &AppContext, list_id: Option<&str>) -> Result<TaskListing> {
    execute_command("workspace::list_tasks", || async {
        let list_id = match list_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => ctx
                .controller
                .remembered_list()
                .await?
                .ok_or_else(|| ClickTickError::InvalidInput(NO_LIST_REMEMBERED_MESSAGE.into()))?,
        };

        let tasks = ctx.catalog.tasks(&list_id).await?;
        ctx.controller.remember_list(&list_id).await?;
        Ok(TaskListing { list_id, tasks })
    })
    .await
}

/// Open tasks assigned to the token's user in a team.
pub async fn my_tasks(ctx: &AppContext, team: Option<&str>) -> Result<Vec<Task>> {
    execute_command("workspace::my_tasks", || async {
        let team_id = ctx.resolve_team(team).await?;
        ctx.catalog.my_tasks(&team_id).await
    })
    .await
}
