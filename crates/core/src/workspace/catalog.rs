//! Workspace navigation
//!
//! Teams, spaces and the authorized user are cached in the key/value store;
//! folders, lists and tasks change often and are always fetched. The per-team
//! space filter also scopes the "my tasks" view.

use std::sync::Arc;

use clicktick_domain::constants::{filtered_spaces_key, spaces_key, TEAMS_KEY, USER_KEY};
use clicktick_domain::{ClickTickError, Folder, List, Result, Space, Task, Team, User};
use tracing::{debug, info, instrument};

use crate::storage_ports::{load_json, save_json, KeyValueStore};
use crate::tracking::WorkspaceDirectory;

/// A list with the number of open tasks it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    /// The list as listed.
    pub list: List,
    /// Open tasks in the list.
    pub task_count: usize,
}

impl ListSummary {
    /// `Backlog (12)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.list.name, self.task_count)
    }
}

/// Where to look for lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope<'a> {
    /// Folderless lists of a space.
    Space(&'a str),
    /// Lists of a folder.
    Folder(&'a str),
}

/// Cached access to the workspace hierarchy.
pub struct WorkspaceCatalog {
    directory: Arc<dyn WorkspaceDirectory>,
    store: Arc<dyn KeyValueStore>,
}

impl WorkspaceCatalog {
    /// Create a catalog caching into `store`.
    pub fn new(directory: Arc<dyn WorkspaceDirectory>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { directory, store }
    }

    /// Cached teams, fetched and cached on a miss.
    pub async fn teams(&self) -> Result<Vec<Team>> {
        if let Some(teams) = load_json::<Vec<Team>>(self.store.as_ref(), TEAMS_KEY).await? {
            return Ok(teams);
        }

        let teams = self.directory.get_teams().await?;
        save_json(self.store.as_ref(), TEAMS_KEY, &teams).await?;
        debug!(count = teams.len(), "Cached teams");
        Ok(teams)
    }

    /// The first team, which scopes reports by default.
    pub async fn default_team(&self) -> Result<Team> {
        self.teams()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ClickTickError::NotFound("no team available for this token".into()))
    }

    /// Cached spaces of a team, fetched and cached on a miss.
    pub async fn spaces(&self, team_id: &str) -> Result<Vec<Space>> {
        if let Some(spaces) = load_json::<Vec<Space>>(self.store.as_ref(), &spaces_key(team_id)).await?
        {
            return Ok(spaces);
        }
        self.refresh_spaces(team_id).await
    }

    /// Drop the team cache; the next [`teams`](Self::teams) call refetches.
    pub async fn reset_teams(&self) -> Result<()> {
        self.store.delete(TEAMS_KEY).await
    }

    /// Refetch the spaces of a team and overwrite the cache.
    pub async fn refresh_spaces(&self, team_id: &str) -> Result<Vec<Space>> {
        let spaces = self.directory.get_spaces(team_id).await?;
        save_json(self.store.as_ref(), &spaces_key(team_id), &spaces).await?;
        debug!(team_id, count = spaces.len(), "Cached spaces");
        Ok(spaces)
    }

    /// Saved space filter of a team; `None` means every space is shown.
    pub async fn space_filter(&self, team_id: &str) -> Result<Option<Vec<String>>> {
        load_json(self.store.as_ref(), &filtered_spaces_key(team_id)).await
    }

    /// Save which spaces of a team to show.
    ///
    /// Returns `false` without saving when the team has a single space, where
    /// filtering is meaningless. Ids that are not spaces of the team are
    /// dropped.
    pub async fn save_space_filter(&self, team_id: &str, selected: &[String]) -> Result<bool> {
        let spaces = self.spaces(team_id).await?;
        if spaces.len() <= 1 {
            info!(team_id, "Space filter needs more than one space");
            return Ok(false);
        }

        let kept: Vec<&str> = spaces
            .iter()
            .map(|space| space.id.as_str())
            .filter(|id| selected.iter().any(|wanted| wanted == id))
            .collect();
        save_json(self.store.as_ref(), &filtered_spaces_key(team_id), &kept).await?;
        Ok(true)
    }

    /// Folders of a space.
    pub async fn folders(&self, space_id: &str) -> Result<Vec<Folder>> {
        self.directory.get_folders(space_id).await
    }

    /// Lists in `scope`, each with its open task count.
    ///
    /// Counts come from the listing when the service includes them; the
    /// remaining lists are counted by fetching their tasks.
    #[instrument(skip(self))]
    pub async fn lists(&self, scope: ListScope<'_>) -> Result<Vec<ListSummary>> {
        let lists = match scope {
            ListScope::Space(space_id) => self.directory.get_folderless_lists(space_id).await?,
            ListScope::Folder(folder_id) => self.directory.get_lists(folder_id).await?,
        };

        let mut summaries = Vec::with_capacity(lists.len());
        for list in lists {
            let task_count = match list.task_count {
                Some(count) => usize::try_from(count).unwrap_or(usize::MAX),
                None => self.directory.get_tasks(&list.id).await?.len(),
            };
            summaries.push(ListSummary { list, task_count });
        }
        Ok(summaries)
    }

    /// Open tasks of a list.
    pub async fn tasks(&self, list_id: &str) -> Result<Vec<Task>> {
        let tasks = self.directory.get_tasks(list_id).await?;
        debug!(list_id, count = tasks.len(), "Fetched list tasks");
        Ok(tasks)
    }

    /// The user owning the token, cached after the first lookup.
    pub async fn me(&self) -> Result<User> {
        if let Some(user) = load_json::<User>(self.store.as_ref(), USER_KEY).await? {
            return Ok(user);
        }

        let user = self.directory.get_authorized_user().await?;
        save_json(self.store.as_ref(), USER_KEY, &user).await?;
        Ok(user)
    }

    /// Tasks of a team assigned to the token's user, restricted to the
    /// team's space filter when one is saved.
    #[instrument(skip(self))]
    pub async fn my_tasks(&self, team_id: &str) -> Result<Vec<Task>> {
        let user = self.me().await?;
        let spaces = self.space_filter(team_id).await?.unwrap_or_default();
        self.directory.get_my_tasks(team_id, user.id, &spaces).await
    }

    /// Drop the cached user, e.g. after the token changed.
    pub async fn reset_user(&self) -> Result<()> {
        self.store.delete(USER_KEY).await
    }

    /// Spaces of a team after applying the saved filter.
    pub async fn visible_spaces(&self, team_id: &str) -> Result<Vec<Space>> {
        let spaces = self.spaces(team_id).await?;
        Ok(match self.space_filter(team_id).await? {
            Some(filter) => {
                spaces.into_iter().filter(|space| filter.contains(&space.id)).collect()
            }
            None => spaces,
        })
    }
}
