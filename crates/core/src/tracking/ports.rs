//! Port interfaces for time tracking
//!
//! These traits define the boundaries between core business logic
//! and the remote ClickUp service.

use async_trait::async_trait;
use clicktick_domain::{
    CreateTimeEntry, Folder, List, Result, Space, Task, Team, TimeEntry, TimeRange, Tracking, User,
};

/// Remote time entry operations, scoped by team (workspace).
#[async_trait]
pub trait TimeEntryClient: Send + Sync {
    /// Open a running entry for `entry.tid`.
    async fn start_time_entry(&self, team_id: &str, entry: &CreateTimeEntry) -> Result<TimeEntry>;

    /// Close the calling user's running entry in `team_id`.
    ///
    /// Any success reply confirms the stop; the closed entry is returned when
    /// the reply carries one.
    async fn stop_time_entry(&self, team_id: &str) -> Result<Option<TimeEntry>>;

    /// The calling user's open entry, if any.
    async fn get_running_time_entry(&self, team_id: &str) -> Result<Option<TimeEntry>>;

    /// Tracked history of a task, grouped per user.
    async fn get_tracked_intervals(&self, task_id: &str) -> Result<Vec<Tracking>>;

    /// Entries whose start falls within `range`.
    async fn get_time_entries(&self, team_id: &str, range: TimeRange) -> Result<Vec<TimeEntry>>;
}

/// Task lookups
#[async_trait]
pub trait TaskDirectory: Send + Sync {
    /// Fetch the full task record; `None` when the service has no such task.
    async fn get_task_by_id(&self, task_id: &str) -> Result<Option<Task>>;
}

/// Navigation of the workspace hierarchy
#[async_trait]
pub trait WorkspaceDirectory: Send + Sync {
    /// Teams the token has access to.
    async fn get_teams(&self) -> Result<Vec<Team>>;

    /// Non-archived spaces of a team.
    async fn get_spaces(&self, team_id: &str) -> Result<Vec<Space>>;

    /// Non-archived folders of a space.
    async fn get_folders(&self, space_id: &str) -> Result<Vec<Folder>>;

    /// Lists that live directly in a space, outside any folder.
    async fn get_folderless_lists(&self, space_id: &str) -> Result<Vec<List>>;

    /// Lists of a folder.
    async fn get_lists(&self, folder_id: &str) -> Result<Vec<List>>;

    /// Open tasks of a list, subtasks included.
    async fn get_tasks(&self, list_id: &str) -> Result<Vec<Task>>;

    /// The user owning the token.
    async fn get_authorized_user(&self) -> Result<User>;

    /// Open tasks of `team_id` assigned to `user_id`, limited to `space_ids`
    /// unless that is empty.
    async fn get_my_tasks(&self, team_id: &str, user_id: i64, space_ids: &[String]) -> Result<Vec<Task>>;
}
