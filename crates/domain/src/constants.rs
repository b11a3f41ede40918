//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Persisted key/value storage keys
/// The selected task, full or partial.
pub const SELECTED_TASK_KEY: &str = "selectedTaskData";
/// The last browsed list.
pub const LIST_OF_TASK_ID_KEY: &str = "listOfTaskId";
/// Cached teams of the account.
pub const TEAMS_KEY: &str = "teams";
/// Prefix of the per-team space cache.
pub const SPACES_KEY_PREFIX: &str = "space-";
/// Prefix of the per-team space filter.
pub const FILTERED_SPACES_KEY_PREFIX: &str = "filtered-spaces-";
/// Cached user owning the token.
pub const USER_KEY: &str = "user";
/// Token saved with `clicktick token set`.
pub const TOKEN_KEY: &str = "token";

// Timer display
/// Stopwatch text when nothing is counting.
pub const DEFAULT_TIME: &str = "00:00:00";
/// Display tick period.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
/// Bound on timer start and stop calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Duration marker the service uses for the one open entry of a user.
pub const RUNNING_DURATION: i64 = -1;

// Remote service
/// ClickUp REST v2 root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.clickup.com/api/v2";
/// Tries per idempotent request.
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 3;
/// Upper bound on pages fetched when listing the tasks of a list.
pub const MAX_TASK_PAGES: u32 = 10;

// Notices
/// Shown after `forget`.
pub const TASK_FORGOTTEN_MESSAGE: &str = "Task forgotten";
/// Status line placeholder.
pub const NO_TASK_SELECTED_MESSAGE: &str = "Select a task to track";
/// Shown after `token set`.
pub const TOKEN_SAVED_MESSAGE: &str = "ClickUp API Token set successfully!";
/// Shown after `token delete`.
pub const TOKEN_DELETED_MESSAGE: &str = "ClickUp API Token deleted";
/// Error when neither a configured nor a stored token exists.
pub const NO_TOKEN_MESSAGE: &str = "No ClickUp API token set; run `clicktick token set <token>`";
/// `tasks` without an id before any list was browsed.
pub const NO_LIST_REMEMBERED_MESSAGE: &str = "No list browsed yet; pass a list id";
/// A token without the `pk_<digits>_<32 chars>` shape.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid ClickUp API token";

/// Key under which the cached spaces of a team are stored.
pub fn spaces_key(team_id: &str) -> String {
    format!("{SPACES_KEY_PREFIX}{team_id}")
}

/// Key under which the space filter of a team is stored.
pub fn filtered_spaces_key(team_id: &str) -> String {
    format!("{FILTERED_SPACES_KEY_PREFIX}{team_id}")
}
