//! Domain types and models
//!
//! Wire-compatible records of the ClickUp service plus the task completeness
//! split the selection flow relies on.

pub mod task;
pub mod time;
pub mod workspace;

pub use task::{Priority, Tag, Task, TaskRecord, TaskRef, TaskStatus, User, ContainerRef};
pub use time::{
    total_tracked_ms, CreateTimeEntry, EntryTask, Interval, TaskLocation, TimeEntry, TimeRange,
    Tracking,
};
pub use workspace::{Folder, List, Space, Team, TeamMember};

/// Parse an epoch-millis value that the service ships as a string.
pub(crate) fn parse_millis(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
