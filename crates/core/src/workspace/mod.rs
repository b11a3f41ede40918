//! Workspace navigation: teams, spaces, folders, lists, tasks and due dates.

pub mod catalog;
pub mod due;

pub use catalog::{ListScope, ListSummary, WorkspaceCatalog};
pub use due::{due_state, DueDate, DueState};
