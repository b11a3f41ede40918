//! Task selection: which task the timer is bound to, persisted across runs.

pub mod controller;
pub mod store;

pub use controller::{SelectionDeps, SelectionOrigin, TaskSelectionController};
pub use store::SelectedTaskStore;
