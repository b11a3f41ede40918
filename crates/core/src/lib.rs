//! # ClickTick Core
//!
//! Time-tracking business logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The task timer state machine and its lifecycle events
//! - The task selection controller
//! - Tracked-time reporting and the workspace catalog
//! - Port interfaces (traits) for the remote service, storage and the
//!   status surface
//!
//! ## Architecture Principles
//! - Only depends on `clicktick-common` and `clicktick-domain`
//! - No HTTP, filesystem or terminal code
//! - All external collaborators via traits

pub mod reporting;
pub mod selection;
pub mod tracking;
pub mod workspace;

// Infrastructure ports
pub mod storage_ports;
pub mod surface_ports;

pub use reporting::{Period, TaskTimeSheet, TimeBucket, TrackedTimeAggregator, TrackedTimeReport};
pub use selection::{SelectionDeps, SelectionOrigin, TaskSelectionController};
pub use storage_ports::KeyValueStore;
pub use surface_ports::{NoticeLevel, StatusSurface};
pub use tracking::ports::{TaskDirectory, TimeEntryClient, WorkspaceDirectory};
pub use tracking::{TaskTimer, TimerDeps, TimerDisplay, TimerEvent, TimerSettings, TimerState};
pub use workspace::{ListScope, ListSummary, WorkspaceCatalog};
