//! Live time tracking: the task timer, its events and display model.

pub mod display;
pub mod events;
pub mod ports;
pub mod timer;

pub use display::{format_interval, format_tracking_duration, DisplayMode, TimerDisplay};
pub use events::{TimerAction, TimerEvent, TimerEventReceiver, TimerEventSender};
pub use ports::{TaskDirectory, TimeEntryClient, WorkspaceDirectory};
pub use timer::{TaskTimer, TimerDeps, TimerSettings, TimerState};
