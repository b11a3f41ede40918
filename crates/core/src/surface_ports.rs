//! Status surface port
//!
//! The front end renders the timer, the selected-task indicator and passive
//! notices. Calls are synchronous because the timer tick drives them.

use crate::tracking::display::TimerDisplay;

/// Severity of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Something went wrong but state is intact.
    Warning,
    /// A failure the user must act on.
    Error,
}

/// Where the timer and task indicator are shown.
pub trait StatusSurface: Send + Sync {
    /// Show or update the timer item.
    fn show_timer(&self, display: &TimerDisplay);

    fn hide_timer(&self);

    /// Show the selected-task indicator.
    fn show_task(&self, text: &str, tooltip: &str);

    fn hide_task(&self);

    fn notify(&self, level: NoticeLevel, message: &str);
}
