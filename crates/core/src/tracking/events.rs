//! Timer lifecycle events
//!
//! Timers publish on a `tokio::sync::broadcast` channel owned by the
//! selection controller. Views subscribe and refresh on `Stopped`.

use tokio::sync::broadcast;

/// Capacity of the per-controller event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Sending half of the timer event channel.
pub type TimerEventSender = broadcast::Sender<TimerEvent>;
/// Receiving half of the timer event channel.
pub type TimerEventReceiver = broadcast::Receiver<TimerEvent>;

/// Remote operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Opening a remote entry.
    Start,
    /// Closing the remote entry.
    Stop,
}

impl TimerAction {
    /// Lower-case action name used in logs and notices.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

/// Lifecycle notifications broadcast by timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A timer was bound to a task and shows its idle seed.
    Created { task_id: String, seed_ms: i64 },
    /// A remote entry was opened and the tick began.
    Started { task_id: String, start_ms: i64 },
    /// The tick resumed from a running remote entry.
    Restored { task_id: String, start_ms: i64 },
    /// The remote entry was closed.
    Stopped { task_id: String, elapsed_ms: i64 },
    /// A remote call failed; local state was left as it was.
    Failed { task_id: String, action: TimerAction, message: String },
    /// The timer released its display for good.
    Destroyed { task_id: String },
}

impl TimerEvent {
    /// Task the event is about.
    pub fn task_id(&self) -> &str {
        match self {
            Self::Created { task_id, .. }
            | Self::Started { task_id, .. }
            | Self::Restored { task_id, .. }
            | Self::Stopped { task_id, .. }
            | Self::Failed { task_id, .. }
            | Self::Destroyed { task_id } => task_id,
        }
    }
}

/// New channel for timer events.
pub fn channel() -> (TimerEventSender, TimerEventReceiver) {
    broadcast::channel(EVENT_CHANNEL_CAPACITY)
}
