//! Terminal rendering of the status surface
//!
//! Keeps the latest timer display and task indicator so commands can print
//! a status line. In live mode every timer update redraws that line in
//! place; notices are always written on their own line.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use clicktick_core::surface_ports::{NoticeLevel, StatusSurface};
use clicktick_core::tracking::{DisplayMode, TimerDisplay};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Label of the selected task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskIndicator {
    /// `[id] name`
    pub text: String,
    /// Task name and URL.
    pub tooltip: String,
}

#[derive(Default)]
struct SurfaceState {
    timer: Option<TimerDisplay>,
    task: Option<TaskIndicator>,
    notices: Vec<(NoticeLevel, String)>,
}

/// Status surface writing to a terminal, or any writer in tests.
pub struct TerminalSurface {
    state: Mutex<SurfaceState>,
    out: Mutex<Box<dyn Write + Send>>,
    live: AtomicBool,
}

impl TerminalSurface {
    /// Surface writing to standard output.
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    /// Surface writing to `out`.
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self { state: Mutex::new(SurfaceState::default()), out: Mutex::new(out), live: AtomicBool::new(false) }
    }

    /// Redraw the status line on every timer update.
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::SeqCst);
        if !live {
            self.write("\n");
        }
    }

    /// Last timer display pushed, if shown.
    pub fn timer(&self) -> Option<TimerDisplay> {
        self.state.lock().timer.clone()
    }

    /// Selected task indicator, if shown.
    pub fn task(&self) -> Option<TaskIndicator> {
        self.state.lock().task.clone()
    }

    /// Every notice shown so far, oldest first.
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.state.lock().notices.clone()
    }

    /// `● 2m | [DOC-1] Write docs`, or the placeholder when nothing is selected.
    pub fn status_line(&self) -> String {
        let state = self.state.lock();
        render_status(state.timer.as_ref(), state.task.as_ref())
    }

    fn redraw(&self) {
        if self.live.load(Ordering::SeqCst) {
            let line = self.status_line();
            self.write(&format!("\r\x1b[2K{line}"));
        }
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            debug!(error = %err, "Terminal write failed");
        }
    }
}

/// Status line for a timer display and task label.
pub fn render_status(timer: Option<&TimerDisplay>, task: Option<&TaskIndicator>) -> String {
    let Some(task) = task else {
        return clicktick_domain::constants::NO_TASK_SELECTED_MESSAGE.to_string();
    };
    match timer {
        Some(display) => {
            let marker = match display.mode {
                DisplayMode::Running => '●',
                DisplayMode::Idle => '○',
            };
            format!("{marker} {} | {}", display.text, task.text)
        }
        None => task.text.clone(),
    }
}

impl StatusSurface for TerminalSurface {
    fn show_timer(&self, display: &TimerDisplay) {
        self.state.lock().timer = Some(display.clone());
        self.redraw();
    }

    fn hide_timer(&self) {
        self.state.lock().timer = None;
        self.redraw();
    }

    fn show_task(&self, text: &str, tooltip: &str) {
        self.state.lock().task = Some(TaskIndicator { text: text.to_string(), tooltip: tooltip.to_string() });
        self.redraw();
    }

    fn hide_task(&self) {
        self.state.lock().task = None;
        self.redraw();
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => info!(message, "notice"),
            NoticeLevel::Warning | NoticeLevel::Error => warn!(?level, message, "notice"),
        }
        self.state.lock().notices.push((level, message.to_string()));

        let prefix = match level {
            NoticeLevel::Info => "",
            NoticeLevel::Warning => "warning: ",
            NoticeLevel::Error => "error: ",
        };
        let lead = if self.live.load(Ordering::SeqCst) { "\r\x1b[2K" } else { "" };
        self.write(&format!("{lead}{prefix}{message}\n"));
        self.redraw();
    }
}
