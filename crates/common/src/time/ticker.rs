//! Cancellable periodic tick
//!
//! A ticker runs a callback on the tokio runtime once per period until its
//! handle is cancelled. Cancellation is idempotent: the first call stops the
//! task and reports `true`, every later call is a no-op that reports `false`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Handle used to stop a running ticker.
#[derive(Debug, Clone)]
pub struct TickerHandle {
    token: CancellationToken,
    cancelled: Arc<AtomicBool>,
}

impl TickerHandle {
    fn new() -> Self {
        Self { token: CancellationToken::new(), cancelled: Arc::new(AtomicBool::new(false)) }
    }

    /// Stop the ticker. Returns `true` only for the call that stopped it.
    pub fn cancel(&self) -> bool {
        let first = !self.cancelled.swap(true, Ordering::SeqCst);
        if first {
            self.token.cancel();
            trace!("ticker cancelled");
        }
        first
    }

    /// Whether the ticker was stopped.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Run `on_tick` every `period`, starting one period from now.
///
/// Ticks missed while the runtime was busy are skipped rather than replayed
/// in a burst. Must be called from within a tokio runtime.
///
/// # Examples
///
/// ```no_run
/// # #[cfg(feature = "runtime")]
/// # {
/// use std::time::Duration;
///
/// use clicktick_common::time::ticker::spawn_ticker;
///
/// #[tokio::main]
/// async fn main() {
///     let handle = spawn_ticker(Duration::from_secs(1), || println!("tick"));
///     tokio::time::sleep(Duration::from_secs(3)).await;
///     handle.cancel();
/// }
/// # }
/// ```
pub fn spawn_ticker<F>(period: Duration, mut on_tick: F) -> TickerHandle
where
    F: FnMut() + Send + 'static,
{
    let handle = TickerHandle::new();
    let token = handle.token.clone();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await; // Skip first immediate tick

        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => break,
                _ = interval.tick() => {
                    if token.is_cancelled() {
                        break;
                    }
                    on_tick();
                }
            }
        }
    });

    handle
}
