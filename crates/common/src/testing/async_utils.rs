//! Async testing utilities

use std::time::Duration;

/// Poll `condition` every `step` until it holds or `timeout` elapses.
///
/// Returns whether the condition was observed. Works with paused tokio time,
/// where each sleep advances the virtual clock.
pub async fn poll_until<F>(timeout: Duration, step: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(step).await;
    }
}
