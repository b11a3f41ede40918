//! Integration tests for the `time` module.
//!
//! These tests drive a ticker against a mock wall clock the way the task
//! timer does, and check the formatting helpers agree on the rendered text.

#![cfg(feature = "runtime")]

use std::sync::Arc;
use std::time::Duration;

use clicktick_common::testing::{poll_until, Clock, MockClock};
use clicktick_common::time::{format_duration, format_duration_watch, spawn_ticker};
use parking_lot::Mutex;

/// Verifies a ticker recomputing elapsed time from a mock clock renders the
/// expected summary after each tick.
#[tokio::test(start_paused = true)]
async fn test_ticker_renders_elapsed_from_clock() {
    let clock = MockClock::at(1_700_000_000_000);
    let started_at = clock.millis_since_epoch() - 118_000;
    let rendered = Arc::new(Mutex::new(String::new()));

    let tick_clock = clock.clone();
    let tick_rendered = rendered.clone();
    let handle = spawn_ticker(Duration::from_secs(1), move || {
        tick_clock.advance(Duration::from_secs(1));
        *tick_rendered.lock() = format_duration(tick_clock.millis_since_epoch() - started_at);
    });

    let reached = poll_until(Duration::from_secs(5), Duration::from_millis(100), || {
        rendered.lock().as_str() == "2m"
    })
    .await;

    assert!(reached, "ticker never rendered two minutes");
    assert!(handle.cancel());
}

/// Verifies a cancelled ticker never fires even if the runtime keeps going.
#[tokio::test(start_paused = true)]
async fn test_cancelled_before_first_tick() {
    let fired = Arc::new(Mutex::new(0_u32));
    let fired_clone = fired.clone();

    let handle = spawn_ticker(Duration::from_millis(500), move || {
        *fired_clone.lock() += 1;
    });
    handle.cancel();

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(*fired.lock(), 0);
}

/// Verifies the stopwatch and summary formats describe the same span.
#[test]
fn test_watch_and_summary_agree() {
    let cases = [
        (0, "00:00:00", "0s"),
        (45_000, "00:00:45", "45s"),
        (120_000, "00:02:00", "2m"),
        (3_661_000, "01:01:01", "1h 1m"),
        (90_000_000, "25:00:00", "1d 1h 0m"),
    ];

    for (millis, watch, summary) in cases {
        assert_eq!(format_duration_watch(millis), watch, "watch mismatch for {millis}");
        assert_eq!(format_duration(millis), summary, "summary mismatch for {millis}");
    }
}
