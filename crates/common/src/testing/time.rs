//! Wall-clock abstraction for testability
//!
//! Timer arithmetic is done in epoch milliseconds because that is the unit
//! the remote service records. Production code reads [`SystemClock`]; tests
//! pin and advance a [`MockClock`].
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use clicktick_common::testing::{Clock, MockClock};
//!
//! let clock = MockClock::at(1_700_000_000_000);
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.millis_since_epoch(), 1_700_000_005_000);
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current system time (wall clock).
    fn system_time(&self) -> SystemTime;

    /// Milliseconds since the UNIX epoch.
    fn millis_since_epoch(&self) -> i64 {
        self.system_time()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| i64::try_from(since.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually driven clock for deterministic tests.
///
/// Clones share the same elapsed time, so a clock handed to the code under
/// test can be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    base: SystemTime,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Mock clock starting at the current real time.
    pub fn new() -> Self {
        Self { base: SystemTime::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Mock clock pinned to an absolute epoch-millis instant.
    pub fn at(epoch_ms: i64) -> Self {
        let offset = Duration::from_millis(u64::try_from(epoch_ms).unwrap_or(0));
        Self { base: UNIX_EPOCH + offset, elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Simulate `duration` passing.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Replace the simulated elapsed time.
    pub fn set_elapsed(&self, duration: Duration) {
        *self.elapsed.lock() = duration;
    }

    /// Time advanced since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn system_time(&self) -> SystemTime {
        self.base + *self.elapsed.lock()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for testing::time.
    use super::*;

    /// Validates the system clock reports a post-epoch instant.
    #[test]
    fn test_system_clock_millis() {
        assert!(SystemClock.millis_since_epoch() > 1_600_000_000_000);
    }

    /// Validates `MockClock::at` pins the epoch and `advance` accumulates.
    ///
    /// Assertions:
    /// - Confirms the pinned instant is reported unchanged.
    /// - Confirms successive advances add up.
    #[test]
    fn test_mock_clock_pinned_and_advanced() {
        let clock = MockClock::at(1_000_000);
        assert_eq!(clock.millis_since_epoch(), 1_000_000);

        clock.advance(Duration::from_secs(1));
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.millis_since_epoch(), 1_001_500);
        assert_eq!(clock.elapsed(), Duration::from_millis(1_500));
    }

    /// Validates clones share elapsed time and `set_elapsed` overrides it.
    #[test]
    fn test_mock_clock_clone_shares_state() {
        let clock = MockClock::at(0);
        let observer = clock.clone();

        clock.set_elapsed(Duration::from_secs(120));
        assert_eq!(observer.millis_since_epoch(), 120_000);
    }
}
