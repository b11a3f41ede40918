//! Testing utilities and helpers
//!
//! - **[`time`]**: wall-clock abstraction with a controllable mock
//! - **[`async_utils`]**: polling helpers for async tests

pub mod async_utils;
pub mod time;

pub use async_utils::poll_until;
pub use time::{Clock, MockClock, SystemClock};
