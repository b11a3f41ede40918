//! Time utilities and abstractions
//!
//! - **[`format`]**: duration and date formatting for timer and report views
//! - **[`ticker`]**: cancellable periodic work on the tokio runtime
//! - **Clock abstractions**: real and mock wall clock (re-exported from
//!   testing)
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "runtime")]
//! # {
//! use clicktick_common::time::{format_duration, format_duration_watch};
//!
//! assert_eq!(format_duration(3_661_000), "1h 1m");
//! assert_eq!(format_duration_watch(3_661_000), "01:01:01");
//! # }
//! ```

pub mod format;
#[cfg(feature = "runtime")]
pub mod ticker;

pub use format::{
    format_day, format_duration, format_duration_between, format_duration_watch, format_seconds,
    format_timestamp,
};
#[cfg(feature = "runtime")]
pub use ticker::{spawn_ticker, TickerHandle};

// Re-export Clock abstractions from testing module
#[cfg(feature = "runtime")]
pub use crate::testing::time::{Clock, MockClock, SystemClock};
