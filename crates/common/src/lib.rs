//! Common utilities shared across ClickTick crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: pure duration and date formatting
//! - `runtime`: tokio-backed tickers and the clock abstraction
//! - `test-utils`: clock mocks and async test helpers for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation + runtime tiers
// --------------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod testing;

#[cfg(feature = "foundation")]
pub use time::format::{format_duration, format_duration_watch};
#[cfg(feature = "runtime")]
pub use time::ticker::{spawn_ticker, TickerHandle};
