//! # ClickTick Domain
//!
//! Domain types shared by every ClickTick crate.
//!
//! This crate contains:
//! - Task, time entry and workspace records as the ClickUp API returns them
//! - Error types and the crate-wide `Result` alias
//! - Configuration structures
//! - Storage keys and other constants
//!
//! ## Architecture
//! - No dependencies on other ClickTick crates
//! - Only external dependencies allowed
//! - Pure data, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
