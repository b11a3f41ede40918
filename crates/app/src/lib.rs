//! # ClickTick App
//!
//! Command line application layer - commands and main entry point.
//!
//! This crate contains:
//! - Commands over the selection controller, reports and workspace catalog
//! - Application context (dependency injection)
//! - The terminal status surface
//! - CLI parsing and rendering
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires ports to their adapters

pub mod cli;
pub mod commands;
pub mod context;
pub mod surface;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use surface::TerminalSurface;
