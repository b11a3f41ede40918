//! Command plumbing shared by every entry point

pub mod command_helpers;
pub mod logging;
