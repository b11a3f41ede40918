//! Configuration loading
//!
//! Reads the application configuration from files and the environment.

pub mod loader;

pub use loader::{
    apply_env_overrides, apply_overrides_from, load, load_from_file, find_config_file,
};
