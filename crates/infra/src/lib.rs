//! # ClickTick Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The ClickUp REST adapter (`api`) over a retrying HTTP client (`http`)
//! - Key/value stores backed by a JSON file or memory (`storage`)
//! - Configuration loading (`config`)
//!
//! ## Architecture
//! - Implements traits defined in `clicktick-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod storage;

pub use api::{ApiClient, ApiClientConfig, ApiError, ClickUpClient, TokenManager};
pub use errors::InfraError;
pub use http::HttpClient;
pub use storage::{JsonFileStore, MemoryStore};
