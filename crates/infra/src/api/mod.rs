//! ClickUp API access
//!
//! - [`client::ApiClient`]: authenticated JSON requests over [`crate::http::HttpClient`]
//! - [`clickup::ClickUpClient`]: the core ports on top of it
//! - [`auth`]: personal token validation and storage

pub mod auth;
pub mod clickup;
pub mod client;
pub mod errors;

pub use auth::{validate_token, AccessTokenProvider, TokenManager, TokenSource, TokenStatus};
pub use clickup::ClickUpClient;
pub use client::{ApiClient, ApiClientConfig};
pub use errors::ApiError;
