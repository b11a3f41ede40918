//! Personal API token handling
//!
//! ClickUp personal tokens look like `pk_<user id>_<32 chars>`; anything else
//! is rejected before a request is made. A token comes either from
//! configuration (`CLICKTICK_API_TOKEN`) or from `clicktick token set`, which
//! persists it in the key/value store. Configuration wins.

use std::sync::Arc;

use async_trait::async_trait;
use clicktick_core::storage_ports::{load_json, save_json, KeyValueStore};
use clicktick_domain::constants::{INVALID_TOKEN_MESSAGE, NO_TOKEN_MESSAGE, TOKEN_KEY};
use clicktick_domain::{ClickTickError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use super::errors::ApiError;

static TOKEN_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}_\d+_.{32}").ok());

/// Whether `token` has the shape of a ClickUp API token.
pub fn validate_token(token: &str) -> bool {
    TOKEN_PATTERN.as_ref().is_some_and(|pattern| pattern.is_match(token))
}

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    async fn access_token(&self) -> std::result::Result<String, ApiError>;
}

/// Where the active token comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `api.token` or `CLICKTICK_API_TOKEN`.
    Config,
    /// Saved with `clicktick token set`.
    Stored,
    /// No token at all.
    Missing,
}

/// The active token, masked for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatus {
    /// Where the token comes from.
    pub source: TokenSource,
    /// Prefix and last four characters.
    pub masked: Option<String>,
}

/// `pk_1234_ABCD...2345` becomes `pk_****2345`.
fn mask(token: &str) -> String {
    let head: String = token.chars().take(3).collect();
    let tail: String = {
        let chars: Vec<char> = token.chars().collect();
        chars[chars.len().saturating_sub(4)..].iter().collect()
    };
    format!("{head}****{tail}")
}

fn normalize(token: Option<String>) -> Option<String> {
    token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Resolves the API token and manages the stored one.
pub struct TokenManager {
    configured: Option<String>,
    store: Arc<dyn KeyValueStore>,
}

impl TokenManager {
    /// `configured` is the token from configuration, if any.
    pub fn new(configured: Option<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { configured: normalize(configured), store }
    }

    /// Validate and persist `token`.
    ///
    /// # Errors
    /// `InvalidInput` when the token does not have the ClickUp shape.
    pub async fn set(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if !validate_token(token) {
            return Err(ClickTickError::InvalidInput(INVALID_TOKEN_MESSAGE.into()));
        }
        save_json(self.store.as_ref(), TOKEN_KEY, &token).await?;
        info!("Stored API token");
        Ok(())
    }

    /// Remove the stored token. Returns whether one was stored.
    pub async fn delete(&self) -> Result<bool> {
        let existed = self.stored().await?.is_some();
        self.store.delete(TOKEN_KEY).await?;
        Ok(existed)
    }

    /// The persisted token, if any.
    pub async fn stored(&self) -> Result<Option<String>> {
        Ok(normalize(load_json::<String>(self.store.as_ref(), TOKEN_KEY).await?))
    }

    /// Where the active token comes from, masked.
    pub async fn status(&self) -> Result<TokenStatus> {
        if let Some(token) = &self.configured {
            return Ok(TokenStatus { source: TokenSource::Config, masked: Some(mask(token)) });
        }
        Ok(match self.stored().await? {
            Some(token) => TokenStatus { source: TokenSource::Stored, masked: Some(mask(&token)) },
            None => TokenStatus { source: TokenSource::Missing, masked: None },
        })
    }

    /// Configured token, else the stored one.
    pub async fn resolve(&self) -> Result<Option<String>> {
        match &self.configured {
            Some(token) => Ok(Some(token.clone())),
            None => self.stored().await,
        }
    }
}

#[async_trait]
impl AccessTokenProvider for TokenManager {
    async fn access_token(&self) -> std::result::Result<String, ApiError> {
        let token = self.resolve().await?.ok_or_else(|| ApiError::Auth(NO_TOKEN_MESSAGE.into()))?;

        if !validate_token(&token) {
            debug!(len = token.len(), "Rejected malformed API token");
            return Err(ApiError::Auth(INVALID_TOKEN_MESSAGE.into()));
        }

        Ok(token)
    }
}
