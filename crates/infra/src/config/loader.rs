//! Configuration loader
//!
//! Loads application configuration from a file and environment overrides.
//!
//! ## Loading Strategy
//! 1. Search the standard locations for a config file (TOML or JSON)
//! 2. Fall back to defaults when none exists
//! 3. Apply `CLICKTICK_*` environment overrides on top
//!
//! ## Environment Variables
//! - `CLICKTICK_API_TOKEN`: ClickUp personal API token
//! - `CLICKTICK_API_BASE_URL`: API base URL
//! - `CLICKTICK_STORAGE_PATH`: State file path
//! - `CLICKTICK_STORAGE_IN_MEMORY`: Keep state in memory only (true/false)
//! - `CLICKTICK_LOG_LEVEL`: Log level or `EnvFilter` directive
//! - `CLICKTICK_LOG_JSON`: Emit JSON logs (true/false)
//! - `CLICKTICK_TICK_INTERVAL_MS`: Timer tick period in milliseconds
//! - `CLICKTICK_REQUEST_TIMEOUT_SECS`: Timer request timeout in seconds
//! - `CLICKTICK_BILLABLE`: Mark started entries billable (true/false)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./clicktick.{toml,json}` then `./config.{toml,json}`
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to the executable location

use std::path::{Path, PathBuf};

use clicktick_domain::{ClickTickError, Config, Result};
use tracing::{debug, info, warn};
use url::Url;

use crate::api::validate_token;

const FILE_NAMES: [&str; 4] = ["clicktick.toml", "clicktick.json", "config.toml", "config.json"];

/// Load configuration: the first file found (or defaults) plus environment overrides.
///
/// # Errors
/// Returns `ClickTickError::Config` if a config file exists but is invalid,
/// or an override has an invalid value.
pub fn load() -> Result<Config> {
    let config = match find_config_file() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            debug!("No config file found, using defaults");
            Config::default()
        }
    };
    apply_env_overrides(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations.
///
/// # Errors
/// Returns `ClickTickError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ClickTickError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            ClickTickError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ClickTickError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, format detected by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ClickTickError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ClickTickError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ClickTickError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Apply `CLICKTICK_*` variables from the process environment.
///
/// # Errors
/// Returns `ClickTickError::Config` for unparsable values.
pub fn apply_env_overrides(config: Config) -> Result<Config> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup.
///
/// # Errors
/// Returns `ClickTickError::Config` for unparsable values.
pub fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(token) = var("CLICKTICK_API_TOKEN") {
        config.api.token = Some(token);
    }
    if let Some(base_url) = var("CLICKTICK_API_BASE_URL") {
        config.api.base_url = base_url;
    }
    if let Some(path) = var("CLICKTICK_STORAGE_PATH") {
        config.storage.path = path;
    }
    if let Some(in_memory) = var("CLICKTICK_STORAGE_IN_MEMORY") {
        config.storage.in_memory = parse_bool(&in_memory);
    }
    if let Some(level) = var("CLICKTICK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("CLICKTICK_LOG_JSON") {
        config.logging.json = parse_bool(&json);
    }
    if let Some(billable) = var("CLICKTICK_BILLABLE") {
        config.timer.billable = parse_bool(&billable);
    }
    if let Some(raw) = var("CLICKTICK_TICK_INTERVAL_MS") {
        config.timer.tick_interval_ms = parse_number("CLICKTICK_TICK_INTERVAL_MS", &raw)?;
    }
    if let Some(raw) = var("CLICKTICK_REQUEST_TIMEOUT_SECS") {
        config.timer.request_timeout_seconds = parse_number("CLICKTICK_REQUEST_TIMEOUT_SECS", &raw)?;
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    Url::parse(&config.api.base_url).map_err(|e| {
        ClickTickError::Config(format!("Invalid API base URL {:?}: {e}", config.api.base_url))
    })?;

    if let Some(token) = config.api.token.as_deref() {
        if !validate_token(token) {
            warn!("Configured API token does not look like a ClickUp token");
        }
    }
    Ok(())
}

fn parse_number(key: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|e| ClickTickError::Config(format!("Invalid {key}: {e}")))
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_bool_parsing() {
        for truthy in ["1", "true", "YES", "On"] {
            assert!(parse_bool(truthy), "{truthy}");
        }
        for falsy in ["0", "false", "no", "off", "maybe"] {
            assert!(!parse_bool(falsy), "{falsy}");
        }
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = apply_overrides_from(
            Config::default(),
            lookup(&[
                ("CLICKTICK_API_TOKEN", " pk_1_abc "),
                ("CLICKTICK_STORAGE_PATH", "/tmp/state.json"),
                ("CLICKTICK_STORAGE_IN_MEMORY", "yes"),
                ("CLICKTICK_TICK_INTERVAL_MS", "250"),
                ("CLICKTICK_LOG_JSON", "true"),
                ("CLICKTICK_LOG_LEVEL", ""),
            ]),
        )
        .unwrap();

        assert_eq!(config.api.token.as_deref(), Some("pk_1_abc"));
        assert_eq!(config.storage.path, "/tmp/state.json");
        assert!(config.storage.in_memory);
        assert_eq!(config.timer.tick_interval_ms, 250);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let err = apply_overrides_from(
            Config::default(),
            lookup(&[("CLICKTICK_REQUEST_TIMEOUT_SECS", "soon")]),
        )
        .unwrap_err();
        assert!(matches!(err, ClickTickError::Config(msg) if msg.contains("CLICKTICK_REQUEST_TIMEOUT_SECS")));

        let err =
            apply_overrides_from(Config::default(), lookup(&[("CLICKTICK_API_BASE_URL", "not a url")]))
                .unwrap_err();
        assert!(matches!(err, ClickTickError::Config(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_config("", Path::new("settings.yaml")).unwrap_err();
        assert!(matches!(err, ClickTickError::Config(msg) if msg.contains("yaml")));
    }
}
