//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TICK_INTERVAL_MS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ClickUp access.
    pub api: ApiConfig,
    /// Timer behavior.
    pub timer: TimerConfig,
    /// State persistence.
    pub storage: StorageConfig,
    /// Report targets.
    pub reporting: ReportingConfig,
    /// Tracing output.
    pub logging: LoggingConfig,
}

/// Remote service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// ClickUp API root, without a trailing slash.
    pub base_url: String,
    /// Personal token; wins over a stored one.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout_seconds: u64,
    /// Tries for idempotent requests, the first included.
    pub max_attempts: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            timeout_seconds: 30,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
        }
    }
}

/// Live timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Display tick period.
    pub tick_interval_ms: u64,
    /// Bound on timer start and stop calls.
    pub request_timeout_seconds: u64,
    /// Mark started entries billable.
    pub billable: bool,
}

impl TimerConfig {
    /// Tick period as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Remote call timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            billable: false,
        }
    }
}

/// Local key/value storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON state file.
    pub path: String,
    /// Keep state in process memory only; nothing survives the command.
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: "clicktick-state.json".to_string(), in_memory: false }
    }
}

/// Minimum-hours targets for the tracked-time buckets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Target for today.
    pub daily_target_hours: Option<f64>,
    /// Target for this week.
    pub weekly_target_hours: Option<f64>,
    /// Target for this month.
    pub monthly_target_hours: Option<f64>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive.
    pub level: String,
    /// Emit JSON lines instead of text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
