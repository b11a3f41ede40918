use std::time::Duration;

use clicktick_domain::config::LoggingConfig;
use clicktick_domain::{ClickTickError, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so it
/// never mixes with command output.
///
/// # Errors
/// `ClickTickError::Config` for an unparsable level, or when a subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            ClickTickError::Config(format!("Invalid log level {:?}: {e}", config.level))
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.with_target(false).compact().try_init()
    };

    installed.map_err(|e| ClickTickError::Config(format!("Failed to install subscriber: {e}")))
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a logical identifier such as `"tracking::start"` and must not
/// carry user data.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}
