//! Command execution helpers
//!
//! Every command goes through [`execute_command`] so timing, outcome logging
//! and error labels stay uniform.

use std::future::Future;
use std::time::{Duration, Instant};

use clicktick_domain::{ClickTickError, Result};
use tracing::warn;

use crate::utils::logging::log_command_execution;

/// Run `command_fn`, logging its duration and outcome under `command_name`.
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;
    let elapsed = start.elapsed();

    if let Err(err) = &result {
        warn!(command = command_name, error_kind = err.label(), error = %err, "command failed");
    }
    log_command_execution(command_name, elapsed, result.is_ok());

    result
}

/// Bound a remote call by `limit`.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, call).await.map_err(|_| ClickTickError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_results_through() {
        let ok = execute_command("test::ok", || async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<()> = execute_command("test::err", || async {
            Err(ClickTickError::NotFound("task".into()))
        })
        .await;
        assert_eq!(err, Err(ClickTickError::NotFound("task".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_maps_to_domain_error() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        };
        let err = with_timeout(Duration::from_secs(1), slow).await.unwrap_err();
        assert_eq!(err, ClickTickError::Timeout(Duration::from_secs(1)));
    }
}
