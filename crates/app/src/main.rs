//! ClickTick - ClickUp time tracking from the terminal

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use clicktick_infra::config;
use clicktick_lib::cli::{self, Cli};
use clicktick_lib::utils::logging::init_tracing;
use clicktick_lib::AppContext;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match cli.config.clone() {
        Some(path) => config::apply_env_overrides(config::load_from_file(Some(path))?)?,
        None => config::load()?,
    };

    init_tracing(&config.logging).context("failed to initialize logging")?;
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env loaded"),
    }
    info!(command = ?cli.command, "ClickTick starting");

    let ctx = AppContext::new(config).context("failed to build application context")?;

    let mut stdout = std::io::stdout();
    let result = cli::run(cli.command, &ctx, &mut stdout).await;
    ctx.shutdown();
    stdout.flush().ok();

    result.map_err(anyhow::Error::from)
}
