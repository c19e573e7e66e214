use anyhow::Context;
use clap::Parser;

use codeyatri_dashboard_lib::bootstrap::{init_tracing_subscriber, resolve_config, wire_app};
use codeyatri_dashboard_lib::cli::{run, Cli};
use cy_core::AppConfig;
use cy_infra::AppDirs;

async fn start(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let wired = wire_app(&config, cli.storage_mode())?;
    run(cli.command, wired).await
}

fn main() -> anyhow::Result<()> {
    // Environment overrides may come from a .env file; a missing one is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;

    let logs_dir = AppDirs::new(config.data_dir.clone()).logs_dir();
    if let Err(err) = init_tracing_subscriber(Some(&logs_dir)) {
        eprintln!("tracing init failed: {err}");
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration resolved");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(start(cli, config))
}
