use std::sync::Arc;

use clap::Parser;
use literacy_core::WordCatalog;
use services::{AppServices, Clock};

mod commands;
mod config;
mod logging;
mod speech;

use config::{AppConfig, Cli, prepare_sqlite_file};
use speech::ConsoleSpeech;

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;
    tracing::debug!(?config, "configuration resolved");
    let clock = Clock::system();

    let catalog = match &config.catalog_path {
        Some(path) => WordCatalog::from_path(path)?,
        None => WordCatalog::builtin(),
    };

    // Open + migrate SQLite at startup; core/services stay free of file handling.
    prepare_sqlite_file(&config.db_url)?;
    let services = AppServices::new_sqlite(
        &config.db_url,
        config.io_timeout,
        clock,
        catalog,
        Arc::new(ConsoleSpeech),
    )
    .await?;

    commands::dispatch(&services, &config.user, &clock, cli.command).await?;
    Ok(())
}

fn report_failure(err: &dyn std::error::Error) {
    tracing::error!(error = %err, "command failed");
}

#[tokio::main]
async fn main() {
    logging::init_tracing("info");
    if let Err(err) = run().await {
        report_failure(err.as_ref());
        std::process::exit(2);
    }
}
