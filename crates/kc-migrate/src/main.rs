//! # kc-migrate
//!
//! Keycloak to Descope user migration.

#![forbid(unsafe_code)]
#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kc_descope::{DescopeClient, ManagementApi};
use kc_export::ExportDirectory;
use kc_migrate::{
    logging,
    output::{error, info, summary},
    Cli, MigrationConfig, Migrator,
};

#[tokio::main]
async fn main() {
    // Credentials may live in a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = MigrationConfig::from_cli(cli)?;

    let log_path = logging::init(&config.log_dir).context("failed to set up the log file")?;
    info(&format!("Logging to {}", log_path.display()));
    tracing::info!(config = ?config, "Loaded configuration");

    let client = match &config.base_url {
        Some(base_url) => {
            DescopeClient::with_base_url(&config.project_id, &config.management_key, base_url)
        }
        None => DescopeClient::new(&config.project_id, &config.management_key),
    }
    .context("failed to create the Descope client")?;
    tracing::info!(base_url = client.base_url(), "Using Descope API");

    let api: Arc<dyn ManagementApi> = Arc::new(client);
    let source = ExportDirectory::new(&config.path, &config.realm);
    let migrator = Migrator::new(api, source, config.options);

    let report = migrator.run().await;
    summary(&report);
    Ok(())
}
