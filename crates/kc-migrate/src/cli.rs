//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::GroupMapping;

/// Create users in Descope from Keycloak export files.
#[derive(Debug, Parser)]
#[command(name = "kc-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the exported users folder.
    #[arg(long)]
    pub path: PathBuf,

    /// Name of the Keycloak realm.
    #[arg(long)]
    pub realm: String,

    /// Whether groups become tenants or roles in Descope.
    #[arg(long = "map_groups_to", value_enum)]
    pub map_groups_to: GroupMapping,

    /// Federated app IDs granted to every user, separated by commas.
    #[arg(long = "federated_apps")]
    pub federated_apps: Option<String>,

    /// Management API base URL (defaults to the project's region).
    #[arg(long = "base_url", env = "DESCOPE_BASE_URL")]
    pub base_url: Option<String>,

    /// Pause after each user file, in milliseconds.
    #[arg(long = "batch_pause_ms", default_value_t = 1000)]
    pub batch_pause_ms: u64,

    /// Directory for the run's log file.
    #[arg(long = "log_dir", default_value = "logs")]
    pub log_dir: PathBuf,
}
