//! Migration configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{MigrateError, MigrateResult};

/// How Keycloak groups are represented in Descope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupMapping {
    /// Each group becomes a tenant whose ID is the group name.
    Tenants,
    /// Each group becomes a project-level role.
    Roles,
    /// Groups are not migrated.
    #[default]
    None,
}

impl GroupMapping {
    /// Returns the flag value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tenants => "tenants",
            Self::Roles => "roles",
            Self::None => "none",
        }
    }
}

impl fmt::Display for GroupMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options that shape what the migration writes.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Group mapping policy.
    pub group_mapping: GroupMapping,
    /// Federated app IDs granted to every user.
    pub federated_apps: Vec<String>,
    /// Pause after each user file.
    pub batch_pause: Duration,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            group_mapping: GroupMapping::default(),
            federated_apps: Vec::new(),
            batch_pause: Duration::from_secs(1),
        }
    }
}

/// Fully resolved run configuration.
#[derive(Clone)]
pub struct MigrationConfig {
    /// Export directory.
    pub path: PathBuf,
    /// Realm name (filename prefix).
    pub realm: String,
    /// Descope project ID.
    pub project_id: String,
    /// Descope management key.
    pub management_key: String,
    /// API base URL override.
    pub base_url: Option<String>,
    /// Log file directory.
    pub log_dir: PathBuf,
    /// Migration options.
    pub options: MigrationOptions,
}

impl fmt::Debug for MigrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationConfig")
            .field("path", &self.path)
            .field("realm", &self.realm)
            .field("project_id", &self.project_id)
            .field("management_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("log_dir", &self.log_dir)
            .field("options", &self.options)
            .finish()
    }
}

/// Environment variable holding the Descope project ID.
pub const PROJECT_ID_VAR: &str = "DESCOPE_PROJECT_ID";

/// Environment variable holding the Descope management key.
pub const MANAGEMENT_KEY_VAR: &str = "DESCOPE_MANAGEMENT_KEY";

impl MigrationConfig {
    /// Builds the configuration from parsed arguments and the environment.
    ///
    /// Credentials are only read from `DESCOPE_PROJECT_ID` and
    /// `DESCOPE_MANAGEMENT_KEY`, including a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is missing or the realm is empty.
    pub fn from_cli(cli: Cli) -> MigrateResult<Self> {
        Self::from_parts(
            cli,
            dotenvy::var(PROJECT_ID_VAR).ok(),
            dotenvy::var(MANAGEMENT_KEY_VAR).ok(),
        )
    }

    /// Builds the configuration from parsed arguments and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is missing or blank, or the realm
    /// is empty.
    pub fn from_parts(
        cli: Cli,
        project_id: Option<String>,
        management_key: Option<String>,
    ) -> MigrateResult<Self> {
        let (Some(project_id), Some(management_key)) =
            (non_empty(project_id), non_empty(management_key))
        else {
            return Err(MigrateError::Config(format!(
                "environment variables {PROJECT_ID_VAR} and {MANAGEMENT_KEY_VAR} must be set"
            )));
        };

        if cli.realm.trim().is_empty() {
            return Err(MigrateError::InvalidArgument("realm must not be empty".to_string()));
        }

        Ok(Self {
            path: cli.path,
            realm: cli.realm,
            project_id,
            management_key,
            base_url: non_empty(cli.base_url),
            log_dir: cli.log_dir,
            options: MigrationOptions {
                group_mapping: cli.map_groups_to,
                federated_apps: parse_federated_apps(cli.federated_apps.as_deref()),
                batch_pause: Duration::from_millis(cli.batch_pause_ms),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated app ID list, trimming entries and dropping
/// empty ones.
#[must_use]
pub fn parse_federated_apps(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|app| !app.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
