//! Migration driver.

use std::sync::Arc;

use chrono::Utc;
use kc_descope::ManagementApi;
use kc_export::ExportDirectory;

use crate::config::{GroupMapping, MigrationOptions};
use crate::report::MigrationReport;

/// Runs the migration steps against a destination.
///
/// Steps run sequentially, in dependency order: roles, groups, custom
/// attributes, then users (which reference all three). Each step logs and
/// swallows its own failures.
pub struct Migrator {
    pub(crate) api: Arc<dyn ManagementApi>,
    pub(crate) source: ExportDirectory,
    pub(crate) options: MigrationOptions,
}

impl Migrator {
    /// Creates a migrator.
    pub fn new(
        api: Arc<dyn ManagementApi>,
        source: ExportDirectory,
        options: MigrationOptions,
    ) -> Self {
        Self {
            api,
            source,
            options,
        }
    }

    /// Runs every step.
    pub async fn run(&self) -> MigrationReport {
        let mut report = MigrationReport::new(Utc::now());

        tracing::info!(
            path = %self.source.path().display(),
            realm = self.source.realm(),
            map_groups_to = %self.options.group_mapping,
            federated_apps = ?self.options.federated_apps,
            "Starting migration"
        );

        report.roles = self.create_roles().await;
        if self.options.group_mapping != GroupMapping::None {
            report.groups = Some(self.create_groups().await);
        }
        report.custom_attributes = self.create_custom_attributes().await;
        report.users = self.process_users().await;

        let report = report.complete();
        match serde_json::to_string(&report) {
            Ok(json) => tracing::info!(report = %json, "Migration finished"),
            Err(e) => tracing::warn!("Failed to serialize report: {e}"),
        }
        report
    }
}
