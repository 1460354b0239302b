//! Roles, groups and custom attributes.
//!
//! Each step diffs the names found in the export against the names the
//! destination already has and creates only what is missing. Running a
//! step twice creates nothing the second time.

use std::collections::HashSet;

use kc_descope::{AttributeCreateOutcome, CustomAttribute, CustomAttributeType};
use kc_export::{extract, CustomAttributeDef};

use crate::config::GroupMapping;
use crate::migrator::Migrator;
use crate::output;
use crate::report::StepResult;

// ============================================================================
// Set Difference
// ============================================================================

/// Source names partitioned against the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameDiff {
    /// Names to create, in first-seen source order.
    pub missing: Vec<String>,
    /// Distinct source names the destination already has.
    pub existing: usize,
}

/// Diffs source names against destination names.
///
/// Duplicates in the source collapse to one entry.
#[must_use]
pub fn diff_names(source: &[String], destination: &[String]) -> NameDiff {
    let destination: HashSet<&str> = destination.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut diff = NameDiff::default();

    for name in source {
        if !seen.insert(name.as_str()) {
            continue;
        }
        if destination.contains(name.as_str()) {
            diff.existing += 1;
        } else {
            diff.missing.push(name.clone());
        }
    }
    diff
}

fn attribute_type(def: &CustomAttributeDef) -> CustomAttributeType {
    if def.multivalued {
        CustomAttributeType::List
    } else {
        CustomAttributeType::Text
    }
}

// ============================================================================
// Steps
// ============================================================================

impl Migrator {
    /// Creates every source role missing at the destination.
    pub async fn create_roles(&self) -> StepResult {
        output::info("Creating roles in Descope...");

        let diff = diff_names(&self.source_roles(), &self.destination_roles().await);
        let mut step = StepResult {
            existing: diff.existing,
            ..StepResult::default()
        };

        for name in &diff.missing {
            match self.api.create_role(name).await {
                Ok(()) => {
                    tracing::info!(role = %name, "Created role");
                    step.record_created();
                }
                Err(e) => {
                    tracing::error!(role = %name, "Failed to create role: {e}");
                    step.record_failure();
                }
            }
        }

        output::success(&format!("Created {} roles in Descope", step.created));
        step
    }

    /// Creates every top-level source group missing at the destination,
    /// as a tenant or a role depending on the group mapping.
    pub async fn create_groups(&self) -> StepResult {
        let mapping = self.options.group_mapping;
        if mapping == GroupMapping::None {
            tracing::info!("Group mapping disabled, skipping groups");
            return StepResult::default();
        }

        output::info(&format!("Creating groups as {mapping} in Descope..."));

        let destination = match mapping {
            GroupMapping::Tenants => self.destination_tenants().await,
            _ => self.destination_roles().await,
        };
        let diff = diff_names(&self.source_groups(), &destination);
        let mut step = StepResult {
            existing: diff.existing,
            ..StepResult::default()
        };

        for name in &diff.missing {
            let result = match mapping {
                GroupMapping::Tenants => self.api.create_tenant(name, name).await,
                _ => self.api.create_role(name).await,
            };
            match result {
                Ok(()) => {
                    tracing::info!(group = %name, mapping = %mapping, "Created group");
                    step.record_created();
                }
                Err(e) => {
                    tracing::error!(group = %name, "Failed to create group as {mapping}: {e}");
                    step.record_failure();
                }
            }
        }

        output::success(&format!(
            "Created {} groups as {mapping} in Descope",
            step.created
        ));
        step
    }

    /// Creates every source custom attribute missing at the destination,
    /// in a single call.
    pub async fn create_custom_attributes(&self) -> StepResult {
        output::info("Creating custom attributes in Descope...");

        let destination: HashSet<String> =
            self.destination_custom_attributes().await.into_iter().collect();
        let mut seen = HashSet::new();
        let mut step = StepResult::default();
        let mut missing = Vec::new();

        for def in self.source_custom_attributes() {
            if !seen.insert(def.name.clone()) {
                continue;
            }
            if destination.contains(&def.name) {
                step.existing += 1;
            } else {
                missing.push(CustomAttribute {
                    attribute_type: attribute_type(&def),
                    name: def.name,
                    display_name: def.display_name,
                });
            }
        }

        if missing.is_empty() {
            output::info("No new custom attributes to create in Descope");
            return step;
        }

        match self.api.create_custom_attributes(&missing).await {
            Ok(AttributeCreateOutcome::Created) => {
                step.created = missing.len();
                output::success(&format!(
                    "Created {} custom attributes in Descope",
                    step.created
                ));
            }
            Ok(AttributeCreateOutcome::AlreadyExists) => {
                step.existing += missing.len();
                output::info("Some or all custom attributes already exist in Descope");
            }
            Err(e) => {
                step.failed = missing.len();
                tracing::error!(count = missing.len(), "Failed to create custom attributes: {e}");
                output::warning("Failed to create custom attributes");
            }
        }
        step
    }

    // ------------------------------------------------------------------------
    // Readers. Failures are logged and read as "nothing there".
    // ------------------------------------------------------------------------

    fn source_roles(&self) -> Vec<String> {
        match self.source.load_realms() {
            Ok(realms) => extract::role_names(&realms),
            Err(e) => {
                tracing::error!("Failed to read Keycloak roles: {e}");
                Vec::new()
            }
        }
    }

    fn source_groups(&self) -> Vec<String> {
        match self.source.load_first_realm() {
            Ok(Some(realm)) => extract::group_names(&realm),
            Ok(None) => {
                tracing::warn!("No realm file found, no groups to migrate");
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Failed to read Keycloak groups: {e}");
                Vec::new()
            }
        }
    }

    fn source_custom_attributes(&self) -> Vec<CustomAttributeDef> {
        let realm = match self.source.load_first_realm() {
            Ok(Some(realm)) => realm,
            Ok(None) => {
                tracing::warn!("No realm file found, no custom attributes to migrate");
                return Vec::new();
            }
            Err(e) => {
                tracing::error!("Failed to read Keycloak custom attributes: {e}");
                return Vec::new();
            }
        };
        extract::custom_attributes(&realm).unwrap_or_else(|e| {
            tracing::error!("Failed to read Keycloak user profile: {e}");
            Vec::new()
        })
    }

    async fn destination_roles(&self) -> Vec<String> {
        self.api.load_roles().await.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch roles from Descope: {e}");
            Vec::new()
        })
    }

    async fn destination_tenants(&self) -> Vec<String> {
        self.api.load_tenants().await.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch tenants from Descope: {e}");
            Vec::new()
        })
    }

    async fn destination_custom_attributes(&self) -> Vec<String> {
        self.api.load_custom_attributes().await.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch custom attributes from Descope: {e}");
            Vec::new()
        })
    }
}
