//! Keycloak user to Descope user mapping.

use std::collections::BTreeMap;

use kc_descope::{BatchUser, UserTenant};
use kc_export::UserExport;
use serde_json::Value;

use crate::config::{GroupMapping, MigrationOptions};
use crate::credential::translate_credentials;
use crate::error::{MigrateError, MigrateResult};

/// Login ID of a user: the username, or the email when there is none.
#[must_use]
pub fn login_id(user: &UserExport) -> Option<&str> {
    non_empty(user.username.as_deref()).or_else(|| non_empty(user.email.as_deref()))
}

/// Extra identifiers: the email, when the login ID is a distinct username.
#[must_use]
pub fn additional_identifiers(user: &UserExport) -> Vec<String> {
    match (non_empty(user.username.as_deref()), non_empty(user.email.as_deref())) {
        (Some(username), Some(email)) if username != email => vec![email.to_string()],
        _ => Vec::new(),
    }
}

/// Collapses single-element lists to their element.
#[must_use]
pub fn custom_attributes(attributes: &BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    attributes
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Array(items) if items.len() == 1 => items[0].clone(),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Group path without its leading `/`.
#[must_use]
pub fn group_name(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Maps an exported user to a batch create entry.
///
/// # Errors
///
/// Returns [`MigrateError::MissingLoginId`] if the user has neither a
/// username nor an email.
pub fn to_batch_user(user: &UserExport, options: &MigrationOptions) -> MigrateResult<BatchUser> {
    let login_id = login_id(user).ok_or(MigrateError::MissingLoginId)?;

    let mut role_names = user.realm_roles.clone();
    role_names.extend(user.client_roles.values().flatten().cloned());

    let mut user_tenants = Vec::new();
    match options.group_mapping {
        GroupMapping::Roles => {
            role_names.extend(user.groups.iter().map(|g| group_name(g).to_string()));
        }
        GroupMapping::Tenants => {
            user_tenants = user
                .groups
                .iter()
                .map(|g| UserTenant {
                    tenant_id: group_name(g).to_string(),
                })
                .collect();
        }
        GroupMapping::None => {}
    }

    let given_name = user.first_name.clone().unwrap_or_default();
    let family_name = user.last_name.clone().unwrap_or_default();
    let display_name = format!("{given_name} {family_name}").trim().to_string();

    Ok(BatchUser {
        login_id: login_id.to_string(),
        email: non_empty(user.email.as_deref()).map(str::to_string),
        verified_email: user.email_verified,
        additional_identifiers: additional_identifiers(user),
        hashed_password: translate_credentials(&user.credentials),
        role_names,
        given_name,
        family_name,
        display_name,
        custom_attributes: custom_attributes(&user.attributes),
        user_tenants,
        sso_app_ids: options.federated_apps.clone(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
