//! Schema extraction from realm exports.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ExportResult;
use crate::export::{RealmExport, USER_PROFILE_CONFIG_KEY, USER_PROFILE_PROVIDER};

/// User fields every identity platform models natively. They are never
/// migrated as custom attributes.
pub const BUILT_IN_USER_FIELDS: [&str; 4] = ["username", "email", "firstName", "lastName"];

/// A custom user attribute declared by the realm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAttributeDef {
    /// Attribute name.
    pub name: String,
    /// Human readable name.
    pub display_name: String,
    /// Whether the attribute holds a list of values.
    pub multivalued: bool,
}

impl CustomAttributeDef {
    fn new(name: impl Into<String>, display_name: Option<String>, multivalued: bool) -> Self {
        let name = name.into();
        Self {
            display_name: display_name.unwrap_or_else(|| name.clone()),
            name,
            multivalued,
        }
    }
}

/// User profile document embedded in the realm components.
#[derive(Debug, Default, Deserialize)]
struct UserProfileConfig {
    #[serde(default)]
    attributes: Vec<UserProfileAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserProfileAttribute {
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    multivalued: bool,
}

fn is_built_in(name: &str) -> bool {
    BUILT_IN_USER_FIELDS.contains(&name)
}

/// Realm and client role names across all realm files, in file order.
/// Duplicates are kept; callers compare as sets.
#[must_use]
pub fn role_names(realms: &[RealmExport]) -> Vec<String> {
    realms
        .iter()
        .flat_map(|realm| {
            let client_roles = realm.roles.client.values().flatten();
            realm.roles.realm.iter().chain(client_roles)
        })
        .map(|role| role.name.clone())
        .collect()
}

/// Top-level group names of a realm. Subgroups are not migrated.
#[must_use]
pub fn group_names(realm: &RealmExport) -> Vec<String> {
    realm.groups.iter().map(|group| group.name.clone()).collect()
}

/// Custom attributes declared by a realm.
///
/// Attributes come from the declarative user profile first, then from
/// client protocol mappers that reference a `user.attribute` not already
/// declared. Built-in fields are skipped.
///
/// # Errors
///
/// Returns an error if a user profile document is not valid JSON.
pub fn custom_attributes(realm: &RealmExport) -> ExportResult<Vec<CustomAttributeDef>> {
    let mut attributes = Vec::new();

    let providers = realm
        .components
        .get(USER_PROFILE_PROVIDER)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for provider in providers {
        let Some(raw) = provider
            .config
            .get(USER_PROFILE_CONFIG_KEY)
            .and_then(|values| values.first())
        else {
            continue;
        };

        let profile: UserProfileConfig = serde_json::from_str(raw)?;
        attributes.extend(
            profile
                .attributes
                .into_iter()
                .filter_map(|attr| {
                    let name = attr.name?;
                    (!is_built_in(&name))
                        .then(|| CustomAttributeDef::new(name, attr.display_name, attr.multivalued))
                }),
        );
    }

    let mut seen: HashSet<String> = attributes.iter().map(|a| a.name.clone()).collect();

    for mapper in realm.clients.iter().flat_map(|c| &c.protocol_mappers) {
        let Some(user_attr) = mapper.config.get("user.attribute") else {
            continue;
        };
        if user_attr.is_empty() || is_built_in(user_attr) || seen.contains(user_attr) {
            continue;
        }

        let multivalued = mapper.config.get("multivalued").map(String::as_str) == Some("true");
        attributes.push(CustomAttributeDef::new(user_attr.clone(), None, multivalued));
        seen.insert(user_attr.clone());
    }

    Ok(attributes)
}
