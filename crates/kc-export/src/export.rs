//! Keycloak export file format.
//!
//! Models the parts of Keycloak's JSON realm export that the migration
//! reads. Every collection defaults to empty and unknown fields are
//! ignored, so partial exports (e.g. `--users different_files`) parse.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Component provider type that carries the declarative user profile.
pub const USER_PROFILE_PROVIDER: &str = "org.keycloak.userprofile.UserProfileProvider";

/// Component config key holding the user profile JSON document.
pub const USER_PROFILE_CONFIG_KEY: &str = "kc.user.profile.config";

// ============================================================================
// Realm Export Format
// ============================================================================

/// Realm metadata file (`<realm>-realm.json`).
///
/// Only the sections the migration reads are modelled. Users embedded with
/// `--users realm_file` are not read from here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmExport {
    /// Realm and client roles.
    #[serde(default)]
    pub roles: RolesExport,

    /// Top-level groups.
    #[serde(default)]
    pub groups: Vec<GroupExport>,

    /// Clients in the realm.
    #[serde(default)]
    pub clients: Vec<ClientExport>,

    /// Components keyed by provider type.
    #[serde(default)]
    pub components: HashMap<String, Vec<ComponentExport>>,
}

/// Roles container.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolesExport {
    /// Realm-level roles.
    #[serde(default)]
    pub realm: Vec<RoleExport>,

    /// Client-level roles (client_id -> roles).
    #[serde(default)]
    pub client: BTreeMap<String, Vec<RoleExport>>,
}

/// A single role.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleExport {
    /// Role name.
    pub name: String,
}

/// A top-level group. Subgroups are not migrated.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupExport {
    /// Group name.
    pub name: String,
}

// ============================================================================
// Client / Component Export Format
// ============================================================================

/// Client with its protocol mappers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientExport {
    /// Protocol mappers configured for this client.
    #[serde(default)]
    pub protocol_mappers: Vec<ProtocolMapperExport>,
}

/// Protocol mapper. Keycloak stores every config value as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolMapperExport {
    /// Mapper configuration (`user.attribute`, `multivalued`, ...).
    #[serde(default)]
    pub config: HashMap<String, String>,
}

/// Realm component; only its multi-valued configuration is read.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentExport {
    /// Component configuration.
    #[serde(default)]
    pub config: HashMap<String, Vec<String>>,
}

// ============================================================================
// User Export Format
// ============================================================================

/// User export file (`<realm>-users-<n>.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersExport {
    /// Users in this file.
    pub users: Vec<UserExport>,
}

/// Exported user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExport {
    /// Keycloak user ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Username.
    #[serde(default)]
    pub username: Option<String>,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Whether the email has been verified.
    #[serde(default)]
    pub email_verified: bool,

    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,

    /// Whether the user is enabled. Absent means enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Custom attributes. Keycloak writes lists of strings, but any JSON
    /// value is accepted.
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,

    /// Credentials for the user.
    #[serde(default)]
    pub credentials: Vec<CredentialExport>,

    /// Realm roles assigned to this user.
    #[serde(default)]
    pub realm_roles: Vec<String>,

    /// Client roles assigned to this user (client_id -> role names).
    #[serde(default)]
    pub client_roles: BTreeMap<String, Vec<String>>,

    /// Group paths this user belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl UserExport {
    /// Returns true unless the export explicitly marks the user disabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

/// Credential as written by the export.
///
/// `secret_data` and `credential_data` are themselves JSON documents
/// encoded as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialExport {
    /// Credential type (e.g., "password", "otp").
    #[serde(rename = "type", default)]
    pub credential_type: Option<String>,

    /// Secret data (`{"value": ..., "salt": ...}`).
    #[serde(default)]
    pub secret_data: Option<String>,

    /// Credential data (`{"algorithm": ..., "hashIterations": ...}`).
    #[serde(default)]
    pub credential_data: Option<String>,
}

impl CredentialExport {
    /// Returns true for password credentials.
    #[must_use]
    pub fn is_password(&self) -> bool {
        self.credential_type.as_deref() == Some("password")
    }
}
