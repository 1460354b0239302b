//! Management API request and response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Hashed passwords
// ============================================================================

/// Pre-hashed password imported alongside a user.
///
/// Serializes with the algorithm as the single key, e.g.
/// `{"pbkdf2": {"hash": ..., "salt": ..., "iterations": ..., "type": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashedPassword {
    /// PBKDF2 hash.
    Pbkdf2(Pbkdf2Hash),
    /// Argon2 hash.
    Argon2(Argon2Hash),
}

/// PBKDF2 parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pbkdf2Hash {
    /// Base64 hash value.
    pub hash: String,
    /// Base64 salt.
    pub salt: String,
    /// Iteration count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    /// HMAC digest (`sha1`, `sha256`, `sha512`).
    #[serde(rename = "type")]
    pub hash_type: String,
}

/// Argon2 parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Hash {
    /// Base64 hash value.
    pub hash: String,
    /// Base64 salt.
    pub salt: String,
    /// Time cost.
    pub iterations: u32,
    /// Memory cost in KiB.
    pub memory: u32,
    /// Parallelism.
    pub threads: u32,
}

// ============================================================================
// Users
// ============================================================================

/// Tenant membership of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTenant {
    /// Tenant ID.
    pub tenant_id: String,
}

/// A user in a batch create request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUser {
    /// Primary login identifier.
    pub login_id: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email is verified.
    #[serde(default)]
    pub verified_email: bool,
    /// Extra login identifiers.
    #[serde(default)]
    pub additional_identifiers: Vec<String>,
    /// Imported password hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_password: Option<HashedPassword>,
    /// Project-level role names.
    #[serde(default)]
    pub role_names: Vec<String>,
    /// Given name.
    #[serde(default)]
    pub given_name: String,
    /// Family name.
    #[serde(default)]
    pub family_name: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Custom attribute values.
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, serde_json::Value>,
    /// Tenant memberships.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_tenants: Vec<UserTenant>,
    /// Federated (SSO) applications the user may access.
    #[serde(default, rename = "ssoAppIds", skip_serializing_if = "Vec::is_empty")]
    pub sso_app_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchCreateRequest<'a> {
    pub users: &'a [BatchUser],
    pub invite: bool,
    pub send_mail: bool,
    #[serde(rename = "sendSMS")]
    pub send_sms: bool,
}

/// Response of the batch create endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateResponse {
    /// Users that were created.
    #[serde(default)]
    pub created_users: Vec<serde_json::Value>,
    /// Users the API rejected.
    #[serde(default)]
    pub failed_users: Vec<FailedUser>,
}

/// A user rejected by a batch create.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailedUser {
    /// Failure reason.
    #[serde(default)]
    pub failure: String,
    /// The rejected user as echoed back by the API.
    #[serde(default)]
    pub user: serde_json::Value,
}

impl FailedUser {
    /// Login ID of the rejected user, when echoed back.
    #[must_use]
    pub fn login_id(&self) -> Option<&str> {
        self.user
            .get("loginIds")
            .and_then(|ids| ids.get(0))
            .or_else(|| self.user.get("loginId"))
            .and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStatusRequest<'a> {
    pub login_id: &'a str,
    pub status: &'a str,
}

// ============================================================================
// Roles and tenants
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CreateRoleRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RolesResponse {
    #[serde(default)]
    pub roles: Vec<NamedEntity>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTenantRequest<'a> {
    pub name: &'a str,
    pub id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TenantsResponse {
    #[serde(default)]
    pub tenants: Vec<TenantEntity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedEntity {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TenantEntity {
    pub id: String,
}

// ============================================================================
// Custom attributes
// ============================================================================

/// Custom attribute value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum CustomAttributeType {
    /// Free text.
    Text,
    /// List of strings.
    List,
}

impl From<CustomAttributeType> for u8 {
    fn from(value: CustomAttributeType) -> Self {
        match value {
            CustomAttributeType::Text => 1,
            CustomAttributeType::List => 5,
        }
    }
}

/// Custom attribute definition to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAttribute {
    /// Machine name.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Value type.
    #[serde(rename = "type")]
    pub attribute_type: CustomAttributeType,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateCustomAttributesRequest<'a> {
    pub attributes: &'a [CustomAttribute],
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CustomAttributesResponse {
    #[serde(default)]
    pub data: Vec<NamedEntity>,
}

/// Outcome of a custom attribute create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCreateOutcome {
    /// All attributes were created.
    Created,
    /// The API reported a conflict: some or all already exist.
    AlreadyExists,
}
