//! Password credential translation.
//!
//! Keycloak stores a password credential as two embedded JSON documents:
//!
//! - `secretData`: `{"value": "<base64 hash>", "salt": "<base64 salt>"}`
//! - `credentialData`: `{"hashIterations": 27500, "algorithm": "pbkdf2-sha256",
//!   "additionalParameters": {"memory": ["7168"], ...}}`
//!
//! Only PBKDF2 variants and Argon2 can be imported. Any other algorithm
//! leaves the user without a password: they will have to reset it.

use std::collections::HashMap;

use kc_descope::{Argon2Hash, HashedPassword, Pbkdf2Hash};
use kc_export::CredentialExport;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{MigrateError, MigrateResult};

const DEFAULT_PBKDF2_DIGEST: &str = "sha1";
const DEFAULT_ARGON2_ITERATIONS: u32 = 3;
const DEFAULT_ARGON2_MEMORY: u32 = 7168;
const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

#[derive(Debug, Default, Deserialize)]
struct SecretData {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    salt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialData {
    #[serde(default)]
    algorithm: Option<String>,
    #[serde(default)]
    hash_iterations: Option<Value>,
    #[serde(default)]
    additional_parameters: HashMap<String, Value>,
}

/// Translates a user's credentials into an importable password hash.
///
/// Only the first `password` credential is considered. Returns `None`, and
/// logs a warning, when there is none that can be imported.
#[must_use]
pub fn translate_credentials(credentials: &[CredentialExport]) -> Option<HashedPassword> {
    let password = credentials.iter().find(|c| c.is_password())?;

    match translate_password(password) {
        Ok(hashed) => Some(hashed),
        Err(e) => {
            tracing::warn!("{e}; password must be reset");
            None
        }
    }
}

/// Translates a single password credential.
///
/// # Errors
///
/// Returns [`MigrateError::UnsupportedAlgorithm`] for algorithms other than
/// `pbkdf2*` and `argon2`, and [`MigrateError::InvalidCredential`] when the
/// embedded data cannot be read.
pub fn translate_password(credential: &CredentialExport) -> MigrateResult<HashedPassword> {
    let secret: SecretData = parse_embedded("secretData", credential.secret_data.as_deref())?;
    let data: CredentialData =
        parse_embedded("credentialData", credential.credential_data.as_deref())?;

    let algorithm = data.algorithm.as_deref().unwrap_or_default();
    let hash = secret.value.unwrap_or_default();
    let salt = secret.salt.unwrap_or_default();

    if algorithm.starts_with("pbkdf2") {
        let iterations = data
            .hash_iterations
            .as_ref()
            .map(|v| numeric("hashIterations", v))
            .transpose()?;

        Ok(HashedPassword::Pbkdf2(Pbkdf2Hash {
            hash,
            salt,
            iterations,
            hash_type: pbkdf2_digest(algorithm).to_string(),
        }))
    } else if algorithm == "argon2" {
        let params = &data.additional_parameters;
        Ok(HashedPassword::Argon2(Argon2Hash {
            hash,
            salt,
            iterations: numeric_or(
                "hashIterations",
                data.hash_iterations.as_ref(),
                DEFAULT_ARGON2_ITERATIONS,
            )?,
            memory: numeric_or("memory", params.get("memory"), DEFAULT_ARGON2_MEMORY)?,
            threads: numeric_or(
                "parallelism",
                params.get("parallelism"),
                DEFAULT_ARGON2_PARALLELISM,
            )?,
        }))
    } else {
        let name = if algorithm.is_empty() { "<none>" } else { algorithm };
        Err(MigrateError::UnsupportedAlgorithm(name.to_string()))
    }
}

/// HMAC digest of a PBKDF2 algorithm name: the segment after the first
/// `-`, or `sha1` for bare `pbkdf2`.
#[must_use]
pub fn pbkdf2_digest(algorithm: &str) -> &str {
    algorithm
        .split('-')
        .nth(1)
        .filter(|digest| !digest.is_empty())
        .unwrap_or(DEFAULT_PBKDF2_DIGEST)
}

fn parse_embedded<T: serde::de::DeserializeOwned + Default>(
    field: &str,
    raw: Option<&str>,
) -> MigrateResult<T> {
    match raw {
        None => Ok(T::default()),
        Some(raw) if raw.trim().is_empty() => Ok(T::default()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| MigrateError::InvalidCredential(format!("{field}: {e}"))),
    }
}

fn numeric_or(name: &str, value: Option<&Value>, default: u32) -> MigrateResult<u32> {
    value.map_or(Ok(default), |v| numeric(name, v))
}

/// Reads a number that Keycloak may have written as a number, a numeric
/// string, or a list whose first element is either.
fn numeric(name: &str, value: &Value) -> MigrateResult<u32> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => {
            return match items.first() {
                Some(first) => numeric(name, first),
                None => Err(invalid_parameter(name, value)),
            };
        }
        _ => None,
    };
    parsed.ok_or_else(|| invalid_parameter(name, value))
}

fn invalid_parameter(name: &str, value: &Value) -> MigrateError {
    MigrateError::InvalidCredential(format!("{name} is not a number: {value}"))
}
