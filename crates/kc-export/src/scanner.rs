//! Export directory scanning.
//!
//! Keycloak's directory export writes one realm metadata file
//! (`<realm>-realm.json`) and any number of user files
//! (`<realm>-users-<n>.json`). Files are returned sorted by name so runs
//! are reproducible.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, ExportResult};
use crate::export::{RealmExport, UserExport, UsersExport};

/// A directory of Keycloak export files for one realm.
#[derive(Debug, Clone)]
pub struct ExportDirectory {
    path: PathBuf,
    realm: String,
}

impl ExportDirectory {
    /// Creates a scanner for `realm` files inside `path`.
    pub fn new(path: impl Into<PathBuf>, realm: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            realm: realm.into(),
        }
    }

    /// The scanned directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The realm used as a filename prefix.
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Realm metadata files (`<realm>-realm*.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn realm_files(&self) -> ExportResult<Vec<PathBuf>> {
        self.matching(&format!("{}-realm", self.realm))
    }

    /// User export files (`<realm>-users-*.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn user_files(&self) -> ExportResult<Vec<PathBuf>> {
        self.matching(&format!("{}-users-", self.realm))
    }

    /// Loads every realm metadata file.
    ///
    /// # Errors
    ///
    /// Returns the first listing, read or parse error.
    pub fn load_realms(&self) -> ExportResult<Vec<RealmExport>> {
        self.realm_files()?
            .iter()
            .map(|path| load_realm(path))
            .collect()
    }

    /// Loads the first realm metadata file, if any.
    ///
    /// # Errors
    ///
    /// Returns a listing, read or parse error.
    pub fn load_first_realm(&self) -> ExportResult<Option<RealmExport>> {
        match self.realm_files()?.first() {
            Some(path) => load_realm(path).map(Some),
            None => Ok(None),
        }
    }

    fn matching(&self, prefix: &str) -> ExportResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.path).map_err(|e| ExportError::io(&self.path, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ExportError::io(&self.path, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(prefix) && name.ends_with(".json") {
                files.push(entry.path());
            }
        }
        files.sort();

        tracing::debug!(
            dir = %self.path.display(),
            prefix,
            count = files.len(),
            "Scanned export directory"
        );
        Ok(files)
    }
}

/// Reads and parses a realm metadata file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a realm export.
pub fn load_realm(path: &Path) -> ExportResult<RealmExport> {
    let content = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| ExportError::json(path, e))
}

/// Reads the `users` array of a user export file.
///
/// # Errors
///
/// Returns [`ExportError::InvalidFormat`] if the document is not an
/// object with a `users` array, or a read/parse error.
pub fn load_users(path: &Path) -> ExportResult<Vec<UserExport>> {
    let content = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| ExportError::json(path, e))?;

    if !value.get("users").is_some_and(serde_json::Value::is_array) {
        return Err(ExportError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "missing 'users' array".to_string(),
        });
    }

    let export: UsersExport =
        serde_json::from_value(value).map_err(|e| ExportError::json(path, e))?;
    Ok(export.users)
}
