//! # kc-migrate
//!
//! Migrates a Keycloak realm export into a Descope project.
//!
//! The export directory holds `<realm>-realm*.json` metadata files and
//! `<realm>-users-*.json` user files. A run:
//! - Creates the roles found in the realm files
//! - Creates the top-level groups as tenants or roles, if asked to
//! - Creates the custom user attributes declared by the realm
//! - Uploads the users, one batch per user file, carrying PBKDF2 and
//!   Argon2 password hashes over, then deactivates disabled users
//!
//! Every step only creates what the destination does not have yet.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod logging;
pub mod migrator;
pub mod output;
pub mod report;
pub mod sync;
pub mod upload;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use cli::Cli;
pub use config::{GroupMapping, MigrationConfig, MigrationOptions};
pub use error::{MigrateError, MigrateResult};
pub use migrator::Migrator;
pub use report::{MigrationReport, StepResult, UserUploadResult};
