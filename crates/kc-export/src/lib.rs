//! # kc-export
//!
//! Reading side of the Keycloak migration.
//!
//! This crate understands the JSON files produced by Keycloak's realm
//! export (`kc.sh export --dir ...`):
//! - [`scanner`] - locating `<realm>-realm*.json` and `<realm>-users-*.json` files
//! - [`export`] - the subset of the export schema the migration consumes
//! - [`extract`] - role, group and custom attribute extraction

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod extract;
pub mod scanner;

pub use error::{ExportError, ExportResult};
pub use export::{
    ClientExport, ComponentExport, CredentialExport, GroupExport, ProtocolMapperExport,
    RealmExport, RoleExport, RolesExport, UserExport, UsersExport,
};
pub use extract::{CustomAttributeDef, BUILT_IN_USER_FIELDS};
pub use scanner::ExportDirectory;
