//! # kc-descope
//!
//! Destination side of the Keycloak migration: the Descope management API.
//!
//! - [`ManagementApi`] - the operations the migration needs
//! - [`DescopeClient`] - the HTTP implementation
//! - [`types`] - request and response bodies

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::ManagementApi;
pub use client::{base_url_for_project, DescopeClient, DEFAULT_BASE_URL, EU_BASE_URL};
pub use error::{DescopeError, DescopeResult};
pub use types::{
    Argon2Hash, AttributeCreateOutcome, BatchCreateResponse, BatchUser, CustomAttribute,
    CustomAttributeType, FailedUser, HashedPassword, Pbkdf2Hash, UserTenant,
};
