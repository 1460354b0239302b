//! In-memory destination for unit tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kc_descope::{
    AttributeCreateOutcome, BatchCreateResponse, BatchUser, CustomAttribute, DescopeError,
    DescopeResult, FailedUser, ManagementApi,
};
use kc_export::ExportDirectory;

use crate::config::{GroupMapping, MigrationOptions};
use crate::migrator::Migrator;

/// A recorded API call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadRoles,
    CreateRole(String),
    LoadTenants,
    CreateTenant { name: String, id: String },
    LoadCustomAttributes,
    CreateCustomAttributes(Vec<CustomAttribute>),
    BatchCreate(Vec<BatchUser>),
    Deactivate(String),
}

/// Fake management API. Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    roles: Vec<String>,
    tenants: Vec<String>,
    custom_attributes: Vec<String>,
    failing_roles: Vec<String>,
    rejected_users: Vec<String>,
    attributes_conflict: bool,
    batch_fails: bool,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = to_strings(roles);
        self
    }

    pub fn with_tenants(mut self, tenants: &[&str]) -> Self {
        self.tenants = to_strings(tenants);
        self
    }

    pub fn with_custom_attributes(mut self, names: &[&str]) -> Self {
        self.custom_attributes = to_strings(names);
        self
    }

    pub fn failing_role(mut self, name: &str) -> Self {
        self.failing_roles.push(name.to_string());
        self
    }

    pub fn rejecting_user(mut self, login_id: &str) -> Self {
        self.rejected_users.push(login_id.to_string());
        self
    }

    pub fn attributes_conflict(mut self) -> Self {
        self.attributes_conflict = true;
        self
    }

    pub fn failing_batches(mut self) -> Self {
        self.batch_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, predicate: impl Fn(&Call) -> bool) -> Vec<Call> {
        self.calls().into_iter().filter(|c| predicate(c)).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn server_error() -> DescopeError {
    DescopeError::Api {
        status: 500,
        message: "internal error".into(),
    }
}

#[async_trait]
impl ManagementApi for FakeApi {
    async fn load_roles(&self) -> DescopeResult<Vec<String>> {
        self.record(Call::LoadRoles);
        Ok(self.roles.clone())
    }

    async fn create_role(&self, name: &str) -> DescopeResult<()> {
        self.record(Call::CreateRole(name.to_string()));
        if self.failing_roles.iter().any(|r| r == name) {
            return Err(server_error());
        }
        Ok(())
    }

    async fn load_tenants(&self) -> DescopeResult<Vec<String>> {
        self.record(Call::LoadTenants);
        Ok(self.tenants.clone())
    }

    async fn create_tenant(&self, name: &str, id: &str) -> DescopeResult<()> {
        self.record(Call::CreateTenant {
            name: name.to_string(),
            id: id.to_string(),
        });
        Ok(())
    }

    async fn load_custom_attributes(&self) -> DescopeResult<Vec<String>> {
        self.record(Call::LoadCustomAttributes);
        Ok(self.custom_attributes.clone())
    }

    async fn create_custom_attributes(
        &self,
        attributes: &[CustomAttribute],
    ) -> DescopeResult<AttributeCreateOutcome> {
        self.record(Call::CreateCustomAttributes(attributes.to_vec()));
        if self.attributes_conflict {
            Ok(AttributeCreateOutcome::AlreadyExists)
        } else {
            Ok(AttributeCreateOutcome::Created)
        }
    }

    async fn batch_create_users(&self, users: &[BatchUser]) -> DescopeResult<BatchCreateResponse> {
        self.record(Call::BatchCreate(users.to_vec()));
        if self.batch_fails {
            return Err(server_error());
        }

        let failed_users = users
            .iter()
            .filter(|u| self.rejected_users.contains(&u.login_id))
            .map(|u| FailedUser {
                failure: "user already exists".into(),
                user: serde_json::json!({ "loginIds": [u.login_id] }),
            })
            .collect();
        Ok(BatchCreateResponse {
            created_users: Vec::new(),
            failed_users,
        })
    }

    async fn deactivate_user(&self, login_id: &str) -> DescopeResult<()> {
        self.record(Call::Deactivate(login_id.to_string()));
        Ok(())
    }
}

/// Builds a migrator over `dir` for realm `acme` with no pause between files.
pub fn migrator(api: &FakeApi, dir: &Path, group_mapping: GroupMapping) -> Migrator {
    migrator_with(
        api,
        dir,
        MigrationOptions {
            group_mapping,
            batch_pause: std::time::Duration::ZERO,
            ..MigrationOptions::default()
        },
    )
}

pub fn migrator_with(api: &FakeApi, dir: &Path, options: MigrationOptions) -> Migrator {
    Migrator::new(
        Arc::new(api.clone()),
        ExportDirectory::new(dir, "acme"),
        options,
    )
}

pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) {
    std::fs::write(dir.join(name), value.to_string()).unwrap();
}
