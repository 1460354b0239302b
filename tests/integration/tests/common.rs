//! Common test utilities and fixtures.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use kc_descope::{DescopeClient, ManagementApi};
use kc_export::ExportDirectory;
use kc_migrate::{GroupMapping, MigrationOptions, Migrator};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const PROJECT_ID: &str = "P2integration";
pub const MANAGEMENT_KEY: &str = "K2integration";
pub const REALM: &str = "acme";

/// Test environment: a mock Descope server and an export directory.
pub struct TestEnv {
    /// Mock management API.
    pub server: MockServer,
    /// Export directory.
    pub export: TempDir,
}

impl TestEnv {
    /// Starts a mock server with empty destination listings.
    pub async fn new() -> anyhow::Result<Self> {
        let server = MockServer::start().await;
        let export = tempfile::tempdir()?;

        Ok(Self { server, export })
    }

    /// Serves `GET path` with the given JSON body.
    pub async fn listing(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Accepts every `POST path` with an empty object.
    pub async fn accept(&self, endpoint: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&self.server)
            .await;
    }

    /// Empty destination: no roles, tenants or custom attributes, and
    /// every create call succeeds.
    pub async fn empty_destination(&self) {
        self.listing("/v1/mgmt/role/all", json!({"roles": []})).await;
        self.listing("/v1/mgmt/tenant/all", json!({"tenants": []})).await;
        self.listing("/v1/mgmt/user/customattributes", json!({"data": []}))
            .await;
        for endpoint in [
            "/v1/mgmt/role/create",
            "/v1/mgmt/tenant/create",
            "/v1/mgmt/user/customattribute/create",
            "/v1/mgmt/user/create/batch",
            "/v1/mgmt/user/update/status",
        ] {
            self.accept(endpoint).await;
        }
    }

    /// Writes a JSON file into the export directory.
    pub fn write(&self, name: &str, value: &Value) -> anyhow::Result<()> {
        std::fs::write(self.export.path().join(name), serde_json::to_vec_pretty(value)?)?;
        Ok(())
    }

    /// Builds a migrator talking to the mock server.
    pub fn migrator(&self, group_mapping: GroupMapping) -> anyhow::Result<Migrator> {
        let client = DescopeClient::with_base_url(PROJECT_ID, MANAGEMENT_KEY, &self.server.uri())?;
        let api: Arc<dyn ManagementApi> = Arc::new(client);
        let options = MigrationOptions {
            group_mapping,
            federated_apps: vec!["sso-app".to_string()],
            batch_pause: Duration::ZERO,
        };
        Ok(Migrator::new(api, self.export_dir(), options))
    }

    fn export_dir(&self) -> ExportDirectory {
        ExportDirectory::new(self.export.path(), REALM)
    }

    /// Requests received for `POST path`, as JSON bodies.
    pub async fn posted(&self, endpoint: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == "POST" && r.url.path() == endpoint)
            .filter_map(json_body)
            .collect()
    }
}

fn json_body(request: &Request) -> Option<Value> {
    serde_json::from_slice(&request.body).ok()
}

/// A realm metadata export with roles, groups and a user profile.
pub fn realm_export() -> Value {
    let profile = json!({
        "attributes": [
            {"name": "username"},
            {"name": "email"},
            {"name": "department", "displayName": "Department"}
        ]
    });

    json!({
        "realm": REALM,
        "roles": {
            "realm": [{"name": "admin"}, {"name": "user"}],
            "client": {"portal": [{"name": "viewer"}]}
        },
        "groups": [
            {"name": "eng", "path": "/eng", "subGroups": [{"name": "backend", "path": "/eng/backend"}]},
            {"name": "sales", "path": "/sales"}
        ],
        "clients": [{
            "clientId": "portal",
            "protocolMappers": [{
                "name": "badges",
                "protocolMapper": "oidc-usermodel-attribute-mapper",
                "config": {"user.attribute": "badges", "multivalued": "true"}
            }]
        }],
        "components": {
            "org.keycloak.userprofile.UserProfileProvider": [{
                "providerId": "declarative-user-profile",
                "config": {"kc.user.profile.config": [profile.to_string()]}
            }]
        }
    })
}

/// A user export file holding `users`.
pub fn users_export(users: Value) -> Value {
    json!({"realm": REALM, "users": users})
}

/// A PBKDF2-SHA256 password credential.
pub fn pbkdf2_credential() -> Value {
    json!({
        "type": "password",
        "secretData": json!({"value": "aGFzaA==", "salt": "c2FsdA=="}).to_string(),
        "credentialData": json!({
            "hashIterations": 27500,
            "algorithm": "pbkdf2-sha256",
            "additionalParameters": {}
        }).to_string()
    })
}

/// Writes the standard fixture set.
pub fn write_fixtures(env: &TestEnv) -> anyhow::Result<()> {
    env.write(&format!("{REALM}-realm.json"), &realm_export())?;
    env.write(
        &format!("{REALM}-users-0.json"),
        &users_export(json!([
            {
                "id": "1",
                "username": "jdoe",
                "email": "jdoe@example.com",
                "emailVerified": true,
                "firstName": "Jane",
                "lastName": "Doe",
                "enabled": true,
                "attributes": {"department": ["eng"]},
                "credentials": [pbkdf2_credential()],
                "realmRoles": ["user"],
                "clientRoles": {"portal": ["viewer"]},
                "groups": ["/eng"]
            },
            {
                "id": "2",
                "username": "old",
                "email": "old@example.com",
                "enabled": false
            }
        ])),
    )?;
    env.write(
        &format!("{REALM}-users-1.json"),
        &users_export(json!([{"id": "3", "email": "solo@example.com"}])),
    )?;
    Ok(())
}

/// True if `dir` holds any file.
pub fn has_files(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
