//! HTTP client for the Descope management API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::api::ManagementApi;
use crate::error::{DescopeError, DescopeResult};
use crate::types::{
    AttributeCreateOutcome, BatchCreateRequest, BatchCreateResponse, BatchUser,
    CreateCustomAttributesRequest, CreateRoleRequest, CreateTenantRequest, CustomAttribute,
    CustomAttributesResponse, RolesResponse, TenantsResponse, UpdateStatusRequest,
};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.descope.com";

/// API host for projects hosted in the EU region.
pub const EU_BASE_URL: &str = "https://api.euc1.descope.com";

const EU_PROJECT_PREFIX: &str = "Peuc1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Status returned when some custom attributes already exist.
const CONFLICT: u16 = 409;

/// Picks the API host for a project ID.
#[must_use]
pub fn base_url_for_project(project_id: &str) -> &'static str {
    if project_id.starts_with(EU_PROJECT_PREFIX) {
        EU_BASE_URL
    } else {
        DEFAULT_BASE_URL
    }
}

mod paths {
    pub const ROLE_ALL: &str = "/v1/mgmt/role/all";
    pub const ROLE_CREATE: &str = "/v1/mgmt/role/create";
    pub const TENANT_ALL: &str = "/v1/mgmt/tenant/all";
    pub const TENANT_CREATE: &str = "/v1/mgmt/tenant/create";
    pub const USER_UPDATE_STATUS: &str = "/v1/mgmt/user/update/status";
    pub const USER_CREATE_BATCH: &str = "/v1/mgmt/user/create/batch";
    pub const CUSTOM_ATTRIBUTES: &str = "/v1/mgmt/user/customattributes";
    pub const CUSTOM_ATTRIBUTE_CREATE: &str = "/v1/mgmt/user/customattribute/create";
}

/// Management API client.
///
/// Every request carries `Authorization: Bearer <projectId>:<managementKey>`.
#[derive(Clone)]
pub struct DescopeClient {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
}

impl fmt::Debug for DescopeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescopeClient")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl DescopeClient {
    /// Creates a client for the project's regional host.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot form a header value or
    /// the HTTP client fails to build.
    pub fn new(project_id: &str, management_key: &str) -> DescopeResult<Self> {
        Self::with_base_url(project_id, management_key, base_url_for_project(project_id))
    }

    /// Creates a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot form a header value or
    /// the HTTP client fails to build.
    pub fn with_base_url(
        project_id: &str,
        management_key: &str,
        base_url: &str,
    ) -> DescopeResult<Self> {
        if project_id.is_empty() || management_key.is_empty() {
            return Err(DescopeError::Config(
                "project ID and management key are required".to_string(),
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {project_id}:{management_key}"))
            .map_err(|_| DescopeError::Config("credentials contain invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
        })
    }

    /// Gets the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: serde::de::DeserializeOwned + Default>(&self, path: &str) -> DescopeResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        handle_response(response).await
    }

    async fn post<B: serde::Serialize + ?Sized, T: serde::de::DeserializeOwned + Default>(
        &self,
        path: &str,
        body: &B,
    ) -> DescopeResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        handle_response(response).await
    }

    async fn post_no_response<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> DescopeResult<()> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        handle_empty_response(response).await
    }
}

#[async_trait]
impl ManagementApi for DescopeClient {
    async fn load_roles(&self) -> DescopeResult<Vec<String>> {
        let resp: RolesResponse = self.get(paths::ROLE_ALL).await?;
        Ok(resp.roles.into_iter().map(|r| r.name).collect())
    }

    async fn create_role(&self, name: &str) -> DescopeResult<()> {
        self.post_no_response(paths::ROLE_CREATE, &CreateRoleRequest { name })
            .await
    }

    async fn load_tenants(&self) -> DescopeResult<Vec<String>> {
        let resp: TenantsResponse = self.get(paths::TENANT_ALL).await?;
        Ok(resp.tenants.into_iter().map(|t| t.id).collect())
    }

    async fn create_tenant(&self, name: &str, id: &str) -> DescopeResult<()> {
        self.post_no_response(paths::TENANT_CREATE, &CreateTenantRequest { name, id })
            .await
    }

    async fn load_custom_attributes(&self) -> DescopeResult<Vec<String>> {
        let resp: CustomAttributesResponse = self.get(paths::CUSTOM_ATTRIBUTES).await?;
        Ok(resp.data.into_iter().map(|a| a.name).collect())
    }

    async fn create_custom_attributes(
        &self,
        attributes: &[CustomAttribute],
    ) -> DescopeResult<AttributeCreateOutcome> {
        let body = CreateCustomAttributesRequest { attributes };
        match self.post_no_response(paths::CUSTOM_ATTRIBUTE_CREATE, &body).await {
            Ok(()) => Ok(AttributeCreateOutcome::Created),
            Err(e) if e.status() == Some(CONFLICT) => Ok(AttributeCreateOutcome::AlreadyExists),
            Err(e) => Err(e),
        }
    }

    async fn batch_create_users(&self, users: &[BatchUser]) -> DescopeResult<BatchCreateResponse> {
        let body = BatchCreateRequest {
            users,
            invite: false,
            send_mail: false,
            send_sms: false,
        };
        self.post(paths::USER_CREATE_BATCH, &body).await
    }

    async fn deactivate_user(&self, login_id: &str) -> DescopeResult<()> {
        let body = UpdateStatusRequest {
            login_id,
            status: "disabled",
        };
        self.post_no_response(paths::USER_UPDATE_STATUS, &body).await
    }
}

/// Handles a response with a body. An empty success body decodes as the
/// type's default.
async fn handle_response<T: serde::de::DeserializeOwned + Default>(
    response: reqwest::Response,
) -> DescopeResult<T> {
    let status = response.status();

    if status.is_success() {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    } else {
        let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        Err(DescopeError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Handles a response without a body.
async fn handle_empty_response(response: reqwest::Response) -> DescopeResult<()> {
    let status = response.status();

    if status.is_success() {
        Ok(())
    } else {
        let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        Err(DescopeError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
