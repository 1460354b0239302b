//! Management API abstraction.

use async_trait::async_trait;

use crate::error::DescopeResult;
use crate::types::{AttributeCreateOutcome, BatchCreateResponse, BatchUser, CustomAttribute};

/// Destination operations needed by the migration.
///
/// Implementations must be thread-safe.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Names of every role in the project.
    async fn load_roles(&self) -> DescopeResult<Vec<String>>;

    /// Creates a project-level role.
    async fn create_role(&self, name: &str) -> DescopeResult<()>;

    /// IDs of every tenant in the project.
    async fn load_tenants(&self) -> DescopeResult<Vec<String>>;

    /// Creates a tenant with the given display name and ID.
    async fn create_tenant(&self, name: &str, id: &str) -> DescopeResult<()>;

    /// Names of every custom user attribute.
    async fn load_custom_attributes(&self) -> DescopeResult<Vec<String>>;

    /// Creates custom user attributes in a single call.
    ///
    /// ## Errors
    ///
    /// A conflict is not an error; it is reported as
    /// [`AttributeCreateOutcome::AlreadyExists`].
    async fn create_custom_attributes(
        &self,
        attributes: &[CustomAttribute],
    ) -> DescopeResult<AttributeCreateOutcome>;

    /// Creates users in bulk, without invitations.
    async fn batch_create_users(&self, users: &[BatchUser]) -> DescopeResult<BatchCreateResponse>;

    /// Deactivates a user by login ID.
    async fn deactivate_user(&self, login_id: &str) -> DescopeResult<()>;
}
