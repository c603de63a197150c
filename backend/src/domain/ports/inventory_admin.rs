//! Driving port for operator inventory management.

use async_trait::async_trait;

use crate::domain::{AdminError, CodeId, Credential, CredentialId, OperatorContext, RedemptionCode};

/// Domain use-case port behind the admin endpoints.
///
/// Each method requires an [`OperatorContext`] so an unauthenticated caller
/// cannot reach the stores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryAdmin: Send + Sync {
    /// Validate and store a credential from raw fields.
    async fn add_credential(
        &self,
        operator: &OperatorContext,
        username: &str,
        password: &str,
    ) -> Result<Credential, AdminError>;

    /// List credentials, newest first.
    async fn list_credentials(
        &self,
        operator: &OperatorContext,
    ) -> Result<Vec<Credential>, AdminError>;

    /// Delete a credential by identifier.
    async fn delete_credential(
        &self,
        operator: &OperatorContext,
        id: &CredentialId,
    ) -> Result<(), AdminError>;

    /// Store a code; `None` mints a random value.
    async fn add_code(
        &self,
        operator: &OperatorContext,
        value: Option<String>,
    ) -> Result<RedemptionCode, AdminError>;

    /// List codes, newest first.
    async fn list_codes(&self, operator: &OperatorContext)
    -> Result<Vec<RedemptionCode>, AdminError>;

    /// Delete a code by identifier.
    async fn delete_code(&self, operator: &OperatorContext, id: &CodeId) -> Result<(), AdminError>;
}
