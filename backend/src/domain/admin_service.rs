//! Operator-facing inventory management.
//!
//! Every operation demands an [`OperatorContext`]; the service itself adds no
//! invariants beyond those the stores enforce.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CodeLedger, CodeLedgerError, CredentialPool, CredentialPoolError, InventoryAdmin,
};
use crate::domain::{
    CodeId, CodeValue, Credential, CredentialId, CredentialValidationError, Error, NewCredential,
    OperatorContext, RedemptionCode,
};

/// Attempts made to mint a unique random code before giving up.
const MINT_ATTEMPTS: usize = 3;

/// Errors raised by [`AdminService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    /// A submitted field failed validation.
    #[error("invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },
    /// A live code already carries this value.
    #[error("code {value} already exists")]
    DuplicateCode { value: CodeValue },
    /// The referenced record does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },
    /// A backing store could not be reached.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
    /// A backing store failed while executing a request.
    #[error("storage failure: {message}")]
    Storage { message: String },
}

impl From<CredentialValidationError> for AdminError {
    fn from(error: CredentialValidationError) -> Self {
        let field = match error {
            CredentialValidationError::EmptyUsername
            | CredentialValidationError::UsernameTooLong { .. } => "username",
            CredentialValidationError::EmptyPassword
            | CredentialValidationError::PasswordTooLong { .. } => "password",
        };
        Self::InvalidInput {
            field,
            message: error.to_string(),
        }
    }
}

impl From<CredentialPoolError> for AdminError {
    fn from(error: CredentialPoolError) -> Self {
        match error {
            CredentialPoolError::Connection { message } => Self::Unavailable { message },
            CredentialPoolError::Query { message } => Self::Storage { message },
            CredentialPoolError::NotFound { id } => Self::NotFound {
                resource: "credential",
                id: id.to_string(),
            },
        }
    }
}

impl From<CodeLedgerError> for AdminError {
    fn from(error: CodeLedgerError) -> Self {
        match error {
            CodeLedgerError::Connection { message } => Self::Unavailable { message },
            CodeLedgerError::Query { message } => Self::Storage { message },
            CodeLedgerError::DuplicateCode { value } => Self::DuplicateCode { value },
            CodeLedgerError::NotFound { id } => Self::NotFound {
                resource: "code",
                id: id.to_string(),
            },
        }
    }
}

impl From<AdminError> for Error {
    fn from(error: AdminError) -> Self {
        match error {
            AdminError::InvalidInput { field, message } => {
                Self::invalid_request(message).with_details(json!({ "field": field }))
            }
            AdminError::DuplicateCode { value } => Self::conflict("code already exists")
                .with_details(json!({ "value": value.as_str(), "code": "duplicate_code" })),
            AdminError::NotFound { resource, id } => {
                Self::not_found(format!("{resource} not found"))
                    .with_details(json!({ "id": id }))
            }
            AdminError::Unavailable { message } => {
                Self::service_unavailable(format!("inventory store unavailable: {message}"))
            }
            AdminError::Storage { message } => {
                Self::internal(format!("inventory store error: {message}"))
            }
        }
    }
}

/// Admin service implementing [`InventoryAdmin`].
#[derive(Clone)]
pub struct AdminService<P, L> {
    pool: Arc<P>,
    ledger: Arc<L>,
}

impl<P, L> AdminService<P, L> {
    /// Create a service over the given stores.
    pub fn new(pool: Arc<P>, ledger: Arc<L>) -> Self {
        Self { pool, ledger }
    }
}

impl<P, L> AdminService<P, L>
where
    P: CredentialPool,
    L: CodeLedger,
{
    /// Validate and store a credential.
    pub async fn add_credential(
        &self,
        operator: &OperatorContext,
        username: &str,
        password: &str,
    ) -> Result<Credential, AdminError> {
        let credential = NewCredential::try_new(username, password)?;
        let stored = self.pool.add(credential).await?;
        info!(
            credential_id = %stored.id,
            operator_login = %operator.authenticated_at(),
            "credential added"
        );
        Ok(stored)
    }

    /// List credentials, newest first.
    pub async fn list_credentials(
        &self,
        _operator: &OperatorContext,
    ) -> Result<Vec<Credential>, AdminError> {
        Ok(self.pool.list().await?)
    }

    /// Delete a credential.
    pub async fn delete_credential(
        &self,
        operator: &OperatorContext,
        id: &CredentialId,
    ) -> Result<(), AdminError> {
        self.pool.delete(id).await?;
        info!(credential_id = %id, operator_login = %operator.authenticated_at(), "credential deleted");
        Ok(())
    }

    /// Store a code, minting a random value when none is supplied.
    pub async fn add_code(
        &self,
        operator: &OperatorContext,
        value: Option<String>,
    ) -> Result<RedemptionCode, AdminError> {
        let stored = match value {
            Some(raw) => {
                let value = CodeValue::parse(raw).map_err(|err| AdminError::InvalidInput {
                    field: "value",
                    message: err.to_string(),
                })?;
                self.ledger.add(value).await?
            }
            None => self.mint_code().await?,
        };
        info!(
            code_id = %stored.id,
            operator_login = %operator.authenticated_at(),
            "code added"
        );
        Ok(stored)
    }

    async fn mint_code(&self) -> Result<RedemptionCode, AdminError> {
        let mut last_error = None;
        for attempt in 1..=MINT_ATTEMPTS {
            let value = CodeValue::generate(&mut rand::thread_rng());
            match self.ledger.add(value).await {
                Ok(code) => return Ok(code),
                Err(CodeLedgerError::DuplicateCode { value }) => {
                    warn!(attempt, %value, "minted code collided with a live code");
                    last_error = Some(AdminError::DuplicateCode { value });
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(last_error.unwrap_or_else(|| AdminError::Storage {
            message: "code minting made no attempts".to_owned(),
        }))
    }

    /// List codes, newest first.
    pub async fn list_codes(
        &self,
        _operator: &OperatorContext,
    ) -> Result<Vec<RedemptionCode>, AdminError> {
        Ok(self.ledger.list().await?)
    }

    /// Delete a code.
    pub async fn delete_code(
        &self,
        operator: &OperatorContext,
        id: &CodeId,
    ) -> Result<(), AdminError> {
        self.ledger.delete(id).await?;
        info!(code_id = %id, operator_login = %operator.authenticated_at(), "code deleted");
        Ok(())
    }
}

#[async_trait]
impl<P, L> InventoryAdmin for AdminService<P, L>
where
    P: CredentialPool,
    L: CodeLedger,
{
    async fn add_credential(
        &self,
        operator: &OperatorContext,
        username: &str,
        password: &str,
    ) -> Result<Credential, AdminError> {
        AdminService::add_credential(self, operator, username, password).await
    }

    async fn list_credentials(
        &self,
        operator: &OperatorContext,
    ) -> Result<Vec<Credential>, AdminError> {
        AdminService::list_credentials(self, operator).await
    }

    async fn delete_credential(
        &self,
        operator: &OperatorContext,
        id: &CredentialId,
    ) -> Result<(), AdminError> {
        AdminService::delete_credential(self, operator, id).await
    }

    async fn add_code(
        &self,
        operator: &OperatorContext,
        value: Option<String>,
    ) -> Result<RedemptionCode, AdminError> {
        AdminService::add_code(self, operator, value).await
    }

    async fn list_codes(
        &self,
        operator: &OperatorContext,
    ) -> Result<Vec<RedemptionCode>, AdminError> {
        AdminService::list_codes(self, operator).await
    }

    async fn delete_code(&self, operator: &OperatorContext, id: &CodeId) -> Result<(), AdminError> {
        AdminService::delete_code(self, operator, id).await
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
