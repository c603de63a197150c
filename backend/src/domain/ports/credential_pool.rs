//! Port for the pool of deliverable credentials.

use async_trait::async_trait;

use crate::domain::{Credential, CredentialId, NewCredential};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential pool adapters.
    pub enum CredentialPoolError {
        /// The backing store could not be reached.
        Connection { message: String } => "credential pool connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "credential pool query failed: {message}",
        /// No credential exists with the given identifier.
        NotFound { id: CredentialId } => "credential {id} not found",
    }
}

/// Storage for deliverable credentials.
///
/// `pick_any` and `take_any` choose uniformly at random among the credentials
/// live at call time. Neither needs to be serialised with `add` or `delete`
/// beyond the store's normal consistency guarantees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialPool: Send + Sync {
    /// Store a credential, assigning its identifier and creation time.
    async fn add(&self, credential: NewCredential) -> Result<Credential, CredentialPoolError>;

    /// List all credentials, newest first.
    async fn list(&self) -> Result<Vec<Credential>, CredentialPoolError>;

    /// Remove a credential permanently.
    ///
    /// Returns [`CredentialPoolError::NotFound`] when the identifier is
    /// unknown, including on a second delete of the same identifier.
    async fn delete(&self, id: &CredentialId) -> Result<(), CredentialPoolError>;

    /// Select one live credential without removing it. `None` when empty.
    async fn pick_any(&self) -> Result<Option<Credential>, CredentialPoolError>;

    /// Select one live credential and remove it in the same atomic step.
    ///
    /// Two concurrent callers never receive the same credential.
    async fn take_any(&self) -> Result<Option<Credential>, CredentialPoolError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_message_names_the_identifier() {
        let id = CredentialId::random();
        let err = CredentialPoolError::not_found(id);
        assert_eq!(err.to_string(), format!("credential {id} not found"));
    }

    #[rstest]
    fn connection_errors_carry_adapter_message() {
        let err = CredentialPoolError::connection("pool timed out");
        assert!(err.to_string().contains("pool timed out"));
    }
}
