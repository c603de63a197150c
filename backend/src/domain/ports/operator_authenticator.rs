//! Port for verifying operator credentials.
//!
//! Password checking lives behind this trait so the admin surface only ever
//! sees an [`OperatorContext`] value, never ambient "logged in" state.

use async_trait::async_trait;

use crate::domain::{OperatorContext, OperatorPassword};

use super::define_port_error;

define_port_error! {
    /// Errors raised by operator authenticators.
    pub enum OperatorAuthError {
        /// The supplied secret does not match.
        InvalidPassword => "invalid operator password",
        /// The authenticator could not reach its backing store.
        Unavailable { message: String } => "operator authenticator unavailable: {message}",
    }
}

/// Verifies an operator secret and issues an authenticated context.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperatorAuthenticator: Send + Sync {
    /// Check `password` and return a context stamped with the login time.
    async fn authenticate(
        &self,
        password: &OperatorPassword,
    ) -> Result<OperatorContext, OperatorAuthError>;
}
