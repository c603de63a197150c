//! Single shared operator password.
//!
//! Only the SHA-256 digest of the configured password is kept in memory.
//! Submitted passwords are hashed the same way and compared in constant
//! time, so response timing does not leak how many bytes matched.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{OperatorAuthError, OperatorAuthenticator};
use crate::domain::{OperatorContext, OperatorPassword};

/// Authenticates operators against one configured password.
#[derive(Clone)]
pub struct PasswordAuthenticator {
    digest: Zeroizing<[u8; 32]>,
    clock: Arc<dyn Clock>,
}

impl PasswordAuthenticator {
    /// Build an authenticator for `password` using the system clock.
    pub fn new(password: &OperatorPassword) -> Self {
        Self::with_clock(password, Arc::new(DefaultClock))
    }

    /// Build an authenticator that stamps contexts with `clock`.
    pub fn with_clock(password: &OperatorPassword, clock: Arc<dyn Clock>) -> Self {
        Self {
            digest: digest(password.expose()),
            clock,
        }
    }
}

fn digest(secret: &str) -> Zeroizing<[u8; 32]> {
    let mut out = Zeroizing::new([0_u8; 32]);
    out.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    out
}

#[async_trait]
impl OperatorAuthenticator for PasswordAuthenticator {
    async fn authenticate(
        &self,
        password: &OperatorPassword,
    ) -> Result<OperatorContext, OperatorAuthError> {
        let submitted = digest(password.expose());
        if bool::from(submitted.as_slice().ct_eq(self.digest.as_slice())) {
            Ok(OperatorContext::new(self.clock.utc()))
        } else {
            debug!("operator password rejected");
            Err(OperatorAuthError::invalid_password())
        }
    }
}
