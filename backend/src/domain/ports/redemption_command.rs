//! Driving port for code redemption.
//!
//! Inbound adapters call this port without knowing which stores back it, so
//! HTTP handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Credential, RedemptionError};

/// Domain use-case port for redeeming a code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedemptionCommand: Send + Sync {
    /// Exchange a raw, caller-supplied code for one credential.
    async fn redeem(&self, code: &str) -> Result<Credential, RedemptionError>;
}
