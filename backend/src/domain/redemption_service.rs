//! Redemption: exchange a single-use code for one credential.
//!
//! The flow is `validate -> consume -> select -> commit | abort`. Consuming
//! the code happens first so two racing requests cannot both pass the lookup;
//! when no credential can be selected the consumed record is put back.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    CodeLedger, CodeLedgerError, CredentialPool, CredentialPoolError, RedemptionCommand,
};
use crate::domain::{CodeValue, CodeValueError, Credential, RedemptionCode};

/// How a redeemed credential relates to the pool afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Credentials stay in the pool and may be delivered again.
    #[default]
    Shared,
    /// Each credential is delivered at most once and removed on delivery.
    Exclusive,
}

/// Error returned when a delivery mode string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown delivery mode `{0}`; expected `shared` or `exclusive`")]
pub struct UnknownDeliveryModeError(String);

impl FromStr for DeliveryMode {
    type Err = UnknownDeliveryModeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "exclusive" => Ok(Self::Exclusive),
            _ => Err(UnknownDeliveryModeError(raw.to_owned())),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => f.write_str("shared"),
            Self::Exclusive => f.write_str("exclusive"),
        }
    }
}

/// Reasons a redemption did not deliver a credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedemptionError {
    /// The submitted code was blank or malformed. No store was touched.
    #[error("invalid code input: {0}")]
    InvalidInput(#[from] CodeValueError),
    /// No live code matches the submission.
    #[error("code is not redeemable")]
    InvalidCode,
    /// The code was valid but the pool is empty; the code was restored.
    #[error("no credentials available")]
    NoInventory,
    /// A backing store failed.
    #[error("storage failure: {message}")]
    Storage { message: String },
}

impl RedemptionError {
    fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether the error is a user-facing rejection rather than a fault.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidCode | Self::NoInventory)
    }
}

/// Redemption service implementing [`RedemptionCommand`].
#[derive(Clone)]
pub struct RedemptionService<P, L> {
    pool: Arc<P>,
    ledger: Arc<L>,
    mode: DeliveryMode,
}

impl<P, L> RedemptionService<P, L> {
    /// Create a service over the given stores.
    pub fn new(pool: Arc<P>, ledger: Arc<L>, mode: DeliveryMode) -> Self {
        Self { pool, ledger, mode }
    }

    /// Active delivery mode.
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }
}

impl<P, L> RedemptionService<P, L>
where
    P: CredentialPool,
    L: CodeLedger,
{
    fn map_ledger_error(error: CodeLedgerError) -> RedemptionError {
        RedemptionError::storage(error.to_string())
    }

    fn map_pool_error(error: CredentialPoolError) -> RedemptionError {
        RedemptionError::storage(error.to_string())
    }

    async fn select_credential(&self) -> Result<Option<Credential>, CredentialPoolError> {
        match self.mode {
            DeliveryMode::Shared => self.pool.pick_any().await,
            DeliveryMode::Exclusive => self.pool.take_any().await,
        }
    }

    /// Put back the code this request consumed.
    ///
    /// A concurrent re-mint of the same value wins; the caller still sees the
    /// original rejection. Any other failure means the code is lost and is
    /// reported as a storage error.
    async fn roll_back(&self, code: &RedemptionCode) -> Result<(), RedemptionError> {
        match self.ledger.restore(code).await {
            Ok(()) => Ok(()),
            Err(CodeLedgerError::DuplicateCode { value }) => {
                warn!(code_id = %code.id, %value, "code re-minted before rollback; keeping new record");
                Ok(())
            }
            Err(err) => {
                error!(code_id = %code.id, error = %err, "failed to restore consumed code");
                Err(Self::map_ledger_error(err))
            }
        }
    }

    /// Redeem `raw` for one credential.
    ///
    /// # Errors
    /// See [`RedemptionError`]. Only a successful return leaves the code
    /// consumed.
    pub async fn redeem(&self, raw: &str) -> Result<Credential, RedemptionError> {
        let value = CodeValue::parse(raw)?;

        let Some(code) = self
            .ledger
            .try_consume(&value)
            .await
            .map_err(Self::map_ledger_error)?
        else {
            debug!("redemption rejected: unknown code");
            return Err(RedemptionError::InvalidCode);
        };

        match self.select_credential().await {
            Ok(Some(credential)) => {
                info!(
                    code_id = %code.id,
                    credential_id = %credential.id,
                    mode = %self.mode,
                    "code redeemed"
                );
                Ok(credential)
            }
            Ok(None) => {
                self.roll_back(&code).await?;
                warn!(code_id = %code.id, mode = %self.mode, "redemption failed: credential pool is empty");
                Err(RedemptionError::NoInventory)
            }
            Err(err) => {
                self.roll_back(&code).await?;
                Err(Self::map_pool_error(err))
            }
        }
    }
}

#[async_trait]
impl<P, L> RedemptionCommand for RedemptionService<P, L>
where
    P: CredentialPool,
    L: CodeLedger,
{
    async fn redeem(&self, code: &str) -> Result<Credential, RedemptionError> {
        RedemptionService::redeem(self, code).await
    }
}

#[cfg(test)]
#[path = "redemption_service_tests.rs"]
mod tests;
