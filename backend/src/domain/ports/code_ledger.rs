//! Port for the ledger of outstanding redemption codes.

use async_trait::async_trait;

use crate::domain::{CodeId, CodeValue, RedemptionCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by code ledger adapters.
    pub enum CodeLedgerError {
        /// The backing store could not be reached.
        Connection { message: String } => "code ledger connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "code ledger query failed: {message}",
        /// A live code with the same normalised value already exists.
        DuplicateCode { value: CodeValue } => "code {value} already exists",
        /// No code exists with the given identifier.
        NotFound { id: CodeId } => "code {id} not found",
    }
}

/// Storage for outstanding redemption codes with consume-or-fail semantics.
///
/// Values arrive already normalised by [`CodeValue`]; adapters compare them
/// verbatim and must enforce uniqueness themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeLedger: Send + Sync {
    /// Store a new code with a fresh identifier and creation time.
    ///
    /// Fails with [`CodeLedgerError::DuplicateCode`] if the value is live.
    async fn add(&self, value: CodeValue) -> Result<RedemptionCode, CodeLedgerError>;

    /// List all live codes, newest first.
    async fn list(&self) -> Result<Vec<RedemptionCode>, CodeLedgerError>;

    /// Remove a code by identifier.
    async fn delete(&self, id: &CodeId) -> Result<(), CodeLedgerError>;

    /// Remove and return the code with the given value, if it is live.
    ///
    /// Linearizable with respect to every other `try_consume` and `delete`:
    /// of two concurrent calls for the same value at most one sees `Some`.
    /// `None` leaves the ledger untouched.
    async fn try_consume(
        &self,
        value: &CodeValue,
    ) -> Result<Option<RedemptionCode>, CodeLedgerError>;

    /// Re-insert a previously consumed record unchanged.
    ///
    /// Only the redemption rollback path calls this. Fails with
    /// [`CodeLedgerError::DuplicateCode`] if an operator re-minted the same
    /// value in the meantime.
    async fn restore(&self, code: &RedemptionCode) -> Result<(), CodeLedgerError>;
}
