//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe the stores the redemption core depends on; each
//! exposes a strongly typed error so adapters map their failures into
//! predictable variants. Driving ports are what inbound adapters call.

mod code_ledger;
mod credential_pool;
mod inventory_admin;
mod macros;
mod operator_authenticator;
mod redemption_command;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use code_ledger::MockCodeLedger;
pub use code_ledger::{CodeLedger, CodeLedgerError};
#[cfg(test)]
pub use credential_pool::MockCredentialPool;
pub use credential_pool::{CredentialPool, CredentialPoolError};
#[cfg(test)]
pub use inventory_admin::MockInventoryAdmin;
pub use inventory_admin::InventoryAdmin;
#[cfg(test)]
pub use operator_authenticator::MockOperatorAuthenticator;
pub use operator_authenticator::{OperatorAuthError, OperatorAuthenticator};
#[cfg(test)]
pub use redemption_command::MockRedemptionCommand;
pub use redemption_command::RedemptionCommand;
