//! Process-local store adapters.
//!
//! Each store guards its state with a single mutex so every operation is
//! linearizable. A poisoned lock surfaces as a query error rather than a
//! panic.

mod code_ledger;
mod credential_pool;

pub use code_ledger::InMemoryCodeLedger;
pub use credential_pool::InMemoryCredentialPool;
