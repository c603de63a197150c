//! PostgreSQL store adapters using Diesel ORM.
//!
//! Stores are thin translators between Diesel rows and domain types, built
//! on `diesel-async` with `bb8` pooling. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use keyvend::outbound::persistence::{DbPool, DieselCodeLedger, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/keyvend")).await?;
//! let ledger = DieselCodeLedger::new(pool);
//! ```

mod diesel_code_ledger;
mod diesel_credential_pool;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_code_ledger::DieselCodeLedger;
pub use diesel_credential_pool::DieselCredentialPool;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
