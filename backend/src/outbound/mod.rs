//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local stores used when no database is configured
//!   and by tests.
//! - **persistence**: PostgreSQL-backed stores using Diesel ORM.
//! - **auth**: operator authenticator backed by a configured password.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth;
pub mod memory;
pub mod persistence;
