//! Credential vending backend.
//!
//! Users exchange single-use redemption codes for account credentials drawn
//! from an operator-managed pool. The crate follows a hexagonal layout:
//! [`domain`] holds the services and ports, [`outbound`] the store adapters,
//! and [`inbound`] the HTTP surface.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
