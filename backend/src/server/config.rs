//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use chrono::Duration;
use keyvend::domain::{
    DEFAULT_OPERATOR_SESSION_TTL_SECS, DeliveryMode, OperatorPassword, session_ttl_from_secs,
};
use keyvend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) admin_password: OperatorPassword,
    pub(crate) delivery_mode: DeliveryMode,
    pub(crate) operator_session_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration with in-memory stores, shared
    /// delivery, and the default operator session lifetime.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        admin_password: OperatorPassword,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            admin_password,
            delivery_mode: DeliveryMode::default(),
            operator_session_ttl: session_ttl_from_secs(DEFAULT_OPERATOR_SESSION_TTL_SECS),
            db_pool: None,
        }
    }

    /// Attach a database connection pool; the PostgreSQL stores replace the
    /// in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Select how credentials leave the pool on redemption.
    #[must_use]
    pub fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.delivery_mode = mode;
        self
    }

    /// Override the operator session lifetime.
    #[must_use]
    pub fn with_operator_session_ttl(mut self, ttl: Duration) -> Self {
        self.operator_session_ttl = ttl;
        self
    }
}
