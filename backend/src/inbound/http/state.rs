//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they can be tested against doubles without I/O.

use std::sync::Arc;

use chrono::Duration;
use mockable::{Clock, DefaultClock};

use crate::domain::{DEFAULT_OPERATOR_SESSION_TTL_SECS, session_ttl_from_secs};
use crate::domain::ports::{InventoryAdmin, OperatorAuthenticator, RedemptionCommand};

/// Port implementations bundled for [`HttpState::new`].
#[derive(Clone)]
pub struct HttpStatePorts {
    pub redemption: Arc<dyn RedemptionCommand>,
    pub admin: Arc<dyn InventoryAdmin>,
    pub authenticator: Arc<dyn OperatorAuthenticator>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub redemption: Arc<dyn RedemptionCommand>,
    pub admin: Arc<dyn InventoryAdmin>,
    pub authenticator: Arc<dyn OperatorAuthenticator>,
    /// Lifetime of an operator session measured from login.
    pub operator_session_ttl: Duration,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state with the default session lifetime and system clock.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            redemption,
            admin,
            authenticator,
        } = ports;
        Self {
            redemption,
            admin,
            authenticator,
            operator_session_ttl: session_ttl_from_secs(DEFAULT_OPERATOR_SESSION_TTL_SECS),
            clock: Arc::new(DefaultClock),
        }
    }

    /// Override the operator session lifetime.
    #[must_use]
    pub fn with_operator_session_ttl(mut self, ttl: Duration) -> Self {
        self.operator_session_ttl = ttl;
        self
    }

    /// Override the clock used for session expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
