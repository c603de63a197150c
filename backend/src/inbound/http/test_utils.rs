//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{MockInventoryAdmin, MockOperatorAuthenticator, MockRedemptionCommand};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Name of the session cookie used in tests and by the server.
pub const SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key and the `Secure` flag disabled.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie set")
        .into_owned()
}

/// Mock ports for handler tests; unused mocks panic if called.
#[derive(Default)]
pub struct MockPorts {
    pub redemption: MockRedemptionCommand,
    pub admin: MockInventoryAdmin,
    pub authenticator: MockOperatorAuthenticator,
}

impl MockPorts {
    /// Build HTTP state from the configured mocks.
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            redemption: Arc::new(self.redemption),
            admin: Arc::new(self.admin),
            authenticator: Arc::new(self.authenticator),
        })
    }
}
