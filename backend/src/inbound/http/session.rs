//! Operator session helpers.
//!
//! Wraps the Actix session so handlers deal only in [`OperatorContext`]
//! values. The cookie stores the login instant; expiry is checked on every
//! read against the configured lifetime.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::{Error, OperatorContext};

pub(crate) const OPERATOR_LOGIN_KEY: &str = "operator_login_at";

/// Newtype exposing operator-level session operations.
#[derive(Clone)]
pub struct OperatorSession(Session);

impl OperatorSession {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record a successful login, rotating the session identifier.
    pub fn persist_login(&self, operator: &OperatorContext) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(OPERATOR_LOGIN_KEY, operator.authenticated_at().timestamp())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop all session state.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Operator context stored in the session, if any.
    ///
    /// Unreadable timestamps are treated as absent.
    pub fn operator(&self) -> Result<Option<OperatorContext>, Error> {
        let stamp = self
            .0
            .get::<i64>(OPERATOR_LOGIN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(stamp.and_then(|secs| match DateTime::<Utc>::from_timestamp(secs, 0) {
            Some(at) => Some(OperatorContext::new(at)),
            None => {
                warn!(secs, "invalid operator login timestamp in session cookie");
                None
            }
        }))
    }

    /// Require a live operator session or fail with `401 Unauthorized`.
    ///
    /// Expired sessions are purged.
    pub fn require_operator(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<OperatorContext, Error> {
        let operator = self
            .operator()?
            .ok_or_else(|| Error::unauthorized("operator login required"))?;
        if operator.is_expired(now, ttl) {
            debug!(login_at = %operator.authenticated_at(), "operator session expired");
            self.clear();
            return Err(Error::unauthorized("operator session expired"));
        }
        Ok(operator)
    }
}

impl FromRequest for OperatorSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(OperatorSession::new) })
    }
}
