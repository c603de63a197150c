//! Operator authentication primitives.
//!
//! Admin operations never consult ambient "logged in" state. Callers must
//! present an [`OperatorContext`], which only an authenticator or a verified
//! session can produce.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use zeroize::Zeroizing;

/// Default lifetime of an operator session, in seconds.
pub const DEFAULT_OPERATOR_SESSION_TTL_SECS: u64 = 3600;

/// Convert a configured session lifetime in seconds, saturating on overflow.
pub fn session_ttl_from_secs(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// Error returned when a login payload carries a blank password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password must not be empty")]
pub struct EmptyPasswordError;

/// Operator secret submitted at login.
///
/// The value keeps caller-provided whitespace and is wiped on drop.
///
/// # Examples
/// ```
/// use keyvend::domain::OperatorPassword;
///
/// let password = OperatorPassword::try_new("letmein").expect("non-empty");
/// assert_eq!(password.expose(), "letmein");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorPassword(Zeroizing<String>);

impl OperatorPassword {
    /// Wrap a raw password, rejecting empty input.
    pub fn try_new(raw: impl Into<String>) -> Result<Self, EmptyPasswordError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(EmptyPasswordError);
        }
        Ok(Self(raw))
    }

    /// Borrow the secret for comparison.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for OperatorPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OperatorPassword(<redacted>)")
    }
}

/// Proof that an operator authenticated at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorContext {
    authenticated_at: DateTime<Utc>,
}

impl OperatorContext {
    /// Record an authentication that happened at `authenticated_at`.
    pub fn new(authenticated_at: DateTime<Utc>) -> Self {
        Self { authenticated_at }
    }

    /// Instant the operator logged in.
    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }

    /// Instant the context stops being valid for the given session lifetime.
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.authenticated_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether the context has lapsed at `now`.
    ///
    /// A login stamped in the future is treated as expired so a tampered or
    /// skewed timestamp cannot extend a session.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.authenticated_at > now || now >= self.expires_at(ttl)
    }
}
