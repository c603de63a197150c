//! Application settings loaded via OrthoConfig.
//!
//! Values come from `KEYVEND_*` environment variables, command-line flags, or
//! a configuration file. Accessors apply defaults and validate the raw
//! strings so the server bootstrap only sees typed values.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{
    DEFAULT_OPERATOR_SESSION_TTL_SECS, DeliveryMode, OperatorPassword, UnknownDeliveryModeError,
    session_ttl_from_secs,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting [`AppSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error(transparent)]
    InvalidDeliveryMode(#[from] UnknownDeliveryModeError),
    #[error("no operator password configured; set KEYVEND_ADMIN_PASSWORD_FILE or KEYVEND_ADMIN_PASSWORD")]
    MissingAdminPassword,
    #[error("operator password must not be empty")]
    EmptyAdminPassword,
    #[error("failed to read operator password at {path}: {source}")]
    AdminPasswordRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runtime configuration for the vending server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KEYVEND")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; unset selects the in-memory stores.
    pub database_url: Option<String>,
    /// `shared` or `exclusive`.
    pub delivery_mode: Option<String>,
    /// Operator password given inline. The file variant wins when both are set.
    pub admin_password: Option<String>,
    /// File holding the operator password.
    pub admin_password_file: Option<PathBuf>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: Option<bool>,
    /// Operator session lifetime in seconds.
    pub operator_session_ttl_secs: Option<u64>,
}

impl AppSettings {
    /// Listening address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Database URL, if persistence is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Delivery mode, defaulting to [`DeliveryMode::Shared`].
    pub fn delivery_mode(&self) -> Result<DeliveryMode, SettingsError> {
        match self.delivery_mode.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(DeliveryMode::default()),
        }
    }

    /// Operator session lifetime.
    pub fn operator_session_ttl(&self) -> Duration {
        session_ttl_from_secs(
            self.operator_session_ttl_secs
                .unwrap_or(DEFAULT_OPERATOR_SESSION_TTL_SECS),
        )
    }

    /// Resolve the operator password.
    ///
    /// A trailing newline in the password file is ignored.
    pub fn admin_password(&self) -> Result<OperatorPassword, SettingsError> {
        if let Some(path) = &self.admin_password_file {
            let contents = Zeroizing::new(std::fs::read_to_string(path).map_err(|source| {
                SettingsError::AdminPasswordRead {
                    path: path.clone(),
                    source,
                }
            })?);
            let secret = contents.trim_end_matches(['\r', '\n']);
            return OperatorPassword::try_new(secret)
                .map_err(|_| SettingsError::EmptyAdminPassword);
        }
        match self.admin_password.as_deref() {
            Some(secret) => {
                OperatorPassword::try_new(secret).map_err(|_| SettingsError::EmptyAdminPassword)
            }
            None => Err(SettingsError::MissingAdminPassword),
        }
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("delivery_mode", &self.delivery_mode)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("admin_password_file", &self.admin_password_file)
            .field("session_key_file", &self.session_key_file)
            .field("session_allow_ephemeral", &self.session_allow_ephemeral)
            .field("cookie_secure", &self.cookie_secure)
            .field("operator_session_ttl_secs", &self.operator_session_ttl_secs)
            .finish()
    }
}
