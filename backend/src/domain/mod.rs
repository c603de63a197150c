//! Domain primitives, services, and ports.
//!
//! Purpose: define the credential vending core independently of transport
//! and storage. Inbound adapters call the driving ports; outbound adapters
//! implement the driven ones.
//!
//! Public surface:
//! - `Credential`, `RedemptionCode` and their identifier/value types.
//! - `RedemptionService` and `AdminService`.
//! - `Error` / `ErrorCode`: the transport-agnostic error payload.
//! - `OperatorContext`: proof of operator authentication.

pub mod admin_service;
pub mod credential;
pub mod error;
pub mod operator;
pub mod ports;
pub mod redemption_code;
pub mod redemption_service;
pub mod trace_id;

pub use self::admin_service::{AdminError, AdminService};
pub use self::credential::{
    CREDENTIAL_FIELD_MAX, Credential, CredentialId, CredentialValidationError, InvalidIdError,
    NewCredential,
};
pub use self::error::{Error, ErrorCode};
pub use self::operator::{
    DEFAULT_OPERATOR_SESSION_TTL_SECS, EmptyPasswordError, OperatorContext, OperatorPassword,
    session_ttl_from_secs,
};
pub use self::redemption_code::{CODE_VALUE_MAX, CodeId, CodeValue, CodeValueError, RedemptionCode};
pub use self::redemption_service::{
    DeliveryMode, RedemptionError, RedemptionService, UnknownDeliveryModeError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use keyvend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("operator login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
