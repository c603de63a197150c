//! Public redemption endpoint.
//!
//! ```text
//! POST /api/v1/redeem {"code":"STEAM-AAAA"}
//! ```
//!
//! User-facing rejections (unknown code, empty pool) answer `200` with
//! `success: false` so clients render the message as-is.

use actix_web::{HttpResponse, http::StatusCode, post, web};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{CodeValueError, Credential, RedemptionError, TraceId};
use crate::inbound::http::state::HttpState;

pub(crate) const MSG_DELIVERED: &str = "Your account has been delivered. The code has been used.";
pub(crate) const MSG_INVALID_CODE: &str = "Invalid code. Please check and try again.";
pub(crate) const MSG_NO_INVENTORY: &str = "No accounts are available for delivery right now.";
pub(crate) const MSG_EMPTY_CODE: &str = "Please enter a code.";
pub(crate) const MSG_CODE_TOO_LONG: &str = "That code is too long. Please check and try again.";
pub(crate) const MSG_SYSTEM_ERROR: &str = "A system error occurred. Please try again.";

/// Redemption request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    /// Code as typed by the user; case and surrounding whitespace are ignored.
    #[serde(alias = "key")]
    #[schema(example = "STEAM-AB12-CD34-EF56-GH78")]
    pub code: String,
}

/// Credential handed to the user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredAccount {
    pub username: String,
    pub password: String,
}

impl From<Credential> for DeliveredAccount {
    fn from(credential: Credential) -> Self {
        Self {
            username: credential.username,
            password: credential.password,
        }
    }
}

/// Redemption outcome.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<DeliveredAccount>,
}

impl RedeemResponse {
    fn delivered(credential: Credential) -> Self {
        Self {
            success: true,
            message: MSG_DELIVERED.to_owned(),
            account: Some(credential.into()),
        }
    }

    fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_owned(),
            account: None,
        }
    }
}

fn rejection(error: &RedemptionError) -> (StatusCode, &'static str) {
    match error {
        RedemptionError::InvalidInput(CodeValueError::Empty) => {
            (StatusCode::BAD_REQUEST, MSG_EMPTY_CODE)
        }
        RedemptionError::InvalidInput(CodeValueError::TooLong { .. }) => {
            (StatusCode::BAD_REQUEST, MSG_CODE_TOO_LONG)
        }
        RedemptionError::InvalidCode => (StatusCode::OK, MSG_INVALID_CODE),
        RedemptionError::NoInventory => (StatusCode::OK, MSG_NO_INVENTORY),
        RedemptionError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, MSG_SYSTEM_ERROR),
    }
}

/// Redeem a code for one account.
#[utoipa::path(
    post,
    path = "/api/v1/redeem",
    request_body = RedeemRequest,
    responses(
        (status = 200, description = "Delivered, or rejected with a user-facing message", body = RedeemResponse),
        (status = 400, description = "Blank or malformed code", body = RedeemResponse),
        (status = 500, description = "Storage failure", body = RedeemResponse)
    ),
    tags = ["redemption"],
    operation_id = "redeem",
    security([])
)]
#[post("/redeem")]
pub async fn redeem(state: web::Data<HttpState>, payload: web::Json<RedeemRequest>) -> HttpResponse {
    match state.redemption.redeem(&payload.code).await {
        Ok(credential) => HttpResponse::Ok().json(RedeemResponse::delivered(credential)),
        Err(err) => {
            if let RedemptionError::Storage { message } = &err {
                error!(
                    %message,
                    trace_id = ?TraceId::current().map(|id| id.to_string()),
                    "redemption failed on storage error"
                );
            }
            let (status, message) = rejection(&err);
            HttpResponse::build(status).json(RedeemResponse::rejected(message))
        }
    }
}
