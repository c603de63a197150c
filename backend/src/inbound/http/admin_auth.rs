//! Operator login, logout, and session status.
//!
//! ```text
//! POST /api/v1/admin/login {"password":"..."}
//! POST /api/v1/admin/logout
//! GET  /api/v1/admin/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::OperatorAuthError;
use crate::domain::{Error, OperatorContext, OperatorPassword};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::OperatorSession;
use crate::inbound::http::state::HttpState;

/// Operator login body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub password: String,
}

/// Current operator session.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub expires_at: DateTime<Utc>,
}

impl SessionResponse {
    fn for_operator(operator: &OperatorContext, state: &HttpState) -> Self {
        Self {
            authenticated: true,
            expires_at: operator.expires_at(state.operator_session_ttl),
        }
    }
}

/// Resolve the operator context for an admin request.
pub(crate) fn require_operator(
    state: &HttpState,
    session: &OperatorSession,
) -> Result<OperatorContext, Error> {
    session.require_operator(state.clock.utc(), state.operator_session_ttl)
}

fn map_auth_error(error: OperatorAuthError) -> Error {
    match error {
        OperatorAuthError::InvalidPassword => Error::unauthorized("invalid password"),
        OperatorAuthError::Unavailable { message } => {
            Error::service_unavailable(format!("operator authenticator unavailable: {message}"))
        }
    }
}

/// Authenticate the operator and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Operator session cookie"))),
        (status = 400, description = "Blank password", body = Error),
        (status = 401, description = "Invalid password", body = Error),
        (status = 503, description = "Authenticator unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: OperatorSession,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let password = OperatorPassword::try_new(payload.into_inner().password).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "password", "code": "empty_password" }))
    })?;
    let operator = state
        .authenticator
        .authenticate(&password)
        .await
        .map_err(map_auth_error)?;
    session.persist_login(&operator)?;
    info!(login_at = %operator.authenticated_at(), "operator logged in");
    Ok(web::Json(SessionResponse::for_operator(&operator, &state)))
}

/// Close the operator session. Succeeds even without one.
#[utoipa::path(
    post,
    path = "/api/v1/admin/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["admin"],
    operation_id = "adminLogout"
)]
#[post("/admin/logout")]
pub async fn logout(session: OperatorSession) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Report the current operator session.
#[utoipa::path(
    get,
    path = "/api/v1/admin/session",
    responses(
        (status = 200, description = "Active session", body = SessionResponse),
        (status = 401, description = "No active session", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSession"
)]
#[get("/admin/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: OperatorSession,
) -> ApiResult<web::Json<SessionResponse>> {
    let operator = require_operator(&state, &session)?;
    Ok(web::Json(SessionResponse::for_operator(&operator, &state)))
}
