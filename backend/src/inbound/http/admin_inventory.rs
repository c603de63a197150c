//! Operator inventory endpoints.
//!
//! ```text
//! GET    /api/v1/admin/accounts
//! POST   /api/v1/admin/accounts {"username":"alice","password":"p1"}
//! DELETE /api/v1/admin/accounts/{id}
//! GET    /api/v1/admin/codes
//! POST   /api/v1/admin/codes {"value":"STEAM-AAAA"}
//! DELETE /api/v1/admin/codes/{id}
//! ```
//!
//! Every handler resolves an operator context from the session first; the
//! stores are never reached without one.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{CodeId, Credential, CredentialId, Error, InvalidIdError, RedemptionCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin_auth::require_operator;
use crate::inbound::http::session::OperatorSession;
use crate::inbound::http::state::HttpState;

/// Credential creation body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCredentialRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "p1")]
    pub password: String,
}

/// Code creation body. Omit `value` to mint a random code.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCodeRequest {
    #[serde(default, alias = "keyValue", alias = "key_value")]
    #[schema(example = "STEAM-AB12-CD34-EF56-GH78")]
    pub value: Option<String>,
}

fn invalid_id(_: InvalidIdError) -> Error {
    Error::invalid_request("identifier must be a valid UUID")
        .with_details(json!({ "field": "id", "code": "invalid_id" }))
}

/// List credentials, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/accounts",
    responses(
        (status = 200, description = "Credentials", body = [Credential]),
        (status = 401, description = "Operator login required", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listAccounts"
)]
#[get("/admin/accounts")]
pub async fn list_accounts(
    state: web::Data<HttpState>,
    session: OperatorSession,
) -> ApiResult<web::Json<Vec<Credential>>> {
    let operator = require_operator(&state, &session)?;
    let credentials = state.admin.list_credentials(&operator).await?;
    Ok(web::Json(credentials))
}

/// Add a credential to the pool.
#[utoipa::path(
    post,
    path = "/api/v1/admin/accounts",
    request_body = NewCredentialRequest,
    responses(
        (status = 201, description = "Credential created", body = Credential),
        (status = 400, description = "Blank or overlong field", body = Error),
        (status = 401, description = "Operator login required", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createAccount"
)]
#[post("/admin/accounts")]
pub async fn create_account(
    state: web::Data<HttpState>,
    session: OperatorSession,
    payload: web::Json<NewCredentialRequest>,
) -> ApiResult<HttpResponse> {
    let operator = require_operator(&state, &session)?;
    let credential = state
        .admin
        .add_credential(&operator, &payload.username, &payload.password)
        .await?;
    Ok(HttpResponse::Created().json(credential))
}

/// Delete a credential.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/accounts/{id}",
    params(("id" = String, Path, description = "Credential identifier")),
    responses(
        (status = 204, description = "Credential deleted"),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Operator login required", body = Error),
        (status = 404, description = "Unknown credential", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteAccount"
)]
#[delete("/admin/accounts/{id}")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: OperatorSession,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let operator = require_operator(&state, &session)?;
    let id = CredentialId::parse(&path).map_err(invalid_id)?;
    state.admin.delete_credential(&operator, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List outstanding codes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/codes",
    responses(
        (status = 200, description = "Outstanding codes", body = [RedemptionCode]),
        (status = 401, description = "Operator login required", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listCodes"
)]
#[get("/admin/codes")]
pub async fn list_codes(
    state: web::Data<HttpState>,
    session: OperatorSession,
) -> ApiResult<web::Json<Vec<RedemptionCode>>> {
    let operator = require_operator(&state, &session)?;
    let codes = state.admin.list_codes(&operator).await?;
    Ok(web::Json(codes))
}

/// Store a code, minting one when no value is given.
#[utoipa::path(
    post,
    path = "/api/v1/admin/codes",
    request_body = NewCodeRequest,
    responses(
        (status = 201, description = "Code created", body = RedemptionCode),
        (status = 400, description = "Blank or overlong value", body = Error),
        (status = 401, description = "Operator login required", body = Error),
        (status = 409, description = "Code already exists", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createCode"
)]
#[post("/admin/codes")]
pub async fn create_code(
    state: web::Data<HttpState>,
    session: OperatorSession,
    payload: Option<web::Json<NewCodeRequest>>,
) -> ApiResult<HttpResponse> {
    let operator = require_operator(&state, &session)?;
    let value = payload.and_then(|body| body.into_inner().value);
    let code = state.admin.add_code(&operator, value).await?;
    Ok(HttpResponse::Created().json(code))
}

/// Delete an outstanding code.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/codes/{id}",
    params(("id" = String, Path, description = "Code identifier")),
    responses(
        (status = 204, description = "Code deleted"),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Operator login required", body = Error),
        (status = 404, description = "Unknown code", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteCode"
)]
#[delete("/admin/codes/{id}")]
pub async fn delete_code(
    state: web::Data<HttpState>,
    session: OperatorSession,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let operator = require_operator(&state, &session)?;
    let id = CodeId::parse(&path).map_err(invalid_id)?;
    state.admin.delete_code(&operator, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "admin_inventory_tests.rs"]
mod tests;
