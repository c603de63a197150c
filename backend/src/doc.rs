//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response
//! schemas, and the operator session cookie security scheme. Swagger UI
//! serves it in debug builds and `openapi-dump` prints it for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Credential, Error, ErrorCode, RedemptionCode};
use crate::inbound::http::admin_auth::{LoginRequest, SessionResponse};
use crate::inbound::http::admin_inventory::{NewCodeRequest, NewCredentialRequest};
use crate::inbound::http::redeem::{DeliveredAccount, RedeemRequest, RedeemResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Operator session cookie issued by POST /api/v1/admin/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Keyvend API",
        description = "Redeem single-use codes for account credentials and manage the inventory."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::redeem::redeem,
        crate::inbound::http::admin_auth::login,
        crate::inbound::http::admin_auth::logout,
        crate::inbound::http::admin_auth::current_session,
        crate::inbound::http::admin_inventory::list_accounts,
        crate::inbound::http::admin_inventory::create_account,
        crate::inbound::http::admin_inventory::delete_account,
        crate::inbound::http::admin_inventory::list_codes,
        crate::inbound::http::admin_inventory::create_code,
        crate::inbound::http::admin_inventory::delete_code,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Credential,
        RedemptionCode,
        RedeemRequest,
        RedeemResponse,
        DeliveredAccount,
        LoginRequest,
        SessionResponse,
        NewCredentialRequest,
        NewCodeRequest,
    )),
    tags(
        (name = "redemption", description = "Public code redemption"),
        (name = "admin", description = "Operator session and inventory management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
