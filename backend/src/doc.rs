//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in the inbound layer, the request and
//! error schemas, and the session cookie security scheme. Swagger UI serves
//! it in debug builds and `openapi-dump` prints it.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::customers::{CustomerRequestBody, CustomerResponseBody};
use crate::inbound::http::login::{LoginRequest, LoginResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
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
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tenant customers API",
        description = "Tenant-scoped customer management behind session-based role checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::login::login,
        crate::inbound::http::login::logout,
        crate::inbound::http::customers::list_tenant_customers,
        crate::inbound::http::customers::get_customer,
        crate::inbound::http::customers::update_customer,
        crate::inbound::http::customers::create_customer,
        crate::inbound::http::customers::delete_customer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        LoginResponse,
        CustomerRequestBody,
        CustomerResponseBody
    )),
    tags(
        (name = "session", description = "Login and logout"),
        (name = "customers", description = "Customers of a tenant"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
