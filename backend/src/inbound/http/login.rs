//! Login and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"customeradmin","password":"password"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{CallerContext, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Claims granted by a successful login.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Authenticated user.
    #[schema(example = "5a1c0e7b-4f2d-4c11-9d3e-000000000103")]
    pub user_id: String,
    /// Granted role.
    #[schema(example = "CustomerAdmin")]
    pub role: String,
    /// Home tenant.
    #[schema(example = "5a1c0e7b-4f2d-4c11-9d3e-000000000001")]
    pub tenant_id: String,
}

impl From<CallerContext> for LoginResponse {
    fn from(caller: CallerContext) -> Self {
        Self {
            user_id: caller.user_id.to_string(),
            role: caller.role.to_string(),
            tenant_id: caller.tenant_id.to_string(),
        }
    }
}

/// Authenticate a caller and store their claims in the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let caller = state.login.authenticate(&credentials).await?;
    session.persist_caller(&caller)?;
    tracing::info!(user_id = %caller.user_id, role = %caller.role, "caller logged in");
    Ok(web::Json(LoginResponse::from(caller)))
}

/// Drop the caller's session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let details = match err {
        LoginValidationError::EmptyUsername => {
            json!({ "field": "username", "code": "empty_username" })
        }
        LoginValidationError::EmptyPassword => {
            json!({ "field": "password", "code": "empty_password" })
        }
    };
    Error::invalid_request(err.to_string()).with_details(details)
}
