//! Role guard attached to individual routes.
//!
//! [`RequireRole`] resolves the caller from the session before the handler
//! runs. Requests without a valid session are rejected with
//! `401 Unauthorized`; callers whose role is below the requirement get
//! `403 Forbidden`. Admitted callers are stored in the request extensions
//! where the [`CallerContext`] extractor picks them up.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{CallerContext, Error as DomainError, Role};
use crate::inbound::http::session::SessionContext;

/// Middleware admitting callers whose role satisfies `required`.
///
/// # Examples
/// ```
/// use actix_web::{HttpResponse, web};
/// use tenant_customers::domain::Role;
/// use tenant_customers::middleware::RequireRole;
///
/// let route = web::resource("/customers")
///     .wrap(RequireRole::new(Role::CustomerAdmin))
///     .route(web::post().to(HttpResponse::Created));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireRole {
    required: Role,
}

impl RequireRole {
    /// Guard admitting `required` and every role above it.
    pub fn new(required: Role) -> Self {
        Self { required }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required: self.required,
        }))
    }
}

/// Service wrapper produced by [`RequireRole`].
pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required: Role,
}

fn admit(resolved: Option<CallerContext>, required: Role) -> Result<CallerContext, DomainError> {
    let caller = resolved.ok_or_else(|| DomainError::unauthorized("login required"))?;
    if caller.role.satisfies(required) {
        Ok(caller)
    } else {
        debug!(user_id = %caller.user_id, role = %caller.role, %required, "role guard rejected caller");
        Err(DomainError::forbidden(format!("{required} role required")))
    }
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required = self.required;
        // Resolve inside the future so rejections see the request's trace id.
        Box::pin(async move {
            let session = SessionContext::new(req.get_session());
            match session
                .caller()
                .and_then(|resolved| admit(resolved, required))
            {
                Ok(caller) => {
                    req.extensions_mut().insert(caller);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(error) => Ok(req
                    .into_response(HttpResponse::from_error(error))
                    .map_into_right_body()),
            }
        })
    }
}
