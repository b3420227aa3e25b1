//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving the caller's
//! claims.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use uuid::Uuid;

use crate::domain::{CallerContext, Error, Role, TenantId, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";
pub(crate) const TENANT_ID_KEY: &str = "tenant_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated caller's claims in the session cookie.
    pub fn persist_caller(&self, caller: &CallerContext) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, caller.user_id.to_string())?;
        self.insert(ROLE_KEY, caller.role.to_string())?;
        self.insert(TENANT_ID_KEY, caller.tenant_id.to_string())
    }

    /// Fetch the caller's claims from the session, if present and well formed.
    pub fn caller(&self) -> Result<Option<CallerContext>, Error> {
        let (Some(user_id), Some(role), Some(tenant_id)) = (
            self.read(USER_ID_KEY)?,
            self.read(ROLE_KEY)?,
            self.read(TENANT_ID_KEY)?,
        ) else {
            return Ok(None);
        };
        Ok(parse_claims(&user_id, &role, &tenant_id))
    }

    /// Require an authenticated caller or return `401 Unauthorized`.
    pub fn require_caller(&self) -> Result<CallerContext, Error> {
        self.caller()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every claim and expire the session cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    fn insert(&self, key: &str, value: String) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }
}

fn parse_claims(user_id: &str, role: &str, tenant_id: &str) -> Option<CallerContext> {
    let parsed = Uuid::parse_str(user_id).and_then(|user| {
        Uuid::parse_str(tenant_id).map(|tenant| (UserId::from_uuid(user), TenantId::from_uuid(tenant)))
    });
    let (user, tenant) = match parsed {
        Ok(ids) => ids,
        Err(error) => {
            tracing::warn!("invalid identifier in session cookie: {error}");
            return None;
        }
    };
    match role.parse::<Role>() {
        Ok(parsed_role) => Some(CallerContext::new(user, parsed_role, tenant)),
        Err(error) => {
            tracing::warn!("invalid role in session cookie: {error}");
            None
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Extract the caller resolved by [`crate::middleware::RequireRole`].
///
/// Routes without the guard fall back to reading the session directly, so
/// the extractor answers `401 Unauthorized` when nobody is logged in.
impl FromRequest for CallerContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(caller) = req.extensions().get::<CallerContext>() {
            return ready(Ok(*caller));
        }
        let session = SessionContext::new(req.get_session());
        ready(session.require_caller().map_err(actix_web::Error::from))
    }
}
