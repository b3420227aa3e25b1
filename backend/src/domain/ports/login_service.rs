//! Driving port for login/authentication use-cases.
//!
//! Credential checking belongs to an external identity system. Inbound
//! adapters call this port to turn credentials into the caller's claims
//! without knowing where they come from.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CallerContext, Error, LoginCredentials, Role, TenantId, UserId};

/// Tenant shared by the fixture accounts.
pub const FIXTURE_TENANT_ID: TenantId =
    TenantId::from_uuid(Uuid::from_u128(0x5a1c_0e7b_4f2d_4c11_9d3e_0000_0000_0001));

/// Password accepted for every fixture account.
const FIXTURE_PASSWORD: &str = "password";

/// Fixture accounts, one per role.
const FIXTURE_ACCOUNTS: [(&str, Role, u128); 4] = [
    ("sysadmin", Role::SystemAdmin, 0x5a1c_0e7b_4f2d_4c11_9d3e_0000_0000_0101),
    ("tenantadmin", Role::TenantAdmin, 0x5a1c_0e7b_4f2d_4c11_9d3e_0000_0000_0102),
    ("customeradmin", Role::CustomerAdmin, 0x5a1c_0e7b_4f2d_4c11_9d3e_0000_0000_0103),
    ("user", Role::NormalUser, 0x5a1c_0e7b_4f2d_4c11_9d3e_0000_0000_0104),
];

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the caller's claims.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<CallerContext, Error>;
}

/// In-memory authenticator for local runs and tests.
///
/// Accepts `sysadmin`, `tenantadmin`, `customeradmin` and `user`, each with
/// the password `password`, all homed in [`FIXTURE_TENANT_ID`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<CallerContext, Error> {
        if credentials.password() != FIXTURE_PASSWORD {
            return Err(Error::unauthorized("invalid credentials"));
        }

        FIXTURE_ACCOUNTS
            .iter()
            .find(|(username, _, _)| *username == credentials.username())
            .map(|(_, role, id)| {
                CallerContext::new(
                    UserId::from_uuid(Uuid::from_u128(*id)),
                    *role,
                    FIXTURE_TENANT_ID,
                )
            })
            .ok_or_else(|| Error::unauthorized("invalid credentials"))
    }
}

/// Authenticator for deployments where sessions are issued elsewhere.
///
/// Every login attempt is rejected; callers arrive with a session cookie
/// minted by the external identity system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLoginService;

#[async_trait]
impl LoginService for DisabledLoginService {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<CallerContext, Error> {
        Err(Error::unauthorized("password login is disabled"))
    }
}
