//! Caller identity and role hierarchy.
//!
//! Operations receive the resolved caller explicitly as a [`CallerContext`]
//! rather than looking up an ambient principal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TenantId;

/// Role granted to an authenticated caller.
///
/// Variants are declared from least to most privileged so the derived
/// ordering doubles as the grant hierarchy: a role satisfies every
/// requirement at or below itself.
///
/// # Examples
/// ```
/// use tenant_customers::domain::Role;
///
/// assert!(Role::SystemAdmin.satisfies(Role::NormalUser));
/// assert!(!Role::CustomerAdmin.satisfies(Role::TenantAdmin));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Reads customers.
    NormalUser,
    /// Creates and updates customers.
    CustomerAdmin,
    /// Deletes customers and may create them in another tenant.
    TenantAdmin,
    /// Highest privilege.
    SystemAdmin,
}

impl Role {
    /// Whether this role meets the `required` role.
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }

    /// Roles allowed to pick a tenant other than their own.
    pub fn manages_tenants(self) -> bool {
        self.satisfies(Role::TenantAdmin)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::NormalUser => "NormalUser",
            Self::CustomerAdmin => "CustomerAdmin",
            Self::TenantAdmin => "TenantAdmin",
            Self::SystemAdmin => "SystemAdmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NormalUser" => Ok(Self::NormalUser),
            "CustomerAdmin" => Ok(Self::CustomerAdmin),
            "TenantAdmin" => Ok(Self::TenantAdmin),
            "SystemAdmin" => Ok(Self::SystemAdmin),
            other => Err(UnknownRoleError(other.to_owned())),
        }
    }
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Claims of the authenticated caller.
///
/// ## Invariants
/// - `tenant_id` is the caller's home tenant; it is the default tenant for
///   every customer the caller creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    /// Authenticated user.
    pub user_id: UserId,
    /// Granted role.
    pub role: Role,
    /// Home tenant.
    pub tenant_id: TenantId,
}

impl CallerContext {
    /// Build a caller context from resolved claims.
    pub fn new(user_id: UserId, role: Role, tenant_id: TenantId) -> Self {
        Self {
            user_id,
            role,
            tenant_id,
        }
    }
}
