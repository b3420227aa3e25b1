//! Tenant identity.
//!
//! Tenants are provisioned outside this service. The domain only needs to
//! reference them and confirm that a referenced tenant exists.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable tenant identifier.
///
/// The nil UUID is representable because inbound payloads may carry it as a
/// "no tenant chosen" marker; see [`TenantId::is_nil`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`TenantId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Whether this is the all-zero UUID.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TenantId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// A tenant row as seen by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Tenant identifier.
    pub id: TenantId,
    /// Tenant display name.
    pub name: String,
}
