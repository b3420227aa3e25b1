//! Port for tenant lookups.

use async_trait::async_trait;

use crate::domain::{Tenant, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tenant repository adapters.
    pub enum TenantRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "tenant repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "tenant repository query failed: {message}",
    }
}

/// Read-only access to tenants provisioned elsewhere.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Fetch a tenant by identifier.
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, TenantRepositoryError>;
}

/// Fixture implementation that knows no tenants.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTenantRepository;

#[async_trait]
impl TenantRepository for FixtureTenantRepository {
    async fn find_by_id(&self, _id: &TenantId) -> Result<Option<Tenant>, TenantRepositoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_repository_knows_no_tenants() {
        let repo = FixtureTenantRepository;
        let found = repo
            .find_by_id(&TenantId::random())
            .await
            .expect("fixture lookup");
        assert!(found.is_none());
    }
}
