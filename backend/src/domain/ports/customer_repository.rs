//! Port for customer persistence.
//!
//! Adapters store customers keyed by id and support optimistic concurrency
//! through the `revision` column: every stored replacement increments it, and
//! a replacement may name the revision it expects to overwrite.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Customer, CustomerId, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by customer repository adapters.
    pub enum CustomerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "customer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "customer repository query failed: {message}",
        /// A customer with the same id is already stored.
        Duplicate { id: Uuid } => "customer {id} already exists",
        /// The customer references a tenant the store does not know.
        UnknownTenant { tenant_id: Uuid } => "tenant {tenant_id} does not exist",
        /// The customer to replace is no longer stored.
        Missing { id: Uuid } => "customer {id} does not exist",
        /// The customer is stored but no longer at the expected revision.
        Stale { id: Uuid, actual: u32 } =>
            "customer {id} was modified concurrently (now at revision {actual})",
    }
}

/// Port for customer storage and retrieval.
///
/// # Revision Semantics
///
/// - [`CustomerRepository::insert`] stores the revision carried by the
///   customer (the service always inserts at revision 1).
/// - [`CustomerRepository::replace`] overwrites every mutable column and
///   stores `revision + 1`. When `expected_revision` is `Some(n)` the write
///   only applies if the stored revision equals `n`.
/// - A replacement that affects no row re-checks existence exactly once and
///   reports [`CustomerRepositoryError::Missing`] or
///   [`CustomerRepositoryError::Stale`]. Adapters never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Every customer owned by `tenant_id`, ordered by name then id.
    async fn list_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<Customer>, CustomerRepositoryError>;

    /// Fetch a customer by identifier.
    async fn find_by_id(
        &self,
        id: &CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError>;

    /// Store a new customer.
    async fn insert(&self, customer: &Customer) -> Result<(), CustomerRepositoryError>;

    /// Replace a stored customer, returning the stored state.
    async fn replace(
        &self,
        customer: &Customer,
        expected_revision: Option<u32>,
    ) -> Result<Customer, CustomerRepositoryError>;

    /// Remove a customer. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &CustomerId) -> Result<bool, CustomerRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
///
/// Lookups find nothing and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCustomerRepository;

#[async_trait]
impl CustomerRepository for FixtureCustomerRepository {
    async fn list_by_tenant(
        &self,
        _tenant_id: &TenantId,
    ) -> Result<Vec<Customer>, CustomerRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: &CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _customer: &Customer) -> Result<(), CustomerRepositoryError> {
        Ok(())
    }

    async fn replace(
        &self,
        customer: &Customer,
        _expected_revision: Option<u32>,
    ) -> Result<Customer, CustomerRepositoryError> {
        Err(CustomerRepositoryError::missing(*customer.id().as_uuid()))
    }

    async fn delete(&self, _id: &CustomerId) -> Result<bool, CustomerRepositoryError> {
        Ok(false)
    }
}
