//! In-process customer and tenant store.
//!
//! Backs the service when no database is configured and gives tests a real
//! repository with the same revision and constraint semantics as the Diesel
//! adapters: duplicate ids and unknown tenants are rejected, replacements
//! bump the revision, and missed replacements report missing or stale rows.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    CustomerRepository, CustomerRepositoryError, TenantRepository, TenantRepositoryError,
};
use crate::domain::{Customer, CustomerId, Tenant, TenantId};

#[derive(Debug, Default)]
struct StoreState {
    tenants: BTreeMap<TenantId, Tenant>,
    customers: BTreeMap<CustomerId, Customer>,
}

/// Customer and tenant store held in memory.
///
/// # Examples
/// ```
/// use tenant_customers::domain::{Tenant, TenantId};
/// use tenant_customers::outbound::memory::InMemoryCustomerStore;
///
/// let tenant = Tenant { id: TenantId::random(), name: "Acme".to_owned() };
/// let store = InMemoryCustomerStore::with_tenants([tenant]);
/// # drop(store);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    state: RwLock<StoreState>,
}

impl InMemoryCustomerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already knows the given tenants.
    pub fn with_tenants(tenants: impl IntoIterator<Item = Tenant>) -> Self {
        let state = StoreState {
            tenants: tenants
                .into_iter()
                .map(|tenant| (tenant.id, tenant))
                .collect(),
            customers: BTreeMap::new(),
        };
        Self {
            state: RwLock::new(state),
        }
    }

    /// Register a tenant.
    pub async fn add_tenant(&self, tenant: Tenant) {
        self.state.write().await.tenants.insert(tenant.id, tenant);
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerStore {
    async fn list_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<Customer>, CustomerRepositoryError> {
        let state = self.state.read().await;
        let mut customers: Vec<Customer> = state
            .customers
            .values()
            .filter(|customer| customer.tenant_id() == *tenant_id)
            .cloned()
            .collect();
        customers.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(customers)
    }

    async fn find_by_id(
        &self,
        id: &CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(self.state.read().await.customers.get(id).cloned())
    }

    async fn insert(&self, customer: &Customer) -> Result<(), CustomerRepositoryError> {
        let mut state = self.state.write().await;
        if state.customers.contains_key(&customer.id()) {
            return Err(CustomerRepositoryError::duplicate(*customer.id().as_uuid()));
        }
        if !state.tenants.contains_key(&customer.tenant_id()) {
            return Err(CustomerRepositoryError::unknown_tenant(
                *customer.tenant_id().as_uuid(),
            ));
        }
        state.customers.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn replace(
        &self,
        customer: &Customer,
        expected_revision: Option<u32>,
    ) -> Result<Customer, CustomerRepositoryError> {
        let mut state = self.state.write().await;
        if !state.tenants.contains_key(&customer.tenant_id()) {
            return Err(CustomerRepositoryError::unknown_tenant(
                *customer.tenant_id().as_uuid(),
            ));
        }

        let id = customer.id();
        let current = state
            .customers
            .get(&id)
            .map(Customer::revision)
            .ok_or_else(|| CustomerRepositoryError::missing(*id.as_uuid()))?;
        if expected_revision.is_some_and(|expected| expected != current) {
            return Err(CustomerRepositoryError::stale(*id.as_uuid(), current));
        }

        let stored = customer.clone().with_revision(current.saturating_add(1));
        state.customers.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, CustomerRepositoryError> {
        Ok(self.state.write().await.customers.remove(id).is_some())
    }
}

#[async_trait]
impl TenantRepository for InMemoryCustomerStore {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, TenantRepositoryError> {
        Ok(self.state.read().await.tenants.get(id).cloned())
    }
}
