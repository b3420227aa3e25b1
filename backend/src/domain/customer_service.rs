//! Customer domain service.
//!
//! Implements the customer driving ports on top of the customer and tenant
//! repositories. Role checks happen before a request reaches this service;
//! the only caller-dependent rule here is which tenant a new customer joins.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    CreateCustomerRequest, CustomerRepository, CustomerRepositoryError, CustomersCommand,
    CustomersQuery, DeleteCustomerRequest, GetCustomerRequest, ListTenantCustomersRequest,
    TenantRepository, TenantRepositoryError, UpdateCustomerRequest,
};
use crate::domain::{
    CallerContext, Customer, CustomerId, CustomerValidationError, Error, TenantId,
};

const CUSTOMER_NOT_FOUND: &str = "This customer was not found";
const TENANT_HAS_NO_CUSTOMERS: &str = "This tenant does not have any customers";

fn map_customer_error(error: CustomerRepositoryError) -> Error {
    match error {
        CustomerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("customer repository unavailable: {message}"))
        }
        CustomerRepositoryError::Query { message } => {
            Error::internal(format!("customer repository error: {message}"))
        }
        CustomerRepositoryError::Duplicate { id } => {
            Error::conflict(format!("customer {id} already exists"))
                .with_details(json!({ "field": "id", "code": "duplicate_customer" }))
        }
        CustomerRepositoryError::UnknownTenant { tenant_id } => {
            Error::not_found_tenant(format!("tenant {tenant_id} was not found"))
        }
        CustomerRepositoryError::Missing { .. } => Error::not_found_customer(CUSTOMER_NOT_FOUND),
        CustomerRepositoryError::Stale { id, actual } => {
            Error::concurrency_conflict(format!("customer {id} was modified concurrently"))
                .with_details(json!({ "id": id, "revision": actual }))
        }
    }
}

fn map_tenant_error(error: TenantRepositoryError) -> Error {
    match error {
        TenantRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("tenant repository unavailable: {message}"))
        }
        TenantRepositoryError::Query { message } => {
            Error::internal(format!("tenant repository error: {message}"))
        }
    }
}

fn map_validation_error(error: &CustomerValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "invalid_customer",
    }))
}

/// Customer service implementing both customer driving ports.
#[derive(Clone)]
pub struct CustomerService<C, T> {
    customers: Arc<C>,
    tenants: Arc<T>,
}

impl<C, T> CustomerService<C, T> {
    /// Create a new service over the customer and tenant repositories.
    pub fn new(customers: Arc<C>, tenants: Arc<T>) -> Self {
        Self { customers, tenants }
    }
}

impl<C, T> CustomerService<C, T>
where
    C: CustomerRepository,
    T: TenantRepository,
{
    async fn ensure_tenant(&self, tenant_id: TenantId) -> Result<(), Error> {
        self.tenants
            .find_by_id(&tenant_id)
            .await
            .map_err(map_tenant_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found_tenant(format!("tenant {tenant_id} was not found")))
    }

    async fn find_customer(&self, id: CustomerId) -> Result<Customer, Error> {
        self.customers
            .find_by_id(&id)
            .await
            .map_err(map_customer_error)?
            .ok_or_else(|| Error::not_found_customer(CUSTOMER_NOT_FOUND))
    }
}

/// Choose the tenant a new customer joins.
///
/// Tenant and system administrators may place a customer in any tenant by
/// naming it; everyone else always creates within their own tenant.
fn creation_tenant(caller: &CallerContext, requested: Option<TenantId>) -> TenantId {
    match requested {
        Some(tenant_id) if !tenant_id.is_nil() && caller.role.manages_tenants() => tenant_id,
        Some(tenant_id) if !tenant_id.is_nil() && tenant_id != caller.tenant_id => {
            warn!(
                user_id = %caller.user_id,
                role = %caller.role,
                requested_tenant = %tenant_id,
                "payload tenant ignored for caller without tenant administration rights"
            );
            caller.tenant_id
        }
        _ => caller.tenant_id,
    }
}

#[async_trait]
impl<C, T> CustomersQuery for CustomerService<C, T>
where
    C: CustomerRepository,
    T: TenantRepository,
{
    async fn list_by_tenant(
        &self,
        request: ListTenantCustomersRequest,
    ) -> Result<Vec<Customer>, Error> {
        debug!(tenant_id = %request.tenant_id, "listing tenant customers");
        let customers = self
            .customers
            .list_by_tenant(&request.tenant_id)
            .await
            .map_err(map_customer_error)?;

        if customers.is_empty() {
            return Err(Error::not_found_customer(TENANT_HAS_NO_CUSTOMERS));
        }
        Ok(customers)
    }

    async fn get_customer(&self, request: GetCustomerRequest) -> Result<Customer, Error> {
        debug!(customer_id = %request.id, "fetching customer");
        self.find_customer(request.id).await
    }
}

#[async_trait]
impl<C, T> CustomersCommand for CustomerService<C, T>
where
    C: CustomerRepository,
    T: TenantRepository,
{
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer, Error> {
        let CreateCustomerRequest { caller, draft } = request;
        let tenant_id = creation_tenant(&caller, draft.tenant_id);
        self.ensure_tenant(tenant_id).await?;

        let id = draft
            .id
            .filter(|requested| !requested.as_uuid().is_nil())
            .unwrap_or_else(CustomerId::random);
        let customer = Customer::try_new(id, tenant_id, &draft.name, draft.contact, 1)
            .map_err(|err| map_validation_error(&err))?;

        self.customers
            .insert(&customer)
            .await
            .map_err(map_customer_error)?;
        info!(
            customer_id = %id,
            tenant_id = %tenant_id,
            user_id = %caller.user_id,
            "customer created"
        );

        self.find_customer(id).await
    }

    async fn update_customer(&self, request: UpdateCustomerRequest) -> Result<(), Error> {
        let UpdateCustomerRequest { caller, id, draft } = request;
        if draft.id != Some(id) {
            return Err(
                Error::invalid_request("customer id in the body does not match the path")
                    .with_details(json!({ "field": "id", "code": "id_mismatch" })),
            );
        }

        let tenant_id = draft.tenant_id.ok_or_else(|| {
            Error::invalid_request("missing required field: tenantId")
                .with_details(json!({ "field": "tenantId", "code": "missing_field" }))
        })?;
        self.ensure_tenant(tenant_id).await?;

        let current_revision = draft.revision.unwrap_or_default();
        let customer = Customer::try_new(id, tenant_id, &draft.name, draft.contact, current_revision)
            .map_err(|err| map_validation_error(&err))?;

        match self.customers.replace(&customer, draft.revision).await {
            Ok(stored) => {
                info!(
                    customer_id = %id,
                    revision = stored.revision(),
                    user_id = %caller.user_id,
                    "customer updated"
                );
                Ok(())
            }
            Err(err @ CustomerRepositoryError::Stale { .. }) => {
                error!(
                    customer_id = %id,
                    expected_revision = ?draft.revision,
                    error = %err,
                    "concurrent customer update rejected"
                );
                Err(map_customer_error(err))
            }
            Err(err) => Err(map_customer_error(err)),
        }
    }

    async fn delete_customer(&self, request: DeleteCustomerRequest) -> Result<Customer, Error> {
        let DeleteCustomerRequest { caller, id } = request;
        let customer = self.find_customer(id).await?;

        let deleted = self
            .customers
            .delete(&id)
            .await
            .map_err(map_customer_error)?;
        if !deleted {
            return Err(Error::not_found_customer(CUSTOMER_NOT_FOUND));
        }

        info!(customer_id = %id, user_id = %caller.user_id, "customer deleted");
        Ok(customer)
    }
}

#[cfg(test)]
#[path = "customer_service_tests.rs"]
mod tests;
