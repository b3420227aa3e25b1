//! Driving port for customer read operations.
//!
//! Inbound adapters use this port to read customers without depending on
//! repository details.

use async_trait::async_trait;

use crate::domain::{Customer, CustomerId, Error, TenantId};

/// Request to list every customer of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTenantCustomersRequest {
    /// Tenant whose customers are listed.
    pub tenant_id: TenantId,
}

/// Request to fetch one customer by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetCustomerRequest {
    /// Target customer.
    pub id: CustomerId,
}

/// Driving port for customer read operations.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() {
/// use tenant_customers::domain::TenantId;
/// use tenant_customers::domain::ports::{
///     CustomersQuery, FixtureCustomersQuery, ListTenantCustomersRequest,
/// };
///
/// let query = FixtureCustomersQuery;
/// let result = query
///     .list_by_tenant(ListTenantCustomersRequest {
///         tenant_id: TenantId::random(),
///     })
///     .await;
/// assert!(result.is_err());
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomersQuery: Send + Sync {
    /// Lists the customers of a tenant.
    ///
    /// An empty result is reported as `not_found_customer`; an unknown tenant
    /// looks the same as a tenant without customers.
    async fn list_by_tenant(
        &self,
        request: ListTenantCustomersRequest,
    ) -> Result<Vec<Customer>, Error>;

    /// Fetches one customer, or `not_found_customer`.
    async fn get_customer(&self, request: GetCustomerRequest) -> Result<Customer, Error>;
}

/// Fixture query implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCustomersQuery;

#[async_trait]
impl CustomersQuery for FixtureCustomersQuery {
    async fn list_by_tenant(
        &self,
        _request: ListTenantCustomersRequest,
    ) -> Result<Vec<Customer>, Error> {
        Err(Error::not_found_customer(
            "This tenant does not have any customers",
        ))
    }

    async fn get_customer(&self, _request: GetCustomerRequest) -> Result<Customer, Error> {
        Err(Error::not_found_customer("This customer was not found"))
    }
}
