//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Query`, `*Command`, `LoginService`) are called by inbound
//! adapters. Each port ships a `Fixture*` implementation for tests that do
//! not exercise it.

mod macros;
pub(crate) use macros::define_port_error;

mod customer_repository;
mod customers_command;
mod customers_query;
mod login_service;
mod tenant_repository;

#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{
    CustomerRepository, CustomerRepositoryError, FixtureCustomerRepository,
};
#[cfg(test)]
pub use customers_command::MockCustomersCommand;
pub use customers_command::{
    CreateCustomerRequest, CustomersCommand, DeleteCustomerRequest, FixtureCustomersCommand,
    UpdateCustomerRequest,
};
#[cfg(test)]
pub use customers_query::MockCustomersQuery;
pub use customers_query::{
    CustomersQuery, FixtureCustomersQuery, GetCustomerRequest, ListTenantCustomersRequest,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    DisabledLoginService, FIXTURE_TENANT_ID, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
pub use tenant_repository::{FixtureTenantRepository, TenantRepository, TenantRepositoryError};
