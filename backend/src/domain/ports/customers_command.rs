//! Driving port for customer mutations.
//!
//! Every request carries the caller explicitly; the role guard has already
//! admitted the caller by the time a command runs.

use async_trait::async_trait;

use crate::domain::{CallerContext, Customer, CustomerDraft, CustomerId, Error};

/// Request to create a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCustomerRequest {
    /// Authenticated caller.
    pub caller: CallerContext,
    /// Submitted payload.
    pub draft: CustomerDraft,
}

/// Request to replace a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCustomerRequest {
    /// Authenticated caller.
    pub caller: CallerContext,
    /// Identifier taken from the resource path.
    pub id: CustomerId,
    /// Submitted payload.
    pub draft: CustomerDraft,
}

/// Request to delete a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteCustomerRequest {
    /// Authenticated caller.
    pub caller: CallerContext,
    /// Target customer.
    pub id: CustomerId,
}

/// Driving port for customer mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomersCommand: Send + Sync {
    /// Creates a customer and returns it as stored.
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer, Error>;

    /// Replaces a customer.
    async fn update_customer(&self, request: UpdateCustomerRequest) -> Result<(), Error>;

    /// Deletes a customer and returns its last known state.
    async fn delete_customer(&self, request: DeleteCustomerRequest) -> Result<Customer, Error>;
}

/// Fixture command implementation that rejects every mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCustomersCommand;

#[async_trait]
impl CustomersCommand for FixtureCustomersCommand {
    async fn create_customer(&self, _request: CreateCustomerRequest) -> Result<Customer, Error> {
        Err(Error::service_unavailable("customer store is not configured"))
    }

    async fn update_customer(&self, _request: UpdateCustomerRequest) -> Result<(), Error> {
        Err(Error::not_found_customer("This customer was not found"))
    }

    async fn delete_customer(&self, _request: DeleteCustomerRequest) -> Result<Customer, Error> {
        Err(Error::not_found_customer("This customer was not found"))
    }
}
