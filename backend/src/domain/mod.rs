//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed entities used by the API and persistence
//! layers and the service that applies customer rules on top of them. Types
//! here stay framework agnostic; HTTP and Diesel concerns live in the
//! adapters.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - Customer, CustomerDraft, CustomerId, ContactDetails: the customer model.
//! - Tenant, TenantId: tenant references.
//! - CallerContext, Role, UserId: the authenticated caller.
//! - CustomerService: implementation of the customer driving ports.

pub mod auth;
pub mod caller;
pub mod customer;
pub mod customer_service;
pub mod error;
pub mod ports;
pub mod tenant;
pub mod trace_id;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::caller::{CallerContext, Role, UnknownRoleError, UserId};
pub use self::customer::{
    CONTACT_FIELD_MAX, CUSTOMER_NAME_MAX, ContactDetails, Customer, CustomerDraft, CustomerId,
    CustomerValidationError,
};
pub use self::customer_service::CustomerService;
pub use self::error::{Error, ErrorCode};
pub use self::tenant::{Tenant, TenantId};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
