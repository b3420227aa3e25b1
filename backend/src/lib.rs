//! Tenant-scoped customer management service.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the
//! customer model, its rules and the ports; [`inbound`] exposes them over
//! HTTP; [`outbound`] provides Diesel and in-memory repositories.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
