//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and role-based authorization.

pub mod require_role;
pub mod trace;

pub use require_role::RequireRole;
pub use trace::Trace;
