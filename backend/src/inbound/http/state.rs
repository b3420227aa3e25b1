//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CustomersCommand, CustomersQuery, LoginService};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use tenant_customers::domain::ports::{
///     FixtureCustomersCommand, FixtureCustomersQuery, FixtureLoginService,
/// };
/// use tenant_customers::inbound::http::state::HttpState;
///
/// let state = HttpState::new(
///     Arc::new(FixtureLoginService),
///     Arc::new(FixtureCustomersQuery),
///     Arc::new(FixtureCustomersCommand),
/// );
/// let _query = state.customers_query.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// Credential check behind `POST /login`.
    pub login: Arc<dyn LoginService>,
    /// Read side of the customer API.
    pub customers_query: Arc<dyn CustomersQuery>,
    /// Write side of the customer API.
    pub customers_command: Arc<dyn CustomersCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        login: Arc<dyn LoginService>,
        customers_query: Arc<dyn CustomersQuery>,
        customers_command: Arc<dyn CustomersCommand>,
    ) -> Self {
        Self {
            login,
            customers_query,
            customers_command,
        }
    }
}
