//! Builders for HTTP state ports and the backing customer store.

use std::sync::Arc;

use tracing::{info, warn};

use tenant_customers::domain::CustomerService;
use tenant_customers::domain::ports::{
    CustomerRepository, CustomersCommand, CustomersQuery, DisabledLoginService, FIXTURE_TENANT_ID,
    FixtureLoginService, LoginService, TenantRepository,
};
use tenant_customers::domain::Tenant;
use tenant_customers::inbound::http::state::HttpState;
use tenant_customers::outbound::memory::InMemoryCustomerStore;
use tenant_customers::outbound::persistence::{
    DbPool, DieselCustomerRepository, DieselTenantRepository, PoolConfig, run_pending_migrations,
};

use super::config::ServiceSettings;

const FIXTURE_TENANT_NAME: &str = "Fixture tenant";

/// Wrap a customer service in both driving ports.
fn customer_ports<C, T>(
    customers: Arc<C>,
    tenants: Arc<T>,
) -> (Arc<dyn CustomersQuery>, Arc<dyn CustomersCommand>)
where
    C: CustomerRepository + 'static,
    T: TenantRepository + 'static,
{
    let service = Arc::new(CustomerService::new(customers, tenants));
    (
        service.clone() as Arc<dyn CustomersQuery>,
        service as Arc<dyn CustomersCommand>,
    )
}

fn fixture_tenant() -> Tenant {
    Tenant {
        id: FIXTURE_TENANT_ID,
        name: FIXTURE_TENANT_NAME.to_owned(),
    }
}

/// In-memory store seeded with the tenant the fixture accounts belong to.
fn fixture_store() -> Arc<InMemoryCustomerStore> {
    Arc::new(InMemoryCustomerStore::with_tenants([fixture_tenant()]))
}

/// Pick the login port.
///
/// Without a database the fixture accounts are always available. With one,
/// they are only accepted when `fixture_login` is set; otherwise password
/// login is disabled and sessions come from the external identity system.
fn select_login_service<P>(pool: Option<&P>, fixture_login: bool) -> Arc<dyn LoginService> {
    match (pool, fixture_login) {
        (None, _) | (Some(_), true) => Arc::new(FixtureLoginService),
        (Some(_), false) => Arc::new(DisabledLoginService),
    }
}

/// Build HTTP state over Diesel repositories when a pool is present, or over
/// the in-memory store otherwise.
pub(crate) fn build_http_state(pool: Option<&DbPool>, fixture_login: bool) -> HttpState {
    let (customers_query, customers_command) = match pool {
        Some(pool) => customer_ports(
            Arc::new(DieselCustomerRepository::new(pool.clone())),
            Arc::new(DieselTenantRepository::new(pool.clone())),
        ),
        None => {
            let store = fixture_store();
            customer_ports(Arc::clone(&store), store)
        }
    };
    HttpState::new(
        select_login_service(pool, fixture_login),
        customers_query,
        customers_command,
    )
}

/// Provision the fixture tenant so the development accounts can write.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the tenant cannot be stored.
pub(crate) async fn seed_fixture_tenant(pool: &DbPool) -> std::io::Result<()> {
    warn!("development accounts enabled against the database");
    DieselTenantRepository::new(pool.clone())
        .ensure(&fixture_tenant())
        .await
        .map_err(|err| std::io::Error::other(format!("fixture tenant: {err}")))
}

/// Apply migrations and open the pool when a database is configured.
///
/// # Errors
///
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be
/// built.
pub(crate) async fn connect_database(settings: &ServiceSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url.as_deref() else {
        info!("no database configured; customers are kept in memory");
        return Ok(None);
    };

    if settings.run_migrations() {
        let applied = run_pending_migrations(url)
            .await
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
        info!(applied, "database migrations applied");
    }

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(Some(pool))
}
