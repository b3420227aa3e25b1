//! PostgreSQL-backed `TenantRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TenantRepository, TenantRepositoryError};
use crate::domain::{Tenant, TenantId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTenantRow, TenantRow};
use super::pool::DbPool;
use super::schema::tenants;

/// Diesel-backed implementation of the `TenantRepository` port.
#[derive(Clone)]
pub struct DieselTenantRepository {
    pool: DbPool,
}

impl DieselTenantRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert `tenant` unless a tenant with its id already exists.
    ///
    /// Only used to provision the development tenant; tenants are otherwise
    /// managed outside this service.
    ///
    /// # Errors
    ///
    /// Returns [`TenantRepositoryError`] when the pool or the insert fails.
    pub async fn ensure(&self, tenant: &Tenant) -> Result<(), TenantRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, TenantRepositoryError::connection))?;

        diesel::insert_into(tenants::table)
            .values(&NewTenantRow {
                id: *tenant.id.as_uuid(),
                name: &tenant.name,
            })
            .on_conflict(tenants::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_tenant_error(&err))
    }
}

fn map_tenant_error(error: &diesel::result::Error) -> TenantRepositoryError {
    map_basic_diesel_error(
        error,
        TenantRepositoryError::query,
        TenantRepositoryError::connection,
    )
}

#[async_trait]
impl TenantRepository for DieselTenantRepository {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, TenantRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, TenantRepositoryError::connection))?;

        let row: Option<TenantRow> = tenants::table
            .find(*id.as_uuid())
            .select(TenantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_tenant_error(&err))?;

        Ok(row.map(|tenant| Tenant {
            id: TenantId::from_uuid(tenant.id),
            name: tenant.name,
        }))
    }
}
