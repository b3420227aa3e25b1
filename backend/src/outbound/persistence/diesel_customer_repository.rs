//! PostgreSQL-backed `CustomerRepository` implementation using Diesel ORM.
//!
//! Updates are explicit replace statements guarded by the `revision` column.
//! A replace that touches no row is followed by exactly one existence check
//! to tell a vanished customer from a concurrent modification.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{ContactDetails, Customer, CustomerId, TenantId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::models::{CustomerChanges, CustomerRow, NewCustomerRow};
use super::pool::{DbPool, PoolError};
use super::schema::customers;

/// Diesel-backed implementation of the `CustomerRepository` port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CustomerRepositoryError {
    map_basic_pool_error(error, CustomerRepositoryError::connection)
}

fn map_diesel_error(error: &DieselError) -> CustomerRepositoryError {
    map_basic_diesel_error(
        error,
        CustomerRepositoryError::query,
        CustomerRepositoryError::connection,
    )
}

/// Map a failed write, recognising duplicate ids and dangling tenants.
fn map_write_error(error: &DieselError, customer: &Customer) -> CustomerRepositoryError {
    match violated_constraint(error) {
        Some(DatabaseErrorKind::UniqueViolation) => {
            CustomerRepositoryError::duplicate(*customer.id().as_uuid())
        }
        Some(DatabaseErrorKind::ForeignKeyViolation) => {
            CustomerRepositoryError::unknown_tenant(*customer.tenant_id().as_uuid())
        }
        _ => map_diesel_error(error),
    }
}

fn revision_to_db(revision: u32) -> Result<i32, CustomerRepositoryError> {
    i32::try_from(revision)
        .map_err(|_| CustomerRepositoryError::query(format!("revision {revision} out of range")))
}

fn revision_from_db(revision: i32) -> Result<u32, CustomerRepositoryError> {
    u32::try_from(revision).map_err(|_| {
        CustomerRepositoryError::query(format!("stored revision {revision} is negative"))
    })
}

fn row_to_customer(row: CustomerRow) -> Result<Customer, CustomerRepositoryError> {
    let contact = ContactDetails {
        email: row.email,
        phone: row.phone,
        country: row.country,
        province: row.province,
        city: row.city,
        street: row.street,
        address: row.address,
        zip_code: row.zip_code,
    };
    Customer::try_new(
        CustomerId::from_uuid(row.id),
        TenantId::from_uuid(row.tenant_id),
        &row.name,
        contact,
        revision_from_db(row.revision)?,
    )
    .map_err(|err| CustomerRepositoryError::query(format!("stored customer {}: {err}", row.id)))
}

fn changes_for(customer: &Customer) -> CustomerChanges<'_> {
    let contact = customer.contact();
    CustomerChanges {
        tenant_id: *customer.tenant_id().as_uuid(),
        name: customer.name(),
        email: contact.email.as_deref(),
        phone: contact.phone.as_deref(),
        country: contact.country.as_deref(),
        province: contact.province.as_deref(),
        city: contact.city.as_deref(),
        street: contact.street.as_deref(),
        address: contact.address.as_deref(),
        zip_code: contact.zip_code.as_deref(),
    }
}

/// Explain why a replace touched no row.
async fn classify_missed_replace(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> CustomerRepositoryError {
    let current = customers::table
        .find(id)
        .select(customers::revision)
        .first::<i32>(conn)
        .await
        .optional();

    match current {
        Ok(Some(revision)) => match revision_from_db(revision) {
            Ok(actual) => CustomerRepositoryError::stale(id, actual),
            Err(err) => err,
        },
        Ok(None) => CustomerRepositoryError::missing(id),
        Err(err) => map_diesel_error(&err),
    }
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn list_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CustomerRow> = customers::table
            .filter(customers::tenant_id.eq(tenant_id.as_uuid()))
            .order((customers::name.asc(), customers::id.asc()))
            .select(CustomerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        rows.into_iter().map(row_to_customer).collect()
    }

    async fn find_by_id(
        &self,
        id: &CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CustomerRow> = customers::table
            .find(*id.as_uuid())
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.map(row_to_customer).transpose()
    }

    async fn insert(&self, customer: &Customer) -> Result<(), CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = changes_for(customer);

        let row = NewCustomerRow {
            id: *customer.id().as_uuid(),
            tenant_id: changes.tenant_id,
            name: changes.name,
            email: changes.email,
            phone: changes.phone,
            country: changes.country,
            province: changes.province,
            city: changes.city,
            street: changes.street,
            address: changes.address,
            zip_code: changes.zip_code,
            revision: revision_to_db(customer.revision())?,
        };

        diesel::insert_into(customers::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(&err, customer))
    }

    async fn replace(
        &self,
        customer: &Customer,
        expected_revision: Option<u32>,
    ) -> Result<Customer, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *customer.id().as_uuid();
        let changes = changes_for(customer);
        let assignments = (
            &changes,
            customers::revision.eq(customers::revision + 1),
            customers::updated_at.eq(diesel::dsl::now),
        );

        let updated: Option<CustomerRow> = match expected_revision {
            Some(expected) => {
                let expected_db = revision_to_db(expected)?;
                diesel::update(
                    customers::table
                        .find(id)
                        .filter(customers::revision.eq(expected_db)),
                )
                .set(assignments)
                .returning(CustomerRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
            }
            None => {
                diesel::update(customers::table.find(id))
                    .set(assignments)
                    .returning(CustomerRow::as_returning())
                    .get_result(&mut conn)
                    .await
                    .optional()
            }
        }
        .map_err(|err| map_write_error(&err, customer))?;

        match updated {
            Some(row) => row_to_customer(row),
            None => Err(classify_missed_replace(&mut conn, id).await),
        }
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(customers::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        Ok(deleted > 0)
    }
}
