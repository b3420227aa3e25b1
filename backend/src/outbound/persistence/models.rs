//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{customers, tenants};

/// Row struct for reading from the tenants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tenants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TenantRow {
    pub id: Uuid,
    pub name: String,
}

/// Insertable struct for provisioning tenant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tenants)]
pub(crate) struct NewTenantRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the customers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub revision: i32,
    #[expect(dead_code, reason = "maintained by the store; not part of the domain model")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "maintained by the store; not part of the domain model")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating customer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub country: Option<&'a str>,
    pub province: Option<&'a str>,
    pub city: Option<&'a str>,
    pub street: Option<&'a str>,
    pub address: Option<&'a str>,
    pub zip_code: Option<&'a str>,
    pub revision: i32,
}

/// Changeset replacing every mutable customer column.
///
/// `treat_none_as_null` makes a cleared contact field overwrite the stored
/// value instead of leaving it untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customers)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CustomerChanges<'a> {
    pub tenant_id: Uuid,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub country: Option<&'a str>,
    pub province: Option<&'a str>,
    pub city: Option<&'a str>,
    pub street: Option<&'a str>,
    pub address: Option<&'a str>,
    pub zip_code: Option<&'a str>,
}
