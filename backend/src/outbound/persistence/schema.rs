//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Tenants referenced by customers. Provisioned outside this service.
    tenants (id) {
        id -> Uuid,
        #[max_length = 200]
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Customers, each owned by exactly one tenant.
    customers (id) {
        id -> Uuid,
        /// Owning tenant; foreign key to `tenants.id`.
        tenant_id -> Uuid,
        #[max_length = 200]
        name -> Varchar,
        #[max_length = 200]
        email -> Nullable<Varchar>,
        #[max_length = 200]
        phone -> Nullable<Varchar>,
        #[max_length = 200]
        country -> Nullable<Varchar>,
        #[max_length = 200]
        province -> Nullable<Varchar>,
        #[max_length = 200]
        city -> Nullable<Varchar>,
        #[max_length = 200]
        street -> Nullable<Varchar>,
        #[max_length = 200]
        address -> Nullable<Varchar>,
        #[max_length = 200]
        zip_code -> Nullable<Varchar>,
        /// Optimistic concurrency token, bumped on every update.
        revision -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(customers -> tenants (tenant_id));

diesel::allow_tables_to_appear_in_same_query!(customers, tenants);
