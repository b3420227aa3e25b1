//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL
//! through `diesel-async` and `bb8` connection pooling.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Database errors are mapped to the port error types; raw database
//!   messages are logged, not returned.
//!
//! # Example
//!
//! ```no_run
//! use tenant_customers::outbound::persistence::{DbPool, DieselCustomerRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), tenant_customers::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/customers")).await?;
//! let repo = DieselCustomerRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_customer_repository;
mod diesel_tenant_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_tenant_repository::DieselTenantRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError};
