//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for expenses, installment groups, incomes,
//! categories and user profiles, using SQLx.
//!
//! # Architecture
//!
//! - **pool**: connection pool settings and embedded migrations
//! - **repositories**: SQL and row types, one repository per table
//! - **adapters**: the `domain_expense` port implementations built on the
//!   repositories
//!
//! An installment group is inserted inside one transaction, so a failure on
//! any installment leaves no partial group behind. Deleting a group removes
//! the children and the parent in one transaction as well, and the default
//! category set is seeded the same way.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PgExpenseAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/finance")).await?;
//! run_migrations(&pool).await?;
//! let expenses = PgExpenseAdapter::new(pool.clone());
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::{PgCategoryAdapter, PgExpenseAdapter, PgIncomeAdapter, PgProfileAdapter};
