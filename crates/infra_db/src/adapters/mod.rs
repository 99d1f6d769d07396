//! Domain Adapters
//!
//! PostgreSQL implementations of the `domain_expense` ports. Each adapter
//! wraps a repository, converts rows into domain values and translates
//! `DatabaseError` into `PortError`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::{PgExpenseAdapter, PgProfileAdapter};
//! use domain_expense::{ExpenseConfig, ExpenseService};
//! use std::sync::Arc;
//!
//! let service = ExpenseService::new(
//!     Arc::new(PgExpenseAdapter::new(pool.clone())),
//!     Arc::new(PgProfileAdapter::new(pool)),
//!     ExpenseConfig::default(),
//! );
//! ```

use std::time::Instant;

use sqlx::PgPool;

use core_kernel::HealthCheckResult;

pub mod expense;
pub mod income;
pub mod category;
pub mod profile;

pub use expense::PgExpenseAdapter;
pub use income::PgIncomeAdapter;
pub use category::PgCategoryAdapter;
pub use profile::PgProfileAdapter;

/// Runs `SELECT 1` against the pool and reports the round trip
pub(crate) async fn check_pool(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, start.elapsed()),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, start.elapsed(), format!("Database error: {e}")),
    }
}
