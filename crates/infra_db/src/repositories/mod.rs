//! Repository implementations
//!
//! Repositories own the SQL and return row types; the adapters turn rows into
//! domain values. Queries are built at runtime, so no database is needed at
//! compile time.

pub mod expense;
pub mod income;
pub mod category;
pub mod profile;

pub use expense::{ExpenseRepository, ExpenseRow};
pub use income::{IncomeRepository, IncomeRow};
pub use category::{CategoryRepository, CategoryRow};
pub use profile::{ProfileRepository, ProfileRow};
