//! Test Utilities Crate
//!
//! Shared test infrastructure for the finance tracker test suite.
//!
//! # Modules
//!
//! - `fixtures`: fixed dates, amounts and invoice settings for the cycle edge cases
//! - `builders`: builders for expenses, incomes, categories, drafts and profiles
//! - `database`: PostgreSQL test container management
//! - `assertions`: plan and installment group invariant checks
//! - `generators`: proptest strategies
//! - `services`: every domain service wired to the in-memory ports

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;
pub mod services;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
pub use services::*;
