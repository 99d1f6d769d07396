//! Core Kernel - Foundational types and utilities for the finance tracker
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Calendar dates free of timezone drift, with month arithmetic
//! - Common identifiers and port abstractions

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{CalendarDate, DateRange, MonthOfYear, Timezone, TemporalError};
pub use identifiers::{UserId, ExpenseId, IncomeId, CategoryId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
