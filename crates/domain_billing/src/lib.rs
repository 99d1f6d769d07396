//! Billing Domain - Credit Card Installments
//!
//! This crate turns a credit card purchase into an installment plan: one
//! amount and one due date per installment.
//!
//! # Components
//!
//! - **Settings**: the user's payment day and optional statement closing day,
//!   validated once when read from the profile
//! - **Cycle**: which statement a purchase falls on and when each installment
//!   is due
//! - **Split**: per-installment amounts that add back to the exact total, with
//!   the rounding remainder on the first installment
//! - **Plan**: the two combined into an ordered list of entries, plus the
//!   parent/child records the persistence layer writes
//!
//! Everything here is pure and synchronous. Dates come from the caller; the
//! clock is never read.
//!
//! # Example
//!
//! ```rust
//! use domain_billing::{DayOfMonth, InvoiceSettings, PlanRequest};
//! use core_kernel::Currency;
//!
//! let settings = InvoiceSettings::new(DayOfMonth::new(5).unwrap(), DayOfMonth::new(29));
//! let plan = PlanRequest::new("2024-11-02", "100.00", 3)
//!     .build(&settings, Currency::BRL)
//!     .unwrap();
//!
//! let due: Vec<String> = plan.entries().iter().map(|e| e.due_date.to_string()).collect();
//! assert_eq!(due, ["2024-12-05", "2025-01-05", "2025-02-05"]);
//! ```

pub mod settings;
pub mod cycle;
pub mod split;
pub mod plan;
pub mod error;

pub use settings::{DayOfMonth, InvoiceSettings, DEFAULT_PAYMENT_DAY};
pub use cycle::{resolve_due_date, resolve_with_settings};
pub use split::{split_amount, MAX_INSTALLMENTS, MAX_TOTAL_AMOUNT};
pub use plan::{
    build_plan, parse_purchase_date, parse_total_amount, InstallmentEntry, InstallmentPlan,
    InstallmentRecord, PlanRequest,
};
pub use error::{BillingError, Field, Violation};
