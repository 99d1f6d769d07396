//! Expense Domain
//!
//! Expenses, credit card installment groups and the user profile that holds
//! the card's statement days, along with incomes, user categories and the
//! monthly overview that weighs one ledger against the other.
//!
//! # Installment groups
//!
//! A credit card purchase in N > 1 installments is stored as N expense
//! records built from a `domain_billing` plan:
//!
//! - installment 1 is the parent, dated on the first due date
//! - installments 2..N reference the parent and are dated on their own due dates
//! - every record carries the purchase date and `installments_total = N`
//!
//! The group is written as one unit and deleted as one unit. Installment
//! records cannot be edited.
//!
//! # Ports
//!
//! Storage is reached through [`ExpensePort`], [`IncomePort`],
//! [`CategoryPort`] and [`ProfilePort`]. The PostgreSQL adapters live in
//! `infra_db`; in-memory mocks are available behind the `mock` feature.

pub mod expense;
pub mod income;
pub mod category;
pub mod profile;
pub mod query;
pub mod overview;
pub mod ports;
pub mod service;
pub mod income_service;
pub mod category_service;
pub mod config;
pub mod error;

pub use expense::{
    installment_title, Expense, ExpenseChanges, ExpenseDraft, ExpensePatch, NewExpense,
    PaymentMethod,
};
pub use income::{Income, IncomeChanges, IncomeDraft, IncomePatch, NewIncome};
pub use category::{
    default_categories, Category, CategoryChanges, CategoryDraft, CategoryKind, CategoryPatch,
    NewCategory,
};
pub use profile::{ProfileUpdate, SettingUpdate, UserProfile};
pub use query::{Dated, ExpenseQuery, IncomeQuery, Period};
pub use overview::{CategoryTotal, LifetimeTotals, MonthlyOverview, TopExpense};
pub use ports::{CategoryPort, ExpensePort, IncomePort, ProfilePort};
pub use service::{ExpenseService, MonthlyTotal};
pub use income_service::IncomeService;
pub use category_service::CategoryService;
pub use config::{ExpenseConfig, DEFAULT_MAX_INSTALLMENTS};
pub use error::ExpenseError;
