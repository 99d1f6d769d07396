//! Billing domain errors
//!
//! Every variant names the input field it concerns so a form can attach the
//! message to the right control and translate it without parsing text.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use core_kernel::MoneyError;

/// Input fields the billing core validates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PurchaseDate,
    TotalAmount,
    InstallmentCount,
    InstallmentIndex,
    PaymentDay,
    ClosingDay,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PurchaseDate => "purchase_date",
            Field::TotalAmount => "total_amount",
            Field::InstallmentCount => "installment_count",
            Field::InstallmentIndex => "installment_index",
            Field::PaymentDay => "payment_day",
            Field::ClosingDay => "closing_day",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The constraint an amount or count failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// Not a number at all
    Unparseable,
    /// Zero or negative where a positive value is required
    NotPositive,
    /// Below one where a count or index starts at one
    BelowOne,
    /// Larger than the type can represent
    TooLarge,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Violation::Unparseable => "not a valid number",
            Violation::NotPositive => "must be greater than zero",
            Violation::BelowOne => "must be at least 1",
            Violation::TooLarge => "is too large",
        };
        f.write_str(text)
    }
}

/// Errors that can occur in the billing domain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// A date could not be parsed into a valid calendar day
    #[error("Invalid date in {field}: {input:?} ({reason})")]
    InvalidDate {
        field: Field,
        input: String,
        reason: String,
    },

    /// A monetary amount or a count broke its constraint
    #[error("Invalid {field}: {violation} (got {value})")]
    InvalidAmount {
        field: Field,
        violation: Violation,
        value: String,
    },

    /// A payment or closing day outside 1..=31
    #[error("Invalid {field}: {value} is not a day of the month (1-31)")]
    InvalidSetting {
        field: Field,
        value: i64,
    },

    /// Month arithmetic left the representable calendar
    #[error("Due date out of supported range: {0}")]
    DateOutOfRange(String),

    /// Arithmetic on amounts failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl BillingError {
    pub(crate) fn amount(field: Field, violation: Violation, value: impl ToString) -> Self {
        BillingError::InvalidAmount {
            field,
            violation,
            value: value.to_string(),
        }
    }

    /// The input field this error concerns, if any
    pub fn field(&self) -> Option<Field> {
        match self {
            BillingError::InvalidDate { field, .. }
            | BillingError::InvalidAmount { field, .. }
            | BillingError::InvalidSetting { field, .. } => Some(*field),
            BillingError::DateOutOfRange(_) | BillingError::Money(_) => None,
        }
    }

    /// True for errors caused by caller input rather than internal limits
    pub fn is_validation(&self) -> bool {
        self.field().is_some()
    }
}
