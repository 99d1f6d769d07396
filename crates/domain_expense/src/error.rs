//! Expense domain errors

use thiserror::Error;
use validator::ValidationErrors;

use core_kernel::{ExpenseId, PortError};
use domain_billing::BillingError;

/// Errors that can occur in the expense domain
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// The installment core rejected the input
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Form data failed validation
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Installment records are immutable once created
    #[error("Expense {0} is part of an installment group and cannot be edited; delete and recreate it")]
    InstallmentLocked(ExpenseId),

    /// More installments than the configuration allows
    #[error("{requested} installments requested, at most {max} allowed")]
    TooManyInstallments { requested: u32, max: u32 },

    /// No record with that id for this user
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The storage adapter failed
    #[error("Storage error: {0}")]
    Port(#[from] PortError),

    /// Invalid domain configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ExpenseError {
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        ExpenseError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        ExpenseError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// The input field this error concerns, if any
    pub fn field(&self) -> Option<String> {
        match self {
            ExpenseError::Billing(e) => e.field().map(|f| f.to_string()),
            ExpenseError::Validation { field, .. } => field.clone(),
            ExpenseError::TooManyInstallments { .. } => Some("installments".to_string()),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ExpenseError {
    fn from(errors: ValidationErrors) -> Self {
        // several fields may fail at once; report the first in name order
        let field = errors.field_errors().keys().map(|k| k.to_string()).min();
        ExpenseError::Validation {
            message: errors.to_string(),
            field,
        }
    }
}

/// Ports report a missing row as `PortError::NotFound`; services surface it
/// as the domain's own not-found error
pub(crate) fn map_not_found<I: std::fmt::Display>(
    entity: &'static str,
    id: I,
) -> impl FnOnce(PortError) -> ExpenseError {
    move |e| {
        if e.is_not_found() {
            ExpenseError::not_found(entity, id)
        } else {
            ExpenseError::Port(e)
        }
    }
}
