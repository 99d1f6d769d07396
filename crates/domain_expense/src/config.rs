//! Expense domain configuration

use serde::{Deserialize, Serialize};

use core_kernel::Currency;
use domain_billing::{DayOfMonth, DEFAULT_PAYMENT_DAY};

use crate::error::ExpenseError;

/// Largest installment count the expense form offers
pub const DEFAULT_MAX_INSTALLMENTS: u32 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseConfig {
    /// Currency every stored amount is expressed in
    #[serde(default)]
    pub currency: Currency,
    /// Payment day for users whose profile has none
    #[serde(default = "default_payment_day")]
    pub default_payment_day: u32,
    #[serde(default = "default_max_installments")]
    pub max_installments: u32,
}

fn default_payment_day() -> u32 {
    DEFAULT_PAYMENT_DAY
}

fn default_max_installments() -> u32 {
    DEFAULT_MAX_INSTALLMENTS
}

impl Default for ExpenseConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            default_payment_day: default_payment_day(),
            max_installments: default_max_installments(),
        }
    }
}

impl ExpenseConfig {
    pub fn validate(&self) -> Result<(), ExpenseError> {
        if DayOfMonth::new(self.default_payment_day).is_none() {
            return Err(ExpenseError::Configuration(format!(
                "default_payment_day must be within 1-31, got {}",
                self.default_payment_day
            )));
        }
        if self.max_installments < 1 {
            return Err(ExpenseError::Configuration(
                "max_installments must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
