//! Per-user invoice configuration
//!
//! Profiles store the payment and closing days as loosely typed, nullable
//! integers. This module is the one place they are range-checked; past this
//! boundary the billing core works with `DayOfMonth` and an explicit
//! `Option` for the closing day.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BillingError, Field};

/// Payment day used when the profile has none configured
pub const DEFAULT_PAYMENT_DAY: u32 = 5;

/// A day-of-month number in 1..=31
///
/// The value is not checked against any particular month. Day 31 applied to
/// a 30-day month carries into the next month when a due date is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    pub fn new(day: u32) -> Option<Self> {
        if (1..=31).contains(&day) {
            Some(Self(day as u8))
        } else {
            None
        }
    }

    pub fn get(&self) -> u32 {
        u32::from(self.0)
    }

    /// Validates a raw profile value for `field`
    pub fn parse(value: i64, field: Field) -> Result<Self, BillingError> {
        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(BillingError::InvalidSetting { field, value })
    }
}

impl TryFrom<u32> for DayOfMonth {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("{} is not a day of the month (1-31)", value))
    }
}

impl From<DayOfMonth> for u32 {
    fn from(day: DayOfMonth) -> Self {
        day.get()
    }
}

impl fmt::Display for DayOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Statement configuration for a user's credit card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSettings {
    /// Day of month an invoice is due
    pub payment_day: DayOfMonth,
    /// Day of month the statement closes; `None` selects the simple rule
    /// where every installment lands one month after the previous one
    pub closing_day: Option<DayOfMonth>,
}

impl InvoiceSettings {
    pub fn new(payment_day: DayOfMonth, closing_day: Option<DayOfMonth>) -> Self {
        Self {
            payment_day,
            closing_day,
        }
    }

    /// Builds settings from nullable profile columns
    ///
    /// A missing payment day falls back to [`DEFAULT_PAYMENT_DAY`]; values
    /// outside 1..=31 are rejected rather than clamped.
    pub fn from_profile(
        payment_day: Option<i64>,
        closing_day: Option<i64>,
    ) -> Result<Self, BillingError> {
        let payment_day = match payment_day {
            Some(value) => DayOfMonth::parse(value, Field::PaymentDay)?,
            None => default_payment_day(),
        };
        let closing_day = closing_day
            .map(|value| DayOfMonth::parse(value, Field::ClosingDay))
            .transpose()?;

        Ok(Self {
            payment_day,
            closing_day,
        })
    }

    pub fn with_closing_day(mut self, closing_day: DayOfMonth) -> Self {
        self.closing_day = Some(closing_day);
        self
    }
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            payment_day: default_payment_day(),
            closing_day: None,
        }
    }
}

fn default_payment_day() -> DayOfMonth {
    DayOfMonth(DEFAULT_PAYMENT_DAY as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_month_bounds() {
        assert!(DayOfMonth::new(0).is_none());
        assert!(DayOfMonth::new(32).is_none());
        assert_eq!(DayOfMonth::new(31).map(|d| d.get()), Some(31));
    }

    #[test]
    fn test_from_profile_defaults() {
        let settings = InvoiceSettings::from_profile(None, None).unwrap();
        assert_eq!(settings.payment_day.get(), 5);
        assert_eq!(settings.closing_day, None);
        assert_eq!(settings, InvoiceSettings::default());
    }

    #[test]
    fn test_from_profile_rejects_out_of_range() {
        assert_eq!(
            InvoiceSettings::from_profile(Some(0), None),
            Err(BillingError::InvalidSetting { field: Field::PaymentDay, value: 0 })
        );
        assert_eq!(
            InvoiceSettings::from_profile(Some(10), Some(45)),
            Err(BillingError::InvalidSetting { field: Field::ClosingDay, value: 45 })
        );
        assert!(InvoiceSettings::from_profile(Some(-3), None).is_err());
    }

    #[test]
    fn test_serde_validates_days() {
        let settings: InvoiceSettings =
            serde_json::from_str(r#"{"payment_day": 10, "closing_day": 3}"#).unwrap();
        assert_eq!(settings.closing_day.map(|d| d.get()), Some(3));

        let bad = serde_json::from_str::<InvoiceSettings>(r#"{"payment_day": 40, "closing_day": null}"#);
        assert!(bad.is_err());
    }
}
