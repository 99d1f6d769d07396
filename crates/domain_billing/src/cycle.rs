//! Invoice cycle resolution
//!
//! Maps a purchase date to the date each of its installments is due.
//!
//! With a closing day configured, a purchase made before the closing day is
//! billed on the statement closing that same month and due on the payment day
//! of the next month. A purchase on or after the closing day misses that
//! statement and is due two months after the purchase month. Without a
//! closing day, installment `k` is due `k` months after the purchase month.
//!
//! Each later installment moves one month further. The payment day is placed
//! into the target month without clamping, so day 31 in April becomes May 1st.

use core_kernel::{CalendarDate, MonthOfYear, TemporalError};

use crate::error::{BillingError, Field, Violation};
use crate::settings::{DayOfMonth, InvoiceSettings};

/// Resolves the due date of installment `installment_index` (1-based)
///
/// # Errors
///
/// * `InvalidAmount` with `Field::InstallmentIndex` when the index is 0
/// * `DateOutOfRange` when the due date is beyond the supported calendar
///
/// # Example
///
/// ```rust
/// use core_kernel::CalendarDate;
/// use domain_billing::{resolve_due_date, DayOfMonth};
///
/// let purchase = CalendarDate::parse("2024-11-29").unwrap();
/// let due = resolve_due_date(
///     purchase,
///     DayOfMonth::new(5).unwrap(),
///     DayOfMonth::new(29),
///     1,
/// ).unwrap();
/// assert_eq!(due.to_string(), "2025-01-05");
/// ```
pub fn resolve_due_date(
    purchase_date: CalendarDate,
    payment_day: DayOfMonth,
    closing_day: Option<DayOfMonth>,
    installment_index: u32,
) -> Result<CalendarDate, BillingError> {
    if installment_index == 0 {
        return Err(BillingError::amount(
            Field::InstallmentIndex,
            Violation::BelowOne,
            installment_index,
        ));
    }

    let months_ahead = first_due_offset(purchase_date, closing_day) + (installment_index - 1);

    statement_month(purchase_date, months_ahead)?
        .day_with_overflow(payment_day.get())
        .map_err(out_of_range)
}

/// Same as [`resolve_due_date`] with the day configuration taken from `settings`
pub fn resolve_with_settings(
    purchase_date: CalendarDate,
    settings: &InvoiceSettings,
    installment_index: u32,
) -> Result<CalendarDate, BillingError> {
    resolve_due_date(
        purchase_date,
        settings.payment_day,
        settings.closing_day,
        installment_index,
    )
}

/// Months between the purchase month and the first due date
fn first_due_offset(purchase_date: CalendarDate, closing_day: Option<DayOfMonth>) -> u32 {
    match closing_day {
        Some(closing) if purchase_date.day() >= closing.get() => 2,
        _ => 1,
    }
}

fn statement_month(purchase_date: CalendarDate, months_ahead: u32) -> Result<MonthOfYear, BillingError> {
    purchase_date
        .month_of_year()
        .add_months(months_ahead)
        .map_err(out_of_range)
}

fn out_of_range(error: TemporalError) -> BillingError {
    BillingError::DateOutOfRange(error.to_string())
}
