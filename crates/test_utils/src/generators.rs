//! Property-Based Test Generators
//!
//! Proptest strategies for purchase dates, statement days, totals and
//! installment counts.

use proptest::prelude::*;

use core_kernel::{CalendarDate, Currency, Money};
use domain_billing::{DayOfMonth, InvoiceSettings};

/// Strategy for purchase dates between 2000 and 2099
///
/// Days go up to 28 so every generated triple is a real date.
pub fn purchase_date_strategy() -> impl Strategy<Value = CalendarDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| CalendarDate::new(y, m, d).expect("day 28 exists in every month"))
}

/// Strategy for any real calendar date between 2000 and 2099, month ends included
pub fn any_date_strategy() -> impl Strategy<Value = CalendarDate> {
    (2000i32..2100, 1u32..=12, 1u32..=31).prop_filter_map("not a real date", |(y, m, d)| {
        CalendarDate::new(y, m, d).ok()
    })
}

/// Strategy for a valid day of the month
pub fn day_of_month_strategy() -> impl Strategy<Value = DayOfMonth> {
    (1u32..=31).prop_map(|d| DayOfMonth::new(d).expect("1..=31 is a valid day"))
}

/// Strategy for invoice settings with and without a closing day
pub fn invoice_settings_strategy() -> impl Strategy<Value = InvoiceSettings> {
    (day_of_month_strategy(), proptest::option::of(day_of_month_strategy()))
        .prop_map(|(payment_day, closing_day)| InvoiceSettings::new(payment_day, closing_day))
}

/// Strategy for positive purchase totals, R$ 0.01 to R$ 1,000,000.00
pub fn positive_total_strategy() -> impl Strategy<Value = Money> {
    (1i64..=100_000_000i64).prop_map(|cents| Money::from_minor(cents, Currency::BRL))
}

/// Strategy for installment counts
pub fn installment_count_strategy() -> impl Strategy<Value = u32> {
    1u32..=48
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn totals_are_positive(total in positive_total_strategy()) {
            prop_assert!(total.is_positive());
        }

        #[test]
        fn closing_days_are_in_range(settings in invoice_settings_strategy()) {
            prop_assert!((1..=31).contains(&settings.payment_day.get()));
            if let Some(closing) = settings.closing_day {
                prop_assert!((1..=31).contains(&closing.get()));
            }
        }
    }
}
