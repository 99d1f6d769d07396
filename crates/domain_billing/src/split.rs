//! Installment amount splitting
//!
//! The share of each installment is the total divided by the count, rounded
//! down to cents. What is left over after `share * count` goes entirely to the
//! first installment, so the parts always add back to the exact total.

use core_kernel::Money;
use rust_decimal::Decimal;

use crate::error::{BillingError, Field, Violation};

/// Most installments a single purchase can be split into
pub const MAX_INSTALLMENTS: u32 = 360;

/// Largest total the ledger can store, 9,999,999,999.99
pub const MAX_TOTAL_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Splits `total` into `count` installment amounts
///
/// Returns `[share + remainder, share, share, ...]`.
///
/// # Errors
///
/// `InvalidAmount` when `count` is 0 or above [`MAX_INSTALLMENTS`], or when
/// `total` is not positive or above [`MAX_TOTAL_AMOUNT`].
///
/// # Example
///
/// ```rust
/// use core_kernel::{Currency, Money};
/// use domain_billing::split_amount;
/// use rust_decimal::Decimal;
///
/// let total = Money::new(Decimal::new(10000, 2), Currency::BRL);
/// let parts: Vec<_> = split_amount(total, 3)
///     .unwrap()
///     .iter()
///     .map(|m| m.amount().to_string())
///     .collect();
/// assert_eq!(parts, ["33.34", "33.33", "33.33"]);
/// ```
pub fn split_amount(total: Money, count: u32) -> Result<Vec<Money>, BillingError> {
    if count == 0 {
        return Err(BillingError::amount(Field::InstallmentCount, Violation::BelowOne, count));
    }
    if count > MAX_INSTALLMENTS {
        return Err(BillingError::amount(Field::InstallmentCount, Violation::TooLarge, count));
    }
    if !total.is_positive() {
        return Err(BillingError::amount(
            Field::TotalAmount,
            Violation::NotPositive,
            total.amount(),
        ));
    }
    if total.amount() > MAX_TOTAL_AMOUNT {
        return Err(BillingError::amount(Field::TotalAmount, Violation::TooLarge, total.amount()));
    }

    let share = total.divide_floor(count)?;
    let remainder = total.checked_sub(&share.times(count))?;
    let first = share.checked_add(&remainder)?;

    let mut parts = Vec::with_capacity(count as usize);
    parts.push(first);
    parts.extend(std::iter::repeat(share).take(count as usize - 1));
    Ok(parts)
}
