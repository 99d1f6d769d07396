//! Pre-built Test Fixtures
//!
//! Ready-to-use values for the expense and installment tests. Fixtures are
//! fixed so assertions can name exact dates and amounts.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{CalendarDate, Currency, Money, UserId};
use domain_billing::{DayOfMonth, InvoiceSettings};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn brl_100() -> Money {
        Money::new(dec!(100.00), Currency::BRL)
    }

    /// A typical appliance purchase split over many installments
    pub fn brl_3000() -> Money {
        Money::new(dec!(3000.00), Currency::BRL)
    }

    /// Does not divide evenly by 3, 6 or 7
    pub fn brl_uneven() -> Money {
        Money::new(dec!(1000.01), Currency::BRL)
    }

    /// The smallest positive amount
    pub fn brl_cent() -> Money {
        Money::new(dec!(0.01), Currency::BRL)
    }

    pub fn brl_zero() -> Money {
        Money::zero(Currency::BRL)
    }
}

fn date(year: i32, month: u32, day: u32) -> CalendarDate {
    CalendarDate::new(year, month, day).expect("fixture date is valid")
}

/// Fixture for purchase dates that exercise the cycle edge cases
pub struct DateFixtures;

impl DateFixtures {
    /// Mid-month purchase with no closing-day effect
    pub fn mid_january() -> CalendarDate {
        date(2024, 1, 15)
    }

    /// Two days after a 29th closing day would fall
    pub fn november_2nd() -> CalendarDate {
        date(2024, 11, 2)
    }

    /// Exactly on a 29th closing day
    pub fn november_29th() -> CalendarDate {
        date(2024, 11, 29)
    }

    /// Last day of January, for February overflow
    pub fn end_of_january() -> CalendarDate {
        date(2024, 1, 31)
    }

    /// Purchase whose first installment lands in a leap February
    pub fn leap_january() -> CalendarDate {
        date(2024, 1, 10)
    }

    /// Purchase in December, for year rollover
    pub fn december() -> CalendarDate {
        date(2024, 12, 20)
    }

    /// A fixed instant for record timestamps
    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
            .single()
            .expect("fixture timestamp is valid")
    }
}

/// Fixture for invoice settings
pub struct SettingsFixtures;

impl SettingsFixtures {
    fn day(value: u32) -> DayOfMonth {
        DayOfMonth::new(value).expect("fixture day is valid")
    }

    /// Payment on the 5th, no closing day
    pub fn default_settings() -> InvoiceSettings {
        InvoiceSettings::default()
    }

    /// Payment on the 5th, statement closes on the 29th
    pub fn closing_29() -> InvoiceSettings {
        InvoiceSettings::new(Self::day(5), Some(Self::day(29)))
    }

    /// Payment on the 31st, which overflows in short months
    pub fn payment_31() -> InvoiceSettings {
        InvoiceSettings::new(Self::day(31), None)
    }

    /// Payment on the 30th, which overflows only in February
    pub fn payment_30() -> InvoiceSettings {
        InvoiceSettings::new(Self::day(30), None)
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// A deterministic user id
    pub fn user_id() -> UserId {
        UserId::from(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001))
    }

    /// A second user, for ownership checks
    pub fn other_user_id() -> UserId {
        UserId::from(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0002))
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    pub fn email() -> &'static str {
        "ana.souza@example.com"
    }

    pub fn full_name() -> &'static str {
        "Ana Souza"
    }

    pub fn category() -> &'static str {
        "electronics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_users_differ() {
        assert_ne!(IdFixtures::user_id(), IdFixtures::other_user_id());
    }

    #[test]
    fn test_closing_fixture() {
        let settings = SettingsFixtures::closing_29();
        assert_eq!(settings.payment_day.get(), 5);
        assert_eq!(settings.closing_day.map(|d| d.get()), Some(29));
    }
}
