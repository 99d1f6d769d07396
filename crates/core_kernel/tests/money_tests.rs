//! Unit tests for the Money module
//!
//! Tests cover creation, parsing, rounding, checked arithmetic and sums.

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_two_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::BRL);
        assert_eq!(m.amount(), dec!(100.12));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(Money::new(dec!(0.125), Currency::BRL).amount(), dec!(0.13));
        assert_eq!(Money::new(dec!(0.135), Currency::BRL).amount(), dec!(0.14));
    }

    #[test]
    fn test_from_minor_converts_centavos() {
        let m = Money::from_minor(1, Currency::BRL);
        assert_eq!(m.amount(), dec!(0.01));
    }

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let m = Money::zero(Currency::USD);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_plain_decimal() {
        let m = Money::parse("1234.56", Currency::BRL).unwrap();
        assert_eq!(m.amount(), dec!(1234.56));
    }

    #[test]
    fn test_parse_trims_whitespace_and_rounds() {
        let m = Money::parse("  10.005 ", Currency::BRL).unwrap();
        assert_eq!(m.amount(), dec!(10.01));
    }

    #[test]
    fn test_parse_negative_is_allowed_at_this_level() {
        let m = Money::parse("-5", Currency::BRL).unwrap();
        assert!(m.is_negative());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(
            Money::parse("12,50", Currency::BRL),
            Err(MoneyError::InvalidAmount("12,50".to_string()))
        );
    }

    #[test]
    fn test_currencies_key_an_ordered_map() {
        use std::collections::BTreeMap;

        let mut totals = BTreeMap::new();
        for money in [
            Money::new(dec!(5.00), Currency::EUR),
            Money::new(dec!(7.00), Currency::BRL),
            Money::new(dec!(1.00), Currency::USD),
        ] {
            *totals.entry(money.currency()).or_insert(Decimal::ZERO) += money.amount();
        }
        let order: Vec<Currency> = totals.into_keys().collect();
        assert_eq!(order, [Currency::BRL, Currency::USD, Currency::EUR]);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("brl".parse::<Currency>().unwrap(), Currency::BRL);
        assert!(matches!("XYZ".parse::<Currency>(), Err(MoneyError::UnknownCurrency(_))));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_and_sub() {
        let a = Money::new(dec!(100.00), Currency::BRL);
        let b = Money::new(dec!(33.33), Currency::BRL);

        assert_eq!(a.checked_sub(&b).unwrap().amount(), dec!(66.67));
        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(133.33));
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total = Money::sum(Vec::<Money>::new().iter(), Currency::BRL).unwrap();
        assert!(total.is_zero());
    }

    #[test]
    fn test_sum_rejects_mixed_currencies() {
        let parts = [
            Money::new(dec!(1), Currency::BRL),
            Money::new(dec!(1), Currency::USD),
        ];
        assert!(matches!(
            Money::sum(&parts, Currency::BRL),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn test_times_and_divide_floor() {
        let m = Money::new(dec!(0.01), Currency::BRL);
        assert_eq!(m.divide_floor(3).unwrap().amount(), Decimal::ZERO);
        assert_eq!(m.times(7).amount(), dec!(0.07));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_uses_symbol_and_two_places() {
        let m = Money::new(dec!(5), Currency::BRL);
        assert_eq!(m.to_string(), "R$ 5.00");
    }

    #[test]
    fn test_serde_keeps_currency_code() {
        let m = Money::new(dec!(12.30), Currency::EUR);
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["currency"], "EUR");
    }
}
