//! Integration tests for domain_billing

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{CalendarDate, Currency, Money};

use domain_billing::{
    build_plan, resolve_due_date, split_amount, BillingError, DayOfMonth, Field,
    InvoiceSettings, PlanRequest, Violation, MAX_INSTALLMENTS, MAX_TOTAL_AMOUNT,
};
use test_utils::{
    any_date_strategy, assert_money_sum_equals, assert_plan_invariants,
    installment_count_strategy, invoice_settings_strategy, positive_total_strategy,
    purchase_date_strategy, DateFixtures, MoneyFixtures, SettingsFixtures,
};

fn brl(amount: Decimal) -> Money {
    Money::new(amount, Currency::BRL)
}

fn date(s: &str) -> CalendarDate {
    CalendarDate::parse(s).unwrap()
}

fn day(d: u32) -> DayOfMonth {
    DayOfMonth::new(d).unwrap()
}

// ============================================================================
// Split Tests
// ============================================================================

mod split_tests {
    use super::*;

    #[test]
    fn test_hundred_over_three() {
        let parts = split_amount(brl(dec!(100.00)), 3).unwrap();
        let amounts: Vec<Decimal> = parts.iter().map(|m| m.amount()).collect();
        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    }

    #[test]
    fn test_ten_over_one() {
        let parts = split_amount(brl(dec!(10.00)), 1).unwrap();
        assert_eq!(parts, vec![brl(dec!(10.00))]);
    }

    #[test]
    fn test_one_cent_over_three() {
        let parts = split_amount(brl(dec!(0.01)), 3).unwrap();
        assert_eq!(parts[0], brl(dec!(0.01)));
        assert!(parts[1].is_zero());
        assert!(parts[2].is_zero());
    }

    #[test]
    fn test_negative_total() {
        let err = split_amount(brl(dec!(-5)), 3).unwrap_err();
        assert_eq!(err.field(), Some(Field::TotalAmount));
        assert!(err.is_validation());
    }

    #[test]
    fn test_zero_count() {
        let err = split_amount(brl(dec!(100)), 0).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidAmount { field: Field::InstallmentCount, violation: Violation::BelowOne, .. }
        ));
    }

    #[test]
    fn test_huge_count_is_rejected_without_allocating() {
        let err = split_amount(brl(dec!(100)), u32::MAX).unwrap_err();
        assert_eq!(err.field(), Some(Field::InstallmentCount));
        assert!(matches!(err, BillingError::InvalidAmount { violation: Violation::TooLarge, .. }));
        assert_eq!(split_amount(brl(dec!(100)), MAX_INSTALLMENTS).unwrap().len(), 360);
    }

    #[test]
    fn test_total_beyond_storable_precision() {
        let err = split_amount(brl(MAX_TOTAL_AMOUNT + dec!(0.01)), 1).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidAmount { field: Field::TotalAmount, violation: Violation::TooLarge, .. }
        ));
    }
}

// ============================================================================
// Cycle Tests
// ============================================================================

mod cycle_tests {
    use super::*;

    #[test]
    fn test_fallback_rule() {
        let purchase = date("2024-01-15");
        assert_eq!(resolve_due_date(purchase, day(5), None, 1).unwrap(), date("2024-02-05"));
        assert_eq!(resolve_due_date(purchase, day(5), None, 2).unwrap(), date("2024-03-05"));
    }

    #[test]
    fn test_closing_rule_before_closing() {
        let due = resolve_due_date(date("2024-11-02"), day(5), Some(day(29)), 1).unwrap();
        assert_eq!(due, date("2024-12-05"));
    }

    #[test]
    fn test_closing_rule_on_closing() {
        let due = resolve_due_date(date("2024-11-29"), day(5), Some(day(29)), 1).unwrap();
        assert_eq!(due, date("2025-01-05"));
    }

    #[test]
    fn test_overflow_carry_february() {
        // 2023-02 has 28 days, day 30 lands on March 2nd
        let due = resolve_due_date(date("2023-01-10"), day(30), None, 1).unwrap();
        assert_eq!(due, date("2023-03-02"));
    }

    #[test]
    fn test_overflow_carry_leap_february() {
        let due = resolve_due_date(date("2024-01-10"), day(30), None, 1).unwrap();
        assert_eq!(due, date("2024-03-01"));
    }

    #[test]
    fn test_year_rollover() {
        let due = resolve_due_date(date("2024-12-20"), day(10), Some(day(15)), 1).unwrap();
        assert_eq!(due, date("2025-02-10"));
    }

    #[test]
    fn test_out_of_range() {
        let purchase = CalendarDate::from(chrono::NaiveDate::MAX);
        let err = resolve_due_date(purchase, day(5), None, 1).unwrap_err();
        assert!(matches!(err, BillingError::DateOutOfRange(_)));
        assert!(!err.is_validation());
    }
}

// ============================================================================
// Plan Tests
// ============================================================================

mod plan_tests {
    use super::*;

    #[test]
    fn test_single_installment_degeneracy() {
        let settings = InvoiceSettings::new(day(10), Some(day(20)));
        let purchase = date("2024-05-25");
        let plan = build_plan(purchase, brl(dec!(249.90)), 1, &settings).unwrap();

        assert_eq!(plan.entries().len(), 1);
        let entry = &plan.entries()[0];
        assert_eq!(entry.amount, plan.total());
        assert_eq!(
            entry.due_date,
            resolve_due_date(purchase, day(10), Some(day(20)), 1).unwrap()
        );
    }

    #[test]
    fn test_invalid_purchase_date() {
        let err = PlanRequest::new("2024-13-40", "100.00", 3)
            .build(&InvoiceSettings::default(), Currency::BRL)
            .unwrap_err();
        assert_eq!(err.field(), Some(Field::PurchaseDate));
        assert!(matches!(err, BillingError::InvalidDate { .. }));
    }

    #[test]
    fn test_non_numeric_date_components() {
        let err = PlanRequest::new("2024-ab-01", "100.00", 3)
            .build(&InvoiceSettings::default(), Currency::BRL)
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidDate { .. }));
    }

    #[test]
    fn test_negative_total_request() {
        let err = PlanRequest::new("2024-01-15", "-5", 3)
            .build(&InvoiceSettings::default(), Currency::BRL)
            .unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidAmount { field: Field::TotalAmount, violation: Violation::NotPositive, .. }
        ));
    }

    #[test]
    fn test_records_for_persistence() {
        let plan = build_plan(date("2024-03-01"), brl(dec!(1000.00)), 12, &InvoiceSettings::default())
            .unwrap();
        let records = plan.records(42_u64);

        assert_eq!(records.len(), 12);
        assert_eq!(records.iter().filter(|r| r.is_parent()).count(), 1);
        assert!(records[1..].iter().all(|r| r.parent_ref == Some(42)));
        assert_eq!(records[11].sequence_number, 12);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_split_sums_to_total(total in positive_total_strategy(), count in 1u32..=48) {
        let parts = split_amount(total, count).unwrap();
        prop_assert_eq!(parts.len(), count as usize);
        prop_assert_eq!(Money::sum(parts.iter(), Currency::BRL).unwrap(), total);
    }

    #[test]
    fn prop_first_installment_is_largest(total in positive_total_strategy(), count in 1u32..=48) {
        let parts = split_amount(total, count).unwrap();
        prop_assert!(parts.iter().all(|p| p.amount() <= parts[0].amount()));
        prop_assert!(parts[1..].windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn prop_due_dates_strictly_increase(
        purchase in purchase_date_strategy(),
        total in positive_total_strategy(),
        count in 1u32..=24,
        settings in invoice_settings_strategy(),
    ) {
        let plan = build_plan(purchase, total, count, &settings).unwrap();
        for pair in plan.entries().windows(2) {
            prop_assert!(pair[0].due_date < pair[1].due_date);
            // one month apart: the gap is the length of the earlier target month
            let gap = pair[1].due_date.as_naive() - pair[0].due_date.as_naive();
            prop_assert!((28..=31).contains(&gap.num_days()));
        }
    }

    #[test]
    fn prop_due_date_in_target_month(
        purchase in purchase_date_strategy(),
        count in 1u32..=24,
        settings in invoice_settings_strategy(),
    ) {
        // the due date sits in the target month, or the day after it when
        // the payment day overflowed a short month
        let plan = build_plan(purchase, Money::from_minor(10_000, Currency::BRL), count, &settings).unwrap();
        for entry in plan.entries() {
            let day_of_month = entry.due_date.day();
            let payment_day = settings.payment_day.get();
            prop_assert!(day_of_month == payment_day || day_of_month <= payment_day.saturating_sub(28));
        }
    }

    #[test]
    fn prop_plans_hold_every_invariant(
        purchase in any_date_strategy(),
        total in positive_total_strategy(),
        count in installment_count_strategy(),
        settings in invoice_settings_strategy(),
    ) {
        let plan = build_plan(purchase, total, count, &settings).unwrap();
        assert_plan_invariants(&plan);
    }
}

// ============================================================================
// Fixture Cases
// ============================================================================

mod fixture_cases {
    use super::*;

    fn due_dates(purchase: CalendarDate, settings: &InvoiceSettings, count: u32) -> Vec<String> {
        build_plan(purchase, MoneyFixtures::brl_100(), count, settings)
            .unwrap()
            .entries()
            .iter()
            .map(|e| e.due_date.to_string())
            .collect()
    }

    #[test]
    fn test_purchase_before_closing_day() {
        let dates = due_dates(DateFixtures::november_2nd(), &SettingsFixtures::closing_29(), 3);
        assert_eq!(dates, ["2024-12-05", "2025-01-05", "2025-02-05"]);
    }

    #[test]
    fn test_purchase_on_closing_day_skips_a_statement() {
        let dates = due_dates(DateFixtures::november_29th(), &SettingsFixtures::closing_29(), 2);
        assert_eq!(dates, ["2025-01-05", "2025-02-05"]);
    }

    #[test]
    fn test_payment_31_carries_into_next_month() {
        let dates = due_dates(DateFixtures::end_of_january(), &SettingsFixtures::payment_31(), 3);
        assert_eq!(dates, ["2024-03-02", "2024-03-31", "2024-05-01"]);
    }

    #[test]
    fn test_payment_30_in_leap_february() {
        let dates = due_dates(DateFixtures::leap_january(), &SettingsFixtures::payment_30(), 1);
        assert_eq!(dates, ["2024-03-01"]);
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let dates = due_dates(DateFixtures::december(), &SettingsFixtures::default_settings(), 2);
        assert_eq!(dates, ["2025-01-05", "2025-02-05"]);
    }

    #[test]
    fn test_uneven_total_splits_exactly() {
        let total = MoneyFixtures::brl_uneven();
        let parts = split_amount(total, 3).unwrap();
        assert_eq!(parts[0].amount(), dec!(333.35));
        assert_eq!(parts[1].amount(), dec!(333.33));
        assert_money_sum_equals(&parts, &total);
    }

    #[test]
    fn test_single_cent_lands_on_first_installment() {
        let total = MoneyFixtures::brl_cent();
        let parts = split_amount(total, 3).unwrap();
        assert_eq!(parts[0], total);
        assert!(parts[1..].iter().all(|p| p.is_zero()));
        assert_money_sum_equals(&parts, &total);
    }

    #[test]
    fn test_zero_total_is_rejected() {
        let err = split_amount(MoneyFixtures::brl_zero(), 2).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidAmount { violation: Violation::NotPositive, .. }
        ));
    }
}
