//! Custom Test Assertions
//!
//! Assertion helpers for plans and installment groups that report which
//! invariant broke and on which entry.

use core_kernel::{ExpenseId, Money};
use domain_billing::InstallmentPlan;
use domain_expense::Expense;

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics if the currencies differ or the sum doesn't equal the total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = Money::sum(parts.iter(), total.currency())
        .unwrap_or_else(|e| panic!("Cannot sum parts: {}", e));
    assert_eq!(
        sum, *total,
        "Sum of parts ({}) doesn't equal total ({})",
        sum, total
    );
}

/// Asserts every plan invariant at once
///
/// * one entry per installment, numbered 1..=N
/// * amounts add up to the total, the first entry is the largest and the
///   rest are equal
/// * due dates strictly increase
pub fn assert_plan_invariants(plan: &InstallmentPlan) {
    let entries = plan.entries();
    assert_eq!(
        entries.len(),
        plan.installment_count() as usize,
        "Plan has {} entries for {} installments",
        entries.len(),
        plan.installment_count()
    );

    for (index, entry) in entries.iter().enumerate() {
        assert_eq!(
            entry.sequence_number as usize,
            index + 1,
            "Entry {} carries sequence number {}",
            index + 1,
            entry.sequence_number
        );
    }

    let amounts: Vec<Money> = entries.iter().map(|e| e.amount).collect();
    assert_money_sum_equals(&amounts, &plan.total());

    if let Some((first, rest)) = amounts.split_first() {
        if let Some(share) = rest.first() {
            assert!(
                first.amount() >= share.amount(),
                "First installment {} is smaller than {}",
                first,
                share
            );
            assert!(
                rest.iter().all(|a| a == share),
                "Installments after the first differ: {:?}",
                rest
            );
        }
    }

    for pair in entries.windows(2) {
        assert!(
            pair[0].due_date < pair[1].due_date,
            "Due date of installment {} ({}) is not before installment {} ({})",
            pair[0].sequence_number,
            pair[0].due_date,
            pair[1].sequence_number,
            pair[1].due_date
        );
    }
}

/// Asserts that `records` form one installment group
///
/// Exactly one parent, every child points at it, and all members agree on
/// the total count and the purchase date.
pub fn assert_installment_group(records: &[Expense]) -> ExpenseId {
    let parents: Vec<&Expense> = records.iter().filter(|e| e.parent_expense_id.is_none()).collect();
    assert_eq!(parents.len(), 1, "Expected one parent, found {}", parents.len());
    let parent = parents[0];

    let total = parent.installments_total.expect("parent has installments_total");
    assert_eq!(records.len(), total as usize, "Group size differs from installments_total");

    for record in records.iter().filter(|e| e.id != parent.id) {
        assert_eq!(
            record.parent_expense_id,
            Some(parent.id),
            "Installment {:?} does not reference the parent",
            record.installment_number
        );
        assert_eq!(record.installments_total, Some(total));
        assert_eq!(record.purchase_date, parent.purchase_date);
    }

    parent.id
}
