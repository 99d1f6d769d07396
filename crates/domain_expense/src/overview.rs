//! Monthly dashboard figures
//!
//! Everything here is computed from values the service has already loaded;
//! nothing reads storage or the clock.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{Currency, Money, MonthOfYear};

use crate::expense::Expense;

/// The largest single expense of the month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopExpense {
    pub title: String,
    pub amount: Money,
}

/// The category with the highest month total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyOverview {
    pub year: i32,
    pub month: u32,
    pub income_total: Money,
    pub expense_total: Money,
    /// Month incomes minus month expenses
    pub monthly_balance: Money,
    /// All incomes minus all expenses ever recorded
    pub current_balance: Money,
    pub top_expense: Option<TopExpense>,
    pub top_category: Option<CategoryTotal>,
}

/// Lifetime sums the current balance is derived from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifetimeTotals {
    pub incomes: Decimal,
    pub expenses: Decimal,
}

impl MonthlyOverview {
    /// Builds the overview of `month`
    ///
    /// `expenses` must be the month's expenses, newest first; on equal
    /// amounts the first one listed is the top expense. Category ties go to
    /// the name that sorts first.
    pub fn compute(
        month: MonthOfYear,
        income_total: Decimal,
        expenses: &[Expense],
        lifetime: LifetimeTotals,
        currency: Currency,
    ) -> Self {
        let expense_total: Decimal = expenses.iter().map(|e| e.amount).sum();

        let top_expense = expenses
            .iter()
            .fold(None::<&Expense>, |top, e| match top {
                Some(current) if current.amount >= e.amount => Some(current),
                _ => Some(e),
            })
            .map(|e| TopExpense {
                title: e.title.clone(),
                amount: e.money(currency),
            });

        let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
        for expense in expenses {
            *by_category.entry(expense.category.as_str()).or_default() += expense.amount;
        }
        let top_category = by_category
            .into_iter()
            .fold(None::<(&str, Decimal)>, |top, (name, total)| match top {
                Some(current) if current.1 >= total => Some(current),
                _ => Some((name, total)),
            })
            .map(|(name, total)| CategoryTotal {
                category: name.to_string(),
                total: Money::new(total, currency),
            });

        Self {
            year: month.year(),
            month: month.month(),
            income_total: Money::new(income_total, currency),
            expense_total: Money::new(expense_total, currency),
            monthly_balance: Money::new(income_total - expense_total, currency),
            current_balance: Money::new(lifetime.incomes - lifetime.expenses, currency),
            top_expense,
            top_category,
        }
    }
}
