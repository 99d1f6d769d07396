//! Monthly summary and overview DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Currency;
use domain_expense::{MonthlyOverview, MonthlyTotal};

/// Query string of the `/summary` routes; missing parts default to today
#[derive(Debug, Default, Deserialize)]
pub struct MonthlySummaryParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthlySummaryResponse {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
    pub currency: Currency,
}

impl From<MonthlyTotal> for MonthlySummaryResponse {
    fn from(total: MonthlyTotal) -> Self {
        Self {
            year: total.year,
            month: total.month,
            total: total.total.amount(),
            currency: total.total.currency(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopExpenseResponse {
    pub title: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopCategoryResponse {
    pub category: String,
    pub total: Decimal,
}

/// Dashboard figures for one month
#[derive(Debug, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub year: i32,
    pub month: u32,
    pub currency: Currency,
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub monthly_balance: Decimal,
    pub current_balance: Decimal,
    pub top_expense: Option<TopExpenseResponse>,
    pub top_category: Option<TopCategoryResponse>,
}

impl From<MonthlyOverview> for OverviewResponse {
    fn from(overview: MonthlyOverview) -> Self {
        Self {
            year: overview.year,
            month: overview.month,
            currency: overview.income_total.currency(),
            income_total: overview.income_total.amount(),
            expense_total: overview.expense_total.amount(),
            monthly_balance: overview.monthly_balance.amount(),
            current_balance: overview.current_balance.amount(),
            top_expense: overview.top_expense.map(|top| TopExpenseResponse {
                title: top.title,
                amount: top.amount.amount(),
            }),
            top_category: overview.top_category.map(|top| TopCategoryResponse {
                category: top.category,
                total: top.total.amount(),
            }),
        }
    }
}
