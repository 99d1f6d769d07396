//! Income DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::CalendarDate;
use domain_expense::Income;

/// Query string of `GET /incomes`, filtered like the expense listing
pub type ListIncomesParams = crate::dto::expense::ListExpensesParams;

#[derive(Debug, Serialize, Deserialize)]
pub struct IncomeResponse {
    pub id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: CalendarDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Income> for IncomeResponse {
    fn from(income: Income) -> Self {
        Self {
            id: income.id.into(),
            title: income.title,
            amount: income.amount,
            category: income.category,
            date: income.date,
            description: income.description,
            created_at: income.created_at,
            updated_at: income.updated_at,
        }
    }
}
