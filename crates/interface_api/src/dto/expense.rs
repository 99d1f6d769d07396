//! Expense DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{CalendarDate, DateRange, MonthOfYear};
use domain_expense::{Expense, ExpenseQuery, PaymentMethod};

use crate::error::ApiError;

/// Query string of `GET /expenses`
///
/// Either `year` and `month`, or `from` and `to` (inclusive), narrow the
/// listing to a period.
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesParams {
    pub category: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub from: Option<String>,
    pub to: Option<String>,
}

fn parse_date(value: &str, field: &str) -> Result<CalendarDate, ApiError> {
    CalendarDate::parse(value).map_err(|e| ApiError::validation(e.to_string(), field))
}

impl ListExpensesParams {
    pub fn into_query(self) -> Result<ExpenseQuery, ApiError> {
        let query = match (self.year, self.month, self.from.as_deref(), self.to.as_deref()) {
            (None, None, None, None) => ExpenseQuery::all(),
            (Some(year), Some(month), None, None) => {
                let period = MonthOfYear::new(year, month)
                    .map_err(|e| ApiError::validation(e.to_string(), "month"))?;
                ExpenseQuery::in_month(period)
            }
            (None, None, Some(from), Some(to)) => {
                let range = DateRange::new(parse_date(from, "from")?, parse_date(to, "to")?)
                    .map_err(|e| ApiError::validation(e.to_string(), "to"))?;
                ExpenseQuery::between(range)
            }
            _ => {
                return Err(ApiError::BadRequest(
                    "use either year and month, or from and to".to_string(),
                ))
            }
        };

        Ok(match self.category {
            Some(category) if !category.trim().is_empty() => query.with_category(category.trim()),
            _ => query,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: CalendarDate,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<CalendarDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_expense_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id.into(),
            title: expense.title,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            payment_method: expense.payment_method,
            purchase_date: expense.purchase_date,
            installments_total: expense.installments_total,
            installment_number: expense.installment_number,
            parent_expense_id: expense.parent_expense_id.map(Uuid::from),
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Records removed; the whole group for installments
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_params() {
        let params = ListExpensesParams {
            year: Some(2024),
            month: Some(2),
            category: Some(" food ".to_string()),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.category.as_deref(), Some("food"));
        assert!(query.bounds().unwrap().is_some());
    }

    #[test]
    fn test_mixed_params_are_rejected() {
        let params = ListExpensesParams {
            year: Some(2024),
            from: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.into_query(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_bad_month_names_field() {
        let params = ListExpensesParams {
            year: Some(2024),
            month: Some(13),
            ..Default::default()
        };
        match params.into_query() {
            Err(ApiError::Validation { field, .. }) => assert_eq!(field.as_deref(), Some("month")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
