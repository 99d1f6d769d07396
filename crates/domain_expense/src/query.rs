//! Listing filters shared by expenses and incomes

use core_kernel::{CalendarDate, DateRange, MonthOfYear, TemporalError};

use crate::expense::Expense;
use crate::income::Income;

/// A dated, categorized ledger entry
pub trait Dated {
    fn category(&self) -> &str;
    fn date(&self) -> CalendarDate;
}

impl Dated for Expense {
    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> CalendarDate {
        self.date
    }
}

impl Dated for Income {
    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> CalendarDate {
        self.date
    }
}

/// Date window of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Inclusive start and end dates
    Range(DateRange),
    /// One calendar month
    Month(MonthOfYear),
}

impl Period {
    pub fn date_range(&self) -> Result<DateRange, TemporalError> {
        match self {
            Period::Range(range) => Ok(*range),
            Period::Month(month) => month.date_range(),
        }
    }
}

/// Query parameters for listing expenses or incomes
///
/// Results are always ordered by date, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseQuery {
    /// Exact category match
    pub category: Option<String>,
    pub period: Option<Period>,
}

/// Incomes filter on the same fields
pub type IncomeQuery = ExpenseQuery;

impl ExpenseQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_month(month: MonthOfYear) -> Self {
        Self {
            period: Some(Period::Month(month)),
            ..Default::default()
        }
    }

    pub fn between(range: DateRange) -> Self {
        Self {
            period: Some(Period::Range(range)),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The inclusive date bounds, if the query has a period
    pub fn bounds(&self) -> Result<Option<(CalendarDate, CalendarDate)>, TemporalError> {
        self.period
            .map(|p| p.date_range().map(|r| (r.start, r.end)))
            .transpose()
    }

    /// In-memory evaluation of the filter, used by the mock adapters
    pub fn matches<T: Dated>(&self, entry: &T) -> bool {
        if let Some(category) = &self.category {
            if entry.category() != category {
                return false;
            }
        }
        match self.period.map(|p| p.date_range()) {
            Some(Ok(range)) => range.contains(entry.date()),
            Some(Err(_)) => false,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let query = ExpenseQuery::in_month(MonthOfYear::new(2024, 2).unwrap());
        let (start, end) = query.bounds().unwrap().unwrap();
        assert_eq!(start.to_string(), "2024-02-01");
        assert_eq!(end.to_string(), "2024-02-29");
    }

    #[test]
    fn test_matches_incomes_by_category_and_month() {
        let income = crate::income::Income::from_new(
            crate::income::NewIncome {
                id: core_kernel::IncomeId::new_v7(),
                user_id: core_kernel::UserId::new(),
                title: "Salary".to_string(),
                amount: rust_decimal::Decimal::new(500000, 2),
                category: "Salário".to_string(),
                date: CalendarDate::new(2024, 2, 29).unwrap(),
                description: None,
            },
            chrono::Utc::now(),
        );
        let february = ExpenseQuery::in_month(MonthOfYear::new(2024, 2).unwrap());
        assert!(february.matches(&income));
        assert!(february.clone().with_category("Salário").matches(&income));
        assert!(!february.with_category("Freelance").matches(&income));
        assert!(!ExpenseQuery::in_month(MonthOfYear::new(2024, 3).unwrap()).matches(&income));
    }

    #[test]
    fn test_no_period_has_no_bounds() {
        assert_eq!(ExpenseQuery::all().with_category("food").bounds().unwrap(), None);
    }
}
