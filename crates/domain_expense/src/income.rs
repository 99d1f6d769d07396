//! Income records and form input

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{CalendarDate, Currency, IncomeId, Money, UserId};

/// A stored income
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: IncomeId,
    pub user_id: UserId,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: CalendarDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Income {
    pub fn from_new(draft: NewIncome, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id,
            user_id: draft.user_id,
            title: draft.title,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn money(&self, currency: Currency) -> Money {
        Money::new(self.amount, currency)
    }
}

/// An income ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncome {
    pub id: IncomeId,
    pub user_id: UserId,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: CalendarDate,
    pub description: Option<String>,
}

/// Income form data as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct IncomeDraft {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    /// Decimal string such as `"5200.00"`
    pub amount: String,
    pub date: String,
    #[validate(length(min = 1, max = 100, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl IncomeDraft {
    pub fn new(
        title: impl Into<String>,
        amount: impl Into<String>,
        date: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            date: date.into(),
            category: category.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of an income
///
/// An empty `description` clears the stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct IncomePatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// A validated patch as the storage port applies it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeChanges {
    pub title: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<CalendarDate>,
    pub category: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
}

impl IncomeChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }

    pub fn apply_to(&self, income: &mut Income, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            income.title = title.clone();
        }
        if let Some(amount) = self.amount {
            income.amount = amount;
        }
        if let Some(date) = self.date {
            income.date = date;
        }
        if let Some(category) = &self.category {
            income.category = category.clone();
        }
        if let Some(description) = &self.description {
            income.description = description.clone();
        }
        income.updated_at = now;
    }
}

/// Trims a free-text description; blank text means none
pub(crate) fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Income {
        Income::from_new(
            NewIncome {
                id: IncomeId::new_v7(),
                user_id: UserId::new(),
                title: "Salary".to_string(),
                amount: dec!(5200.00),
                category: "Salário".to_string(),
                date: CalendarDate::new(2024, 3, 5).unwrap(),
                description: Some("March".to_string()),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_draft_validation() {
        assert!(IncomeDraft::new("Salary", "10", "2024-03-05", "Salário").validate().is_ok());

        let errors = IncomeDraft::new("", "10", "2024-03-05", "Salário").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let long = IncomeDraft::new("Gift", "10", "2024-03-05", "Presentes")
            .with_description("x".repeat(501));
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_changes_clear_description() {
        let mut income = sample();
        let changes = IncomeChanges {
            amount: Some(dec!(5300)),
            description: Some(None),
            ..Default::default()
        };
        changes.apply_to(&mut income, Utc::now());
        assert_eq!(income.amount, dec!(5300));
        assert_eq!(income.description, None);
        assert_eq!(income.title, "Salary");
    }

    #[test]
    fn test_untouched_description_is_kept() {
        let mut income = sample();
        IncomeChanges { title: Some("Pay".to_string()), ..Default::default() }
            .apply_to(&mut income, Utc::now());
        assert_eq!(income.description.as_deref(), Some("March"));
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(Some("  bonus ")).as_deref(), Some("bonus"));
        assert_eq!(normalize_description(Some("   ")), None);
        assert_eq!(normalize_description(None), None);
    }
}
