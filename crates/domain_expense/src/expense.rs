//! Expense records and form input
//!
//! A purchase paid in installments is stored as a group: installment 1 is the
//! parent record and carries no parent id, installments 2..N point at it. All
//! members share `installments_total` and the original `purchase_date`, while
//! `date` holds each installment's due date.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::{CalendarDate, Currency, ExpenseId, Money, UserId};

/// How an expense was paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    #[default]
    Debit,
    Pix,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Pix => "pix",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit" => Ok(PaymentMethod::Debit),
            "pix" => Ok(PaymentMethod::Pix),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

/// A stored expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserId,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    /// Charge date; the due date for installments
    pub date: CalendarDate,
    pub payment_method: PaymentMethod,
    pub purchase_date: Option<CalendarDate>,
    pub installments_total: Option<u32>,
    pub installment_number: Option<u32>,
    pub parent_expense_id: Option<ExpenseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Builds the stored form of `draft`, stamping both timestamps with `now`
    pub fn from_new(draft: NewExpense, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id,
            user_id: draft.user_id,
            title: draft.title,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            payment_method: draft.payment_method,
            purchase_date: draft.purchase_date,
            installments_total: draft.installments_total,
            installment_number: draft.installment_number,
            parent_expense_id: draft.parent_expense_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// True for any member of an installment group, parent included
    pub fn is_installment(&self) -> bool {
        self.parent_expense_id.is_some() || self.installments_total.is_some()
    }

    /// The parent id of this record's installment group, `None` for plain expenses
    pub fn group_root(&self) -> Option<ExpenseId> {
        match self.parent_expense_id {
            Some(parent) => Some(parent),
            None if self.installments_total.is_some() => Some(self.id),
            None => None,
        }
    }

    pub fn money(&self, currency: Currency) -> Money {
        Money::new(self.amount, currency)
    }
}

/// An expense ready to be written
///
/// Ids are assigned before anything is stored so children can reference
/// their parent within a single write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub id: ExpenseId,
    pub user_id: UserId,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: CalendarDate,
    pub payment_method: PaymentMethod,
    pub purchase_date: Option<CalendarDate>,
    pub installments_total: Option<u32>,
    pub installment_number: Option<u32>,
    pub parent_expense_id: Option<ExpenseId>,
}

impl NewExpense {
    /// A single expense with no installment data
    pub fn single(
        user_id: UserId,
        title: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        date: CalendarDate,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: ExpenseId::new_v7(),
            user_id,
            title: title.into(),
            amount,
            category: category.into(),
            date,
            payment_method,
            purchase_date: None,
            installments_total: None,
            installment_number: None,
            parent_expense_id: None,
        }
    }
}

/// Expense form data as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExpenseDraft {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    /// Decimal string such as `"129.90"`
    pub amount: String,
    /// Purchase date, date-only or date-time
    pub date: String,
    #[validate(length(min = 1, max = 100, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub installments: Option<i64>,
}

impl ExpenseDraft {
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
            payment_method: None,
            installments: None,
        }
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_installments(mut self, installments: i64) -> Self {
        self.installments = Some(installments);
        self
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method.unwrap_or_default()
    }

    /// Installment count when this draft takes the installment path
    ///
    /// Only credit card purchases with more than one installment are split.
    pub fn installment_count(&self) -> Option<i64> {
        match (self.payment_method(), self.installments) {
            (PaymentMethod::CreditCard, Some(n)) if n > 1 => Some(n),
            _ => None,
        }
    }
}

/// Partial update of a plain expense
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExpensePatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

/// A validated patch as the storage port applies it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseChanges {
    pub title: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<CalendarDate>,
    pub category: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.payment_method.is_none()
    }

    /// Applies the changes in place
    pub fn apply_to(&self, expense: &mut Expense, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            expense.title = title.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(category) = &self.category {
            expense.category = category.clone();
        }
        if let Some(method) = self.payment_method {
            expense.payment_method = method;
        }
        expense.updated_at = now;
    }
}

/// Title of installment `index` of `total`, e.g. `"Laptop (2/10)"`
pub fn installment_title(title: &str, index: u32, total: u32) -> String {
    format!("{} ({}/{})", title, index, total)
}
