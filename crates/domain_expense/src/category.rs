//! User-defined income and expense categories
//!
//! Expenses and incomes store the category by name, so renaming or deleting
//! a category leaves existing records untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use core_kernel::{CategoryId, UserId};

/// Which ledger a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(format!("unknown category type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    /// CSS hex color, e.g. `#ef4444`
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn from_new(draft: NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id,
            user_id: draft.user_id,
            name: draft.name,
            kind: draft.kind,
            color: draft.color,
            icon: draft.icon,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    pub kind: CategoryKind,
    pub color: String,
    pub icon: String,
}

impl NewCategory {
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        kind: CategoryKind,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: CategoryId::new_v7(),
            user_id,
            name: name.into(),
            kind,
            color: color.into(),
            icon: icon.into(),
        }
    }
}

/// `#rgb` or `#rrggbb`
pub(crate) fn valid_color(color: &str) -> Result<(), ValidationError> {
    let digits = color.strip_prefix('#').unwrap_or_default();
    let well_formed = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if !well_formed {
        let mut error = ValidationError::new("color");
        error.message = Some("color must be a hex value such as #ef4444".into());
        return Err(error);
    }
    Ok(())
}

/// Category form data as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryDraft {
    #[validate(length(min = 1, max = 50, message = "name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    #[validate(custom(function = "valid_color"))]
    pub color: String,
    #[validate(length(min = 1, max = 16, message = "icon is required"))]
    pub icon: String,
}

impl CategoryDraft {
    pub fn new(
        name: impl Into<String>,
        kind: CategoryKind,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            color: color.into(),
            icon: icon.into(),
        }
    }
}

/// Partial update of a category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<CategoryKind>,
    pub color: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub icon: Option<String>,
}

/// A validated patch as the storage port applies it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none() && self.color.is_none() && self.icon.is_none()
    }

    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(kind) = self.kind {
            category.kind = kind;
        }
        if let Some(color) = &self.color {
            category.color = color.clone();
        }
        if let Some(icon) = &self.icon {
            category.icon = icon.clone();
        }
    }
}

const DEFAULT_EXPENSE_CATEGORIES: [(&str, &str, &str); 8] = [
    ("Alimentação", "#ef4444", "🍔"),
    ("Transporte", "#f97316", "🚗"),
    ("Lazer", "#8b5cf6", "🎮"),
    ("Saúde", "#10b981", "⚕️"),
    ("Educação", "#3b82f6", "📚"),
    ("Compras", "#ec4899", "🛍️"),
    ("Contas", "#eab308", "💡"),
    ("Outros", "#6b7280", "📦"),
];

const DEFAULT_INCOME_CATEGORIES: [(&str, &str, &str); 8] = [
    ("Salário", "#10b981", "💼"),
    ("Freelance", "#3b82f6", "💻"),
    ("Investimentos", "#8b5cf6", "📈"),
    ("Aluguel", "#f59e0b", "🏠"),
    ("Vendas", "#10b981", "💰"),
    ("Bônus", "#ec4899", "🎁"),
    ("Presentes", "#f97316", "🎉"),
    ("Outros", "#6b7280", "📦"),
];

/// The starter set written for a user who has no categories yet
pub fn default_categories(user_id: UserId) -> Vec<NewCategory> {
    let expense = DEFAULT_EXPENSE_CATEGORIES
        .iter()
        .map(|(name, color, icon)| NewCategory::new(user_id, *name, CategoryKind::Expense, *color, *icon));
    let income = DEFAULT_INCOME_CATEGORIES
        .iter()
        .map(|(name, color, icon)| NewCategory::new(user_id, *name, CategoryKind::Income, *color, *icon));
    expense.chain(income).collect()
}
