//! Category DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_expense::{Category, CategoryKind};

/// Query string of `GET /categories`
#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesParams {
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into(),
            name: category.name,
            kind: category.kind,
            color: category.color,
            icon: category.icon,
            created_at: category.created_at,
        }
    }
}
