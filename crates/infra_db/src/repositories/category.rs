//! Category repository implementation
//!
//! `(user_id, kind, name)` is unique; the default set is inserted in one
//! transaction so a user never ends up with half of it.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{CategoryId, UserId};
use domain_expense::{Category, CategoryChanges, CategoryKind, NewCategory};

use crate::error::DatabaseError;

macro_rules! category_columns {
    () => {
        "id, user_id, name, kind, color, icon, created_at"
    };
}

const INSERT_CATEGORY: &str = concat!(
    "INSERT INTO categories (id, user_id, name, kind, color, icon)
     VALUES ($1, $2, $3, $4, $5, $6)
     RETURNING ",
    category_columns!()
);

const SELECT_CATEGORY: &str = concat!(
    "SELECT ",
    category_columns!(),
    " FROM categories WHERE id = $1 AND user_id = $2"
);

const UPDATE_CATEGORY: &str = concat!(
    "UPDATE categories SET
        name = COALESCE($3, name),
        kind = COALESCE($4, kind),
        color = COALESCE($5, color),
        icon = COALESCE($6, icon)
    WHERE id = $1 AND user_id = $2
    RETURNING ",
    category_columns!()
);

/// A row of the `categories` table
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: String,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = DatabaseError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<CategoryKind>()
            .map_err(|e| DatabaseError::invalid_column("kind", e))?;

        Ok(Category {
            id: CategoryId::from(row.id),
            user_id: UserId::from(row.user_id),
            name: row.name,
            kind,
            color: row.color,
            icon: row.icon,
            created_at: row.created_at,
        })
    }
}

fn insert_query(category: &NewCategory) -> QueryAs<'_, Postgres, CategoryRow, PgArguments> {
    sqlx::query_as::<_, CategoryRow>(INSERT_CATEGORY)
        .bind(Uuid::from(category.id))
        .bind(Uuid::from(category.user_id))
        .bind(category.name.as_str())
        .bind(category.kind.as_str())
        .bind(category.color.as_str())
        .bind(category.icon.as_str())
}

/// Repository for the `categories` table
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<CategoryRow>, DatabaseError> {
        let row = sqlx::query_as::<_, CategoryRow>(SELECT_CATEGORY)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Lists a user's categories ordered by name
    pub async fn list(
        &self,
        user_id: Uuid,
        kind: Option<CategoryKind>,
    ) -> Result<Vec<CategoryRow>, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(category_columns!());
        builder.push(" FROM categories WHERE user_id = ");
        builder.push_bind(user_id);
        if let Some(kind) = kind {
            builder.push(" AND kind = ");
            builder.push_bind(kind.as_str());
        }
        builder.push(" ORDER BY name, kind");

        let rows = builder
            .build_query_as::<CategoryRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn insert(&self, category: &NewCategory) -> Result<CategoryRow, DatabaseError> {
        let row = insert_query(category).fetch_one(&self.pool).await?;
        debug!(category_id = %category.id, "Inserted category");
        Ok(row)
    }

    /// Inserts every category in a single transaction
    pub async fn insert_all(&self, categories: &[NewCategory]) -> Result<Vec<CategoryRow>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(categories.len());
        for category in categories {
            rows.push(insert_query(category).fetch_one(&mut *tx).await?);
        }
        tx.commit()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        debug!(records = rows.len(), "Inserted categories");
        Ok(rows)
    }

    /// Applies the present fields of `changes`; `None` when no row matched
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &CategoryChanges,
    ) -> Result<Option<CategoryRow>, DatabaseError> {
        let row = sqlx::query_as::<_, CategoryRow>(UPDATE_CATEGORY)
            .bind(id)
            .bind(user_id)
            .bind(changes.name.as_deref())
            .bind(changes.kind.map(|k| k.as_str()))
            .bind(changes.color.as_deref())
            .bind(changes.icon.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
