//! Income repository implementation

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{CalendarDate, IncomeId, UserId};
use domain_expense::{Income, IncomeChanges, NewIncome};

use crate::error::DatabaseError;

macro_rules! income_columns {
    () => {
        "id, user_id, title, amount, category, date, description, created_at, updated_at"
    };
}

const INSERT_INCOME: &str = concat!(
    "INSERT INTO incomes (id, user_id, title, amount, category, date, description)
     VALUES ($1, $2, $3, $4, $5, $6, $7)
     RETURNING ",
    income_columns!()
);

const SELECT_INCOME: &str = concat!(
    "SELECT ",
    income_columns!(),
    " FROM incomes WHERE id = $1 AND user_id = $2"
);

const UPDATE_INCOME: &str = concat!(
    "UPDATE incomes SET
        title = COALESCE($3, title),
        amount = COALESCE($4, amount),
        date = COALESCE($5, date),
        category = COALESCE($6, category),
        description = CASE WHEN $7 THEN $8 ELSE description END,
        updated_at = now()
    WHERE id = $1 AND user_id = $2
    RETURNING ",
    income_columns!()
);

/// A row of the `incomes` table
#[derive(Debug, Clone, FromRow)]
pub struct IncomeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IncomeRow> for Income {
    fn from(row: IncomeRow) -> Self {
        Income {
            id: IncomeId::from(row.id),
            user_id: UserId::from(row.user_id),
            title: row.title,
            amount: row.amount,
            category: row.category,
            date: CalendarDate::from(row.date),
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for the `incomes` table
#[derive(Debug, Clone)]
pub struct IncomeRepository {
    pool: PgPool,
}

impl IncomeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<IncomeRow>, DatabaseError> {
        let row = sqlx::query_as::<_, IncomeRow>(SELECT_INCOME)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Lists a user's incomes, newest date first; `between` is inclusive
    pub async fn list(
        &self,
        user_id: Uuid,
        category: Option<&str>,
        between: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<IncomeRow>, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(income_columns!());
        builder.push(" FROM incomes WHERE user_id = ");
        builder.push_bind(user_id);

        if let Some(category) = category {
            builder.push(" AND category = ");
            builder.push_bind(category.to_string());
        }
        if let Some((start, end)) = between {
            builder.push(" AND date BETWEEN ");
            builder.push_bind(start);
            builder.push(" AND ");
            builder.push_bind(end);
        }
        builder.push(" ORDER BY date DESC, created_at DESC");

        let rows = builder
            .build_query_as::<IncomeRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn insert(&self, income: &NewIncome) -> Result<IncomeRow, DatabaseError> {
        let row = sqlx::query_as::<_, IncomeRow>(INSERT_INCOME)
            .bind(Uuid::from(income.id))
            .bind(Uuid::from(income.user_id))
            .bind(income.title.as_str())
            .bind(income.amount)
            .bind(income.category.as_str())
            .bind(income.date.as_naive())
            .bind(income.description.as_deref())
            .fetch_one(&self.pool)
            .await?;
        debug!(income_id = %income.id, "Inserted income");
        Ok(row)
    }

    /// Applies the present fields of `changes`; `None` when no row matched
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &IncomeChanges,
    ) -> Result<Option<IncomeRow>, DatabaseError> {
        let row = sqlx::query_as::<_, IncomeRow>(UPDATE_INCOME)
            .bind(id)
            .bind(user_id)
            .bind(changes.title.as_deref())
            .bind(changes.amount)
            .bind(changes.date.map(|d| d.as_naive()))
            .bind(changes.category.as_deref())
            .bind(changes.description.is_some())
            .bind(changes.description.clone().flatten())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Sum of amounts, within the inclusive range when one is given
    pub async fn total(
        &self,
        user_id: Uuid,
        between: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Decimal, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COALESCE(SUM(amount), 0) FROM incomes WHERE user_id = ");
        builder.push_bind(user_id);
        if let Some((start, end)) = between {
            builder.push(" AND date BETWEEN ");
            builder.push_bind(start);
            builder.push(" AND ");
            builder.push_bind(end);
        }

        let total = builder
            .build_query_scalar::<Decimal>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
