//! Expense repository implementation
//!
//! Plain SQL over the `expenses` table. Installment groups are written and
//! deleted inside a single transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{CalendarDate, ExpenseId, UserId};
use domain_expense::{Expense, ExpenseChanges, NewExpense, PaymentMethod};

use crate::error::DatabaseError;

macro_rules! expense_columns {
    () => {
        "id, user_id, title, amount, category, date, payment_method, purchase_date, \
         installments_total, installment_number, parent_expense_id, created_at, updated_at"
    };
}

const INSERT_EXPENSE: &str = concat!(
    "INSERT INTO expenses (
        id, user_id, title, amount, category, date, payment_method,
        purchase_date, installments_total, installment_number, parent_expense_id
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    RETURNING ",
    expense_columns!()
);

const SELECT_EXPENSE: &str = concat!(
    "SELECT ",
    expense_columns!(),
    " FROM expenses WHERE id = $1 AND user_id = $2"
);

const UPDATE_EXPENSE: &str = concat!(
    "UPDATE expenses SET
        title = COALESCE($3, title),
        amount = COALESCE($4, amount),
        date = COALESCE($5, date),
        category = COALESCE($6, category),
        payment_method = COALESCE($7, payment_method),
        updated_at = now()
    WHERE id = $1 AND user_id = $2
    RETURNING ",
    expense_columns!()
);

/// A row of the `expenses` table
#[derive(Debug, Clone, FromRow)]
pub struct ExpenseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub payment_method: String,
    pub purchase_date: Option<NaiveDate>,
    pub installments_total: Option<i32>,
    pub installment_number: Option<i32>,
    pub parent_expense_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = DatabaseError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let payment_method = row
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|e| DatabaseError::invalid_column("payment_method", e))?;

        Ok(Expense {
            id: ExpenseId::from(row.id),
            user_id: UserId::from(row.user_id),
            title: row.title,
            amount: row.amount,
            category: row.category,
            date: CalendarDate::from(row.date),
            payment_method,
            purchase_date: row.purchase_date.map(CalendarDate::from),
            installments_total: count_from_column("installments_total", row.installments_total)?,
            installment_number: count_from_column("installment_number", row.installment_number)?,
            parent_expense_id: row.parent_expense_id.map(ExpenseId::from),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn count_from_column(column: &'static str, value: Option<i32>) -> Result<Option<u32>, DatabaseError> {
    value
        .map(|n| u32::try_from(n).map_err(|_| DatabaseError::invalid_column(column, n.to_string())))
        .transpose()
}

fn count_to_column(column: &'static str, value: Option<u32>) -> Result<Option<i32>, DatabaseError> {
    value
        .map(|n| i32::try_from(n).map_err(|_| DatabaseError::invalid_column(column, n.to_string())))
        .transpose()
}

/// Builds the INSERT for one record; the caller picks the executor
fn insert_query(
    expense: &NewExpense,
) -> Result<QueryAs<'_, Postgres, ExpenseRow, PgArguments>, DatabaseError> {
    Ok(sqlx::query_as::<_, ExpenseRow>(INSERT_EXPENSE)
        .bind(Uuid::from(expense.id))
        .bind(Uuid::from(expense.user_id))
        .bind(expense.title.as_str())
        .bind(expense.amount)
        .bind(expense.category.as_str())
        .bind(expense.date.as_naive())
        .bind(expense.payment_method.as_str())
        .bind(expense.purchase_date.map(|d| d.as_naive()))
        .bind(count_to_column("installments_total", expense.installments_total)?)
        .bind(count_to_column("installment_number", expense.installment_number)?)
        .bind(expense.parent_expense_id.map(Uuid::from)))
}

/// Repository for the `expenses` table
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<ExpenseRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ExpenseRow>(SELECT_EXPENSE)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Lists a user's expenses, newest date first
    ///
    /// `between` is an inclusive date range.
    pub async fn list(
        &self,
        user_id: Uuid,
        category: Option<&str>,
        between: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<ExpenseRow>, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(expense_columns!());
        builder.push(" FROM expenses WHERE user_id = ");
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
            .build_query_as::<ExpenseRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn insert(&self, expense: &NewExpense) -> Result<ExpenseRow, DatabaseError> {
        let row = insert_query(expense)?.fetch_one(&self.pool).await?;
        debug!(expense_id = %expense.id, "Inserted expense");
        Ok(row)
    }

    /// Inserts a parent and its children in a single transaction
    ///
    /// The parent goes first so the children's foreign key resolves. Any
    /// failure rolls the whole group back.
    pub async fn insert_group(
        &self,
        parent: &NewExpense,
        children: &[NewExpense],
    ) -> Result<Vec<ExpenseRow>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(children.len() + 1);

        rows.push(insert_query(parent)?.fetch_one(&mut *tx).await?);
        for child in children {
            rows.push(insert_query(child)?.fetch_one(&mut *tx).await?);
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        debug!(parent_id = %parent.id, records = rows.len(), "Inserted installment group");
        Ok(rows)
    }

    /// Applies the present fields of `changes`; `None` when no row matched
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &ExpenseChanges,
    ) -> Result<Option<ExpenseRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ExpenseRow>(UPDATE_EXPENSE)
            .bind(id)
            .bind(user_id)
            .bind(changes.title.as_deref())
            .bind(changes.amount)
            .bind(changes.date.map(|d| d.as_naive()))
            .bind(changes.category.as_deref())
            .bind(changes.payment_method.map(|m| m.as_str()))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Deletes the children, then the parent, in one transaction
    pub async fn delete_group(&self, user_id: Uuid, parent_id: Uuid) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let children =
            sqlx::query("DELETE FROM expenses WHERE parent_expense_id = $1 AND user_id = $2")
                .bind(parent_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        let parent = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(parent_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        Ok(children.rows_affected() + parent.rows_affected())
    }

    /// Sum of every expense the user has recorded
    pub async fn lifetime_total(&self, user_id: Uuid) -> Result<Decimal, DatabaseError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Sum of amounts dated within the inclusive range
    pub async fn total_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Decimal, DatabaseError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses
             WHERE user_id = $1 AND date BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
