//! PostgreSQL Expense Adapter
//!
//! Implements `ExpensePort` on top of [`ExpenseRepository`].

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use core_kernel::{
    DateRange, DomainPort, ExpenseId, HealthCheckResult, HealthCheckable, PortError, UserId,
};
use domain_expense::{Expense, ExpenseChanges, ExpensePort, ExpenseQuery, NewExpense};

use crate::repositories::expense::{ExpenseRepository, ExpenseRow};

const ADAPTER_ID: &str = "postgres-expense-adapter";

/// PostgreSQL-backed implementation of the ExpensePort trait
#[derive(Debug, Clone)]
pub struct PgExpenseAdapter {
    repository: ExpenseRepository,
    pool: PgPool,
}

impl PgExpenseAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ExpenseRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PgExpenseAdapter {}

#[async_trait]
impl HealthCheckable for PgExpenseAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::check_pool(&self.pool, ADAPTER_ID).await
    }
}

fn to_expense(row: ExpenseRow) -> Result<Expense, PortError> {
    Ok(Expense::try_from(row)?)
}

fn to_expenses(rows: Vec<ExpenseRow>) -> Result<Vec<Expense>, PortError> {
    rows.into_iter().map(to_expense).collect()
}

#[async_trait]
impl ExpensePort for PgExpenseAdapter {
    #[instrument(skip(self), fields(expense_id = %id))]
    async fn get_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Expense, PortError> {
        let row = self
            .repository
            .get(Uuid::from(user_id), Uuid::from(id))
            .await?
            .ok_or_else(|| PortError::not_found("Expense", id))?;
        to_expense(row)
    }

    #[instrument(skip(self, query))]
    async fn list_expenses(
        &self,
        user_id: UserId,
        query: &ExpenseQuery,
    ) -> Result<Vec<Expense>, PortError> {
        let bounds = query
            .bounds()
            .map_err(|e| PortError::validation_field(e.to_string(), "period"))?
            .map(|(start, end)| (start.as_naive(), end.as_naive()));

        let rows = self
            .repository
            .list(Uuid::from(user_id), query.category.as_deref(), bounds)
            .await?;

        debug!(count = rows.len(), "Listed expenses");
        to_expenses(rows)
    }

    #[instrument(skip_all, fields(expense_id = %expense.id))]
    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, PortError> {
        let row = self.repository.insert(&expense).await?;
        to_expense(row)
    }

    #[instrument(skip_all, fields(parent_id = %parent.id, children = children.len()))]
    async fn insert_installment_group(
        &self,
        parent: NewExpense,
        children: Vec<NewExpense>,
    ) -> Result<Vec<Expense>, PortError> {
        if let Some(orphan) = children.iter().find(|c| c.parent_expense_id != Some(parent.id)) {
            return Err(PortError::validation_field(
                format!("Expense {} does not reference the group parent", orphan.id),
                "parent_expense_id",
            ));
        }

        let rows = self
            .repository
            .insert_group(&parent, &children)
            .await
            .map_err(|e| {
                if e.is_constraint_violation() {
                    warn!(error = %e, "Installment group rejected, nothing stored");
                }
                PortError::from(e)
            })?;
        to_expenses(rows)
    }

    #[instrument(skip(self, changes), fields(expense_id = %id))]
    async fn update_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
        changes: ExpenseChanges,
    ) -> Result<Expense, PortError> {
        let row = self
            .repository
            .update(Uuid::from(user_id), Uuid::from(id), &changes)
            .await?
            .ok_or_else(|| PortError::not_found("Expense", id))?;
        to_expense(row)
    }

    #[instrument(skip(self), fields(expense_id = %id))]
    async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<u64, PortError> {
        Ok(self.repository.delete(Uuid::from(user_id), Uuid::from(id)).await?)
    }

    #[instrument(skip(self), fields(parent_id = %parent_id))]
    async fn delete_installment_group(
        &self,
        user_id: UserId,
        parent_id: ExpenseId,
    ) -> Result<u64, PortError> {
        let removed = self
            .repository
            .delete_group(Uuid::from(user_id), Uuid::from(parent_id))
            .await?;
        debug!(removed, "Deleted installment group");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn total_between(&self, user_id: UserId, range: DateRange) -> Result<Decimal, PortError> {
        self.repository
            .total_between(Uuid::from(user_id), range.start.as_naive(), range.end.as_naive())
            .await
            .map_err(PortError::from)
    }

    #[instrument(skip(self))]
    async fn lifetime_total(&self, user_id: UserId) -> Result<Decimal, PortError> {
        Ok(self.repository.lifetime_total(Uuid::from(user_id)).await?)
    }
}

