//! PostgreSQL Income Adapter

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    DateRange, DomainPort, HealthCheckResult, HealthCheckable, IncomeId, PortError, UserId,
};
use domain_expense::{Income, IncomeChanges, IncomePort, IncomeQuery, NewIncome};

use crate::repositories::income::IncomeRepository;

const ADAPTER_ID: &str = "postgres-income-adapter";

/// PostgreSQL-backed implementation of the IncomePort trait
#[derive(Debug, Clone)]
pub struct PgIncomeAdapter {
    repository: IncomeRepository,
    pool: PgPool,
}

impl PgIncomeAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: IncomeRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PgIncomeAdapter {}

#[async_trait]
impl HealthCheckable for PgIncomeAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::check_pool(&self.pool, ADAPTER_ID).await
    }
}

#[async_trait]
impl IncomePort for PgIncomeAdapter {
    #[instrument(skip(self), fields(income_id = %id))]
    async fn get_income(&self, user_id: UserId, id: IncomeId) -> Result<Income, PortError> {
        self.repository
            .get(Uuid::from(user_id), Uuid::from(id))
            .await?
            .map(Income::from)
            .ok_or_else(|| PortError::not_found("Income", id))
    }

    #[instrument(skip(self, query))]
    async fn list_incomes(&self, user_id: UserId, query: &IncomeQuery) -> Result<Vec<Income>, PortError> {
        let bounds = query
            .bounds()
            .map_err(|e| PortError::validation_field(e.to_string(), "period"))?
            .map(|(start, end)| (start.as_naive(), end.as_naive()));

        let rows = self
            .repository
            .list(Uuid::from(user_id), query.category.as_deref(), bounds)
            .await?;

        debug!(count = rows.len(), "Listed incomes");
        Ok(rows.into_iter().map(Income::from).collect())
    }

    #[instrument(skip_all, fields(income_id = %income.id))]
    async fn insert_income(&self, income: NewIncome) -> Result<Income, PortError> {
        Ok(self.repository.insert(&income).await?.into())
    }

    #[instrument(skip(self, changes), fields(income_id = %id))]
    async fn update_income(
        &self,
        user_id: UserId,
        id: IncomeId,
        changes: IncomeChanges,
    ) -> Result<Income, PortError> {
        self.repository
            .update(Uuid::from(user_id), Uuid::from(id), &changes)
            .await?
            .map(Income::from)
            .ok_or_else(|| PortError::not_found("Income", id))
    }

    #[instrument(skip(self), fields(income_id = %id))]
    async fn delete_income(&self, user_id: UserId, id: IncomeId) -> Result<u64, PortError> {
        Ok(self.repository.delete(Uuid::from(user_id), Uuid::from(id)).await?)
    }

    #[instrument(skip(self))]
    async fn total_between(&self, user_id: UserId, range: DateRange) -> Result<Decimal, PortError> {
        let bounds = (range.start.as_naive(), range.end.as_naive());
        Ok(self.repository.total(Uuid::from(user_id), Some(bounds)).await?)
    }

    #[instrument(skip(self))]
    async fn lifetime_total(&self, user_id: UserId) -> Result<Decimal, PortError> {
        Ok(self.repository.total(Uuid::from(user_id), None).await?)
    }
}
