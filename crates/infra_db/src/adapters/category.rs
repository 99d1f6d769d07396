//! PostgreSQL Category Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use core_kernel::{CategoryId, DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_expense::{Category, CategoryChanges, CategoryKind, CategoryPort, NewCategory};

use crate::repositories::category::{CategoryRepository, CategoryRow};

const ADAPTER_ID: &str = "postgres-category-adapter";

/// PostgreSQL-backed implementation of the CategoryPort trait
#[derive(Debug, Clone)]
pub struct PgCategoryAdapter {
    repository: CategoryRepository,
    pool: PgPool,
}

impl PgCategoryAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CategoryRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PgCategoryAdapter {}

#[async_trait]
impl HealthCheckable for PgCategoryAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::check_pool(&self.pool, ADAPTER_ID).await
    }
}

fn to_category(row: CategoryRow) -> Result<Category, PortError> {
    Ok(Category::try_from(row)?)
}

#[async_trait]
impl CategoryPort for PgCategoryAdapter {
    #[instrument(skip(self))]
    async fn list_categories(
        &self,
        user_id: UserId,
        kind: Option<CategoryKind>,
    ) -> Result<Vec<Category>, PortError> {
        let rows = self.repository.list(Uuid::from(user_id), kind).await?;
        rows.into_iter().map(to_category).collect()
    }

    #[instrument(skip(self), fields(category_id = %id))]
    async fn get_category(&self, user_id: UserId, id: CategoryId) -> Result<Category, PortError> {
        let row = self
            .repository
            .get(Uuid::from(user_id), Uuid::from(id))
            .await?
            .ok_or_else(|| PortError::not_found("Category", id))?;
        to_category(row)
    }

    #[instrument(skip_all, fields(category_id = %category.id))]
    async fn insert_category(&self, category: NewCategory) -> Result<Category, PortError> {
        to_category(self.repository.insert(&category).await?)
    }

    #[instrument(skip_all, fields(count = categories.len()))]
    async fn insert_categories(&self, categories: Vec<NewCategory>) -> Result<Vec<Category>, PortError> {
        let rows = self.repository.insert_all(&categories).await.map_err(|e| {
            if e.is_constraint_violation() {
                warn!(error = %e, "Category batch rejected, nothing stored");
            }
            PortError::from(e)
        })?;
        rows.into_iter().map(to_category).collect()
    }

    #[instrument(skip(self, changes), fields(category_id = %id))]
    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<Category, PortError> {
        let row = self
            .repository
            .update(Uuid::from(user_id), Uuid::from(id), &changes)
            .await?
            .ok_or_else(|| PortError::not_found("Category", id))?;
        to_category(row)
    }

    #[instrument(skip(self), fields(category_id = %id))]
    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<u64, PortError> {
        Ok(self.repository.delete(Uuid::from(user_id), Uuid::from(id)).await?)
    }
}
