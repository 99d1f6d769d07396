//! PostgreSQL Profile Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_expense::{ProfilePort, ProfileUpdate, UserProfile};

use crate::repositories::profile::ProfileRepository;

const ADAPTER_ID: &str = "postgres-profile-adapter";

/// PostgreSQL-backed implementation of the ProfilePort trait
#[derive(Debug, Clone)]
pub struct PgProfileAdapter {
    repository: ProfileRepository,
    pool: PgPool,
}

impl PgProfileAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ProfileRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PgProfileAdapter {}

#[async_trait]
impl HealthCheckable for PgProfileAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::check_pool(&self.pool, ADAPTER_ID).await
    }
}

#[async_trait]
impl ProfilePort for PgProfileAdapter {
    #[instrument(skip(self))]
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, PortError> {
        let row = self.repository.get(Uuid::from(user_id)).await?;
        Ok(row.map(UserProfile::from))
    }

    #[instrument(skip(self, email, update))]
    async fn upsert_profile(
        &self,
        user_id: UserId,
        email: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, PortError> {
        let row = self.repository.upsert(Uuid::from(user_id), email, update).await?;
        Ok(UserProfile::from(row))
    }
}
