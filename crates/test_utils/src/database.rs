//! PostgreSQL container for adapter tests
//!
//! Starts `postgres:16-alpine` through testcontainers and applies the
//! migrations in `migrations/` in order. Needs a running Docker daemon, which is why
//! the tests using it are `#[ignore]`d by default.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ContainerRequest, GenericImage, ImageExt};
use tokio::sync::OnceCell;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const IMAGE: (&str, &str) = ("postgres", "16-alpine");
const CREDENTIALS: (&str, &str) = ("finance", "finance");
const DATABASE: &str = "finance_test";
const READY_LINE: &str = "database system is ready to accept connections";

const MIGRATIONS: [&str; 2] = [
    include_str!("../../../migrations/20240101_000001_initial_schema.sql"),
    include_str!("../../../migrations/20240102_000001_incomes_and_categories.sql"),
];

/// Builds a connection URL for the test credentials
pub fn database_url(host: &str, port: u16) -> String {
    let (user, password) = CREDENTIALS;
    format!("postgres://{user}:{password}@{host}:{port}/{DATABASE}")
}

/// The container request for `postgres:16-alpine` with the test credentials
pub fn postgres_request() -> ContainerRequest<GenericImage> {
    let (image, tag) = IMAGE;
    let (user, password) = CREDENTIALS;

    GenericImage::new(image, tag)
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stderr(READY_LINE))
        .with_env_var("POSTGRES_USER", user)
        .with_env_var("POSTGRES_PASSWORD", password)
        .with_env_var("POSTGRES_DB", DATABASE)
}

/// A running container plus a pool connected to it
///
/// The container stops when this value is dropped.
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pool: PgPool,
}

impl TestDatabase {
    /// Starts a fresh container with the schema applied
    pub async fn start() -> Result<Self, BoxError> {
        let container = postgres_request().start().await?;

        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(5432).await?;
        let url = database_url(&host, port);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await?;
        for migration in MIGRATIONS {
            sqlx::raw_sql(migration).execute(&pool).await?;
        }

        Ok(Self {
            _container: container,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Number of expense rows stored for `user_id`, across every group
    pub async fn expense_rows(&self, user_id: Uuid) -> Result<i64, BoxError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM expenses WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

static SHARED: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// The container shared by every test in one test binary
///
/// Rows persist between tests, so each test should work under its own
/// user id.
///
/// # Panics
///
/// Panics if the container cannot be started.
pub async fn shared_database() -> Arc<TestDatabase> {
    SHARED
        .get_or_init(|| async {
            match TestDatabase::start().await {
                Ok(db) => Arc::new(db),
                Err(e) => panic!("could not start the test database: {e}"),
            }
        })
        .await
        .clone()
}
