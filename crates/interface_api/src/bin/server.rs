//! Finance API Server Binary
//!
//! # Usage
//!
//! ```bash
//! API_JWT_SECRET=... API_DATABASE_URL=postgres://... cargo run --bin finance-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - Identity provider's JWT signing secret (required)
//! * `API_JWT_AUDIENCE` - Required `aud` claim (optional)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_DATABASE_MAX_CONNECTIONS` - Pool size (default 10)
//! * `API_LOG_LEVEL` - Log level or `EnvFilter` directive (default: info)
//! * `API_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API_TIMEZONE` - IANA timezone for "this month" (default: America/Sao_Paulo)
//! * `API_EXPENSE__CURRENCY`, `API_EXPENSE__DEFAULT_PAYMENT_DAY`,
//!   `API_EXPENSE__MAX_INSTALLMENTS` - expense settings

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_expense::{CategoryService, ExpenseService, IncomeService};
use infra_db::{
    create_pool, run_migrations, DatabaseConfig, PgCategoryAdapter, PgExpenseAdapter,
    PgIncomeAdapter, PgProfileAdapter,
};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("loading API configuration")?;
    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        currency = %config.expense.currency,
        "Starting finance API server"
    );

    let database = DatabaseConfig::new(config.database_url.clone())
        .max_connections(config.database_max_connections);
    let pool = create_pool(database)
        .await
        .context("connecting to the database")?;
    run_migrations(&pool).await.context("applying migrations")?;

    let expenses = Arc::new(PgExpenseAdapter::new(pool.clone()));
    let service = ExpenseService::new(
        expenses.clone(),
        Arc::new(PgProfileAdapter::new(pool.clone())),
        config.expense.clone(),
    );
    let incomes = IncomeService::new(
        Arc::new(PgIncomeAdapter::new(pool.clone())),
        expenses,
        config.expense.clone(),
    );
    let categories = CategoryService::new(Arc::new(PgCategoryAdapter::new(pool)));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;
    let app = create_router(AppState::new(service, incomes, categories, config));

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (json, pretty) = if config.json_logs() {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer().with_target(true)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
}

/// Waits for Ctrl+C or SIGTERM so in-flight requests can finish
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
