//! HTTP API Layer
//!
//! REST API for expenses, credit card installments, incomes and categories,
//! built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: thin request handlers over [`ExpenseService`],
//!   [`IncomeService`] and [`CategoryService`]
//! - **Middleware**: bearer token authentication and audit logging
//! - **DTOs**: request and response bodies
//! - **Error Handling**: domain errors mapped to JSON error bodies
//!
//! # Routes
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/health`, `/health/ready` | public |
//! | POST | `/api/v1/installments/preview` | plan without storing |
//! | GET, POST | `/api/v1/expenses` | |
//! | GET, PUT, DELETE | `/api/v1/expenses/:id` | |
//! | GET, POST | `/api/v1/incomes` | |
//! | GET, PUT, DELETE | `/api/v1/incomes/:id` | |
//! | GET, POST | `/api/v1/categories` | `?type=income\|expense` |
//! | PUT, DELETE | `/api/v1/categories/:id` | |
//! | POST | `/api/v1/categories/seed` | defaults for a new user |
//! | GET | `/api/v1/summary/monthly` | month's expenses |
//! | GET | `/api/v1/summary/incomes` | month's incomes |
//! | GET | `/api/v1/summary/overview` | dashboard figures |
//! | GET, PUT | `/api/v1/profile` | |
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(expenses, incomes, categories, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_expense::{CategoryService, ExpenseService, IncomeService};

use crate::config::ApiConfig;
use crate::handlers::{categories, expenses, health, incomes, installments, profile, summary};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ExpenseService>,
    pub incomes: Arc<IncomeService>,
    pub categories: Arc<CategoryService>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(
        service: ExpenseService,
        incomes: IncomeService,
        categories: CategoryService,
        config: ApiConfig,
    ) -> Self {
        Self {
            service: Arc::new(service),
            incomes: Arc::new(incomes),
            categories: Arc::new(categories),
            config: Arc::new(config),
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let expense_routes = Router::new()
        .route("/", get(expenses::list_expenses).post(expenses::create_expense))
        .route(
            "/:id",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        );

    let income_routes = Router::new()
        .route("/", get(incomes::list_incomes).post(incomes::create_income))
        .route(
            "/:id",
            get(incomes::get_income)
                .put(incomes::update_income)
                .delete(incomes::delete_income),
        );

    let category_routes = Router::new()
        .route("/", get(categories::list_categories).post(categories::create_category))
        .route("/seed", post(categories::seed_categories))
        .route(
            "/:id",
            put(categories::update_category).delete(categories::delete_category),
        );

    // Protected API routes
    let api_routes = Router::new()
        .route("/installments/preview", post(installments::preview))
        .nest("/expenses", expense_routes)
        .nest("/incomes", income_routes)
        .nest("/categories", category_routes)
        .route("/summary/monthly", get(summary::monthly_summary))
        .route("/summary/incomes", get(summary::income_summary))
        .route("/summary/overview", get(summary::overview))
        .route("/profile", get(profile::get_profile).put(profile::update_profile))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
