//! Monthly summary handlers

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::Claims;
use crate::dto::summary::{MonthlySummaryParams, MonthlySummaryResponse, OverviewResponse};
use crate::{error::ApiError, AppState};

/// Total spent in a month, the current one in the configured timezone by default
pub async fn monthly_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<MonthlySummaryParams>,
) -> Result<Json<MonthlySummaryResponse>, ApiError> {
    let (year, month) = requested_month(&state, &params);
    let total = state.service.month_total(claims.user_id(), year, month).await?;
    Ok(Json(total.into()))
}

/// Total received in a month
pub async fn income_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<MonthlySummaryParams>,
) -> Result<Json<MonthlySummaryResponse>, ApiError> {
    let (year, month) = requested_month(&state, &params);
    let total = state.incomes.month_total(claims.user_id(), year, month).await?;
    Ok(Json(total.into()))
}

/// Month totals, balances and the month's largest expense and category
pub async fn overview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<MonthlySummaryParams>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let (year, month) = requested_month(&state, &params);
    let overview = state.incomes.month_overview(claims.user_id(), year, month).await?;
    Ok(Json(overview.into()))
}

fn requested_month(state: &AppState, params: &MonthlySummaryParams) -> (i32, u32) {
    let today = state.config.timezone.calendar_date(Utc::now());
    (
        params.year.unwrap_or_else(|| today.year()),
        params.month.unwrap_or_else(|| today.month()),
    )
}
