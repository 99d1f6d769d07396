//! Income handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::IncomeId;
use domain_expense::{IncomeDraft, IncomePatch};

use crate::auth::Claims;
use crate::dto::expense::DeleteResponse;
use crate::dto::income::{IncomeResponse, ListIncomesParams};
use crate::{error::ApiError, AppState};

/// Lists the caller's incomes, newest first
pub async fn list_incomes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ListIncomesParams>,
) -> Result<Json<Vec<IncomeResponse>>, ApiError> {
    let query = params.into_query()?;
    let incomes = state.incomes.list_incomes(claims.user_id(), &query).await?;
    Ok(Json(incomes.into_iter().map(IncomeResponse::from).collect()))
}

pub async fn create_income(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<IncomeDraft>,
) -> Result<(StatusCode, Json<IncomeResponse>), ApiError> {
    let income = state.incomes.create_income(claims.user_id(), draft).await?;
    Ok((StatusCode::CREATED, Json(IncomeResponse::from(income))))
}

pub async fn get_income(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<IncomeResponse>, ApiError> {
    let income = state
        .incomes
        .get_income(claims.user_id(), IncomeId::from(id))
        .await?;
    Ok(Json(income.into()))
}

pub async fn update_income(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(patch): Json<IncomePatch>,
) -> Result<Json<IncomeResponse>, ApiError> {
    let income = state
        .incomes
        .update_income(claims.user_id(), IncomeId::from(id), patch)
        .await?;
    Ok(Json(income.into()))
}

pub async fn delete_income(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state
        .incomes
        .delete_income(claims.user_id(), IncomeId::from(id))
        .await?;
    Ok(Json(DeleteResponse { deleted }))
}
