//! Expense handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::ExpenseId;
use domain_expense::{ExpenseDraft, ExpensePatch};

use crate::auth::Claims;
use crate::dto::expense::{DeleteResponse, ExpenseResponse, ListExpensesParams};
use crate::{error::ApiError, AppState};

/// Lists the caller's expenses, newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ListExpensesParams>,
) -> Result<Json<Vec<ExpenseResponse>>, ApiError> {
    let query = params.into_query()?;
    let expenses = state.service.list_expenses(claims.user_id(), &query).await?;
    Ok(Json(expenses.into_iter().map(ExpenseResponse::from).collect()))
}

/// Creates an expense; credit card purchases in several installments create
/// the whole group and return its first installment
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<ExpenseDraft>,
) -> Result<(StatusCode, Json<ExpenseResponse>), ApiError> {
    let expense = state.service.create_expense(claims.user_id(), draft).await?;
    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(expense))))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    let expense = state
        .service
        .get_expense(claims.user_id(), ExpenseId::from(id))
        .await?;
    Ok(Json(expense.into()))
}

/// Edits a plain expense; installments answer 409
pub async fn update_expense(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ExpensePatch>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    let expense = state
        .service
        .update_expense(claims.user_id(), ExpenseId::from(id), patch)
        .await?;
    Ok(Json(expense.into()))
}

/// Deletes an expense, or its whole installment group
pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state
        .service
        .delete_expense(claims.user_id(), ExpenseId::from(id))
        .await?;
    Ok(Json(DeleteResponse { deleted }))
}
