//! Category handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::CategoryId;
use domain_expense::{CategoryDraft, CategoryPatch};

use crate::auth::Claims;
use crate::dto::category::{CategoryResponse, ListCategoriesParams};
use crate::dto::expense::DeleteResponse;
use crate::{error::ApiError, AppState};

fn responses(categories: Vec<domain_expense::Category>) -> Vec<CategoryResponse> {
    categories.into_iter().map(CategoryResponse::from).collect()
}

/// Lists the caller's categories by name, optionally of one `type`
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ListCategoriesParams>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state
        .categories
        .list_categories(claims.user_id(), params.kind)
        .await?;
    Ok(Json(responses(categories)))
}

/// Creates a category; a name already used for that type answers 409
pub async fn create_category(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<CategoryDraft>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = state.categories.create_category(claims.user_id(), draft).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = state
        .categories
        .update_category(claims.user_id(), CategoryId::from(id), patch)
        .await?;
    Ok(Json(category.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state
        .categories
        .delete_category(claims.user_id(), CategoryId::from(id))
        .await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// Writes the default categories for a user who has none
///
/// Answers 201 with the created list, or 200 with an empty list when the
/// user already had categories.
pub async fn seed_categories(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<Vec<CategoryResponse>>), ApiError> {
    let created = state.categories.seed_defaults(claims.user_id()).await?;
    let status = if created.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(responses(created))))
}
