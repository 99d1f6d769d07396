//! Installment preview handler

use axum::{extract::State, Extension, Json};

use domain_billing::PlanRequest;

use crate::auth::Claims;
use crate::dto::installment::PlanResponse;
use crate::{error::ApiError, AppState};

/// Splits a purchase with the caller's invoice settings without storing it
pub async fn preview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state.service.preview_plan(claims.user_id(), &request).await?;
    Ok(Json(PlanResponse::from(&plan)))
}
