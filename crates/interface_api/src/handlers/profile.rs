//! Profile handlers

use axum::{extract::State, Extension, Json};

use domain_expense::ProfileUpdate;

use crate::auth::Claims;
use crate::dto::profile::ProfileResponse;
use crate::{error::ApiError, AppState};

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.service.get_profile(claims.user_id()).await?;
    Ok(Json(profile.into()))
}

/// Saves the profile form, including the card's statement days
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .service
        .update_profile(claims.user_id(), claims.email(), update)
        .await?;
    Ok(Json(profile.into()))
}
