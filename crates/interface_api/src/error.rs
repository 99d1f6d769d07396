//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_expense::ExpenseError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = match self {
            ApiError::Validation { message, field } => {
                // validator reports one line per failed constraint
                let lines: Vec<String> = message.lines().map(str::to_string).collect();
                let details = (lines.len() > 1).then_some(lines);
                ErrorResponse {
                    error: error_type.to_string(),
                    message,
                    field,
                    details,
                }
            }
            ApiError::Internal(detail) => {
                error!(%detail, "Internal error");
                ErrorResponse {
                    error: error_type.to_string(),
                    message: "Internal server error".to_string(),
                    field: None,
                    details: None,
                }
            }
            ApiError::NotFound(message)
            | ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::Conflict(message)
            | ApiError::ServiceUnavailable(message) => ErrorResponse {
                error: error_type.to_string(),
                message,
                field: None,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        let field = err.field();
        match err {
            ExpenseError::Billing(e) => ApiError::Validation {
                message: e.to_string(),
                field,
            },
            ExpenseError::Validation { message, .. } => ApiError::Validation { message, field },
            ExpenseError::TooManyInstallments { .. } => ApiError::Validation {
                message: err.to_string(),
                field,
            },
            ExpenseError::InstallmentLocked(_) => ApiError::Conflict(err.to_string()),
            ExpenseError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ExpenseError::Port(e) => ApiError::from(e),
            ExpenseError::Configuration(message) => ApiError::Internal(message),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, field } => ApiError::Validation { message, field },
            PortError::Conflict { message } => ApiError::Conflict(message),
            PortError::Connection { .. } | PortError::ServiceUnavailable { .. } => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            PortError::Internal { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}
