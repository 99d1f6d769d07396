//! Port plumbing shared by every storage adapter
//!
//! `domain_expense` declares the port traits; `infra_db` implements them on
//! PostgreSQL and the `mock` feature implements them in memory. Both report
//! failures as [`PortError`] and answer readiness checks with
//! [`HealthCheckResult`].
//!
//! ```text
//!   ExpenseService ──► ExpensePort / ProfilePort ◄── PgExpenseAdapter (infra_db)
//!                                                ◄── MockExpensePort (tests)
//! ```

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a storage adapter
#[derive(Debug, Error)]
pub enum PortError {
    /// No row with that id exists for the requesting user
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    /// The store rejected the values, e.g. a check constraint
    #[error("Invalid data: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// A row with the same key already exists
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Source>,
    },

    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Source>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Rejected data that cannot be tied to one input field
    pub fn rejected(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    pub fn internal<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PortError::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The store could not be reached; the same call may succeed later
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::ServiceUnavailable { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Supertrait of every port, so ports can sit behind `Arc<dyn _>` in
/// shared request state
pub trait DomainPort: Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Unhealthy,
}

/// One adapter's answer to a readiness check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn healthy(adapter_id: impl Into<String>, latency: Duration) -> Self {
        Self::at(adapter_id, AdapterHealth::Healthy, latency, None)
    }

    pub fn unhealthy(
        adapter_id: impl Into<String>,
        latency: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self::at(adapter_id, AdapterHealth::Unhealthy, latency, Some(message.into()))
    }

    fn at(
        adapter_id: impl Into<String>,
        status: AdapterHealth,
        latency: Duration,
        message: Option<String>,
    ) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status,
            latency_ms: u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            message,
            checked_at: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Adapters that can report whether their backing store answers
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = PortError::not_found("Expense", "0191c1a2");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Expense 0191c1a2 not found");
    }

    #[test]
    fn test_transient_errors() {
        assert!(PortError::connection("refused").is_transient());
        assert!(PortError::unavailable("postgres").is_transient());
        assert!(!PortError::conflict("duplicate id").is_transient());
        assert!(!PortError::rejected("amount must be >= 0").is_transient());
    }

    #[test]
    fn test_health_results() {
        let up = HealthCheckResult::healthy("postgres-expense-adapter", Duration::from_millis(3));
        assert!(up.is_healthy());
        assert_eq!(up.latency_ms, 3);
        assert!(up.message.is_none());

        let down = HealthCheckResult::unhealthy("postgres", Duration::ZERO, "pool timed out");
        assert!(!down.is_healthy());
        assert_eq!(down.message.as_deref(), Some("pool timed out"));
    }

    #[test]
    fn test_health_serializes_status_in_snake_case() {
        let json = serde_json::to_value(HealthCheckResult::healthy("mock", Duration::ZERO)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json.get("message").is_none());
    }
}
