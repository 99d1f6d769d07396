//! PostgreSQL failures and their translation into `PortError`
//!
//! Constraint violations are told apart by SQLSTATE
//! (<https://www.postgresql.org/docs/current/errcodes-appendix.html>) and
//! carry the violated constraint's name when the server reports one.

use thiserror::Error;

use core_kernel::PortError;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Cannot reach the database: {0}")]
    Connect(String),

    /// No connection became free within the acquire timeout
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Row not found")]
    RowNotFound,

    /// SQLSTATE 23505, e.g. an expense id that is already taken
    #[error("Unique violation on {constraint}: {message}")]
    UniqueViolation { constraint: String, message: String },

    /// SQLSTATE 23503, e.g. a child pointing at a missing parent
    #[error("Foreign key violation on {constraint}: {message}")]
    ForeignKeyViolation { constraint: String, message: String },

    /// SQLSTATE 23514, e.g. a negative amount or an installment number past the total
    #[error("Check violation on {constraint}: {message}")]
    CheckViolation { constraint: String, message: String },

    /// SQLSTATE 22003, an amount wider than its NUMERIC(12,2) column
    #[error("Numeric value out of range: {0}")]
    NumericOverflow(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Commit failed: {0}")]
    Transaction(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A stored value has no domain counterpart
    #[error("Invalid {column} value: {reason}")]
    InvalidColumn { column: &'static str, reason: String },
}

impl DatabaseError {
    pub fn invalid_column(column: &'static str, reason: impl Into<String>) -> Self {
        DatabaseError::InvalidColumn {
            column,
            reason: reason.into(),
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::UniqueViolation { .. }
                | DatabaseError::ForeignKeyViolation { .. }
                | DatabaseError::CheckViolation { .. }
        )
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, DatabaseError::Connect(_) | DatabaseError::PoolExhausted)
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::RowNotFound,
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(e) => DatabaseError::Connect(e.to_string()),
            sqlx::Error::Tls(e) => DatabaseError::Connect(e.to_string()),
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::UniqueViolation { constraint, message },
                    Some("23503") => DatabaseError::ForeignKeyViolation { constraint, message },
                    Some("23514") => DatabaseError::CheckViolation { constraint, message },
                    Some("22003") => DatabaseError::NumericOverflow(message),
                    _ => DatabaseError::Query(message),
                }
            }
            other => DatabaseError::Query(other.to_string()),
        }
    }
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::UniqueViolation { message, .. } => PortError::conflict(message),
            DatabaseError::ForeignKeyViolation { message, .. }
            | DatabaseError::CheckViolation { message, .. } => PortError::rejected(message),
            DatabaseError::NumericOverflow(message) => PortError::validation_field(message, "amount"),
            other if other.is_connection_error() => PortError::connection(other.to_string()),
            other => PortError::internal("Database operation failed", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique(constraint: &str) -> DatabaseError {
        DatabaseError::UniqueViolation {
            constraint: constraint.to_string(),
            message: "duplicate key value".to_string(),
        }
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let db = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(db.is_connection_error());

        let port: PortError = db.into();
        assert!(port.is_transient());
    }

    #[test]
    fn test_constraint_violations_map_to_port_variants() {
        let duplicate = unique("expenses_pkey");
        assert!(duplicate.is_constraint_violation());
        assert!(duplicate.to_string().contains("expenses_pkey"));
        assert!(matches!(PortError::from(duplicate), PortError::Conflict { .. }));

        let check = DatabaseError::CheckViolation {
            constraint: "expenses_amount_check".to_string(),
            message: "new row violates check constraint".to_string(),
        };
        assert!(matches!(
            PortError::from(check),
            PortError::Validation { field: None, .. }
        ));
    }

    #[test]
    fn test_numeric_overflow_is_a_client_error() {
        let overflow = DatabaseError::NumericOverflow("numeric field overflow".to_string());
        assert!(!overflow.is_connection_error());
        match PortError::from(overflow) {
            PortError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("amount")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_errors_are_internal() {
        let column: PortError = DatabaseError::invalid_column("payment_method", "boleto").into();
        assert!(matches!(column, PortError::Internal { .. }));

        let missing: PortError = DatabaseError::from(sqlx::Error::RowNotFound).into();
        assert!(matches!(missing, PortError::Internal { .. }));
    }
}
