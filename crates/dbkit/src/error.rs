//! Error types for dbkit

use thiserror::Error;

/// Result type alias for dbkit operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum DbError {
    /// The connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server refused to prepare the statement
    #[error("Prepare error for `{sql}`: {source}")]
    Prepare {
        sql: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Statement execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/normalization error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Caller contract violation detected before anything reached the server
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed connection options
    #[error("Config error: {0}")]
    Config(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Wrap a failed `prepare` call, keeping the offending SQL.
    pub fn prepare(sql: impl Into<String>, source: tokio_postgres::Error) -> Self {
        Self::Prepare {
            sql: sql.into(),
            source,
        }
    }

    /// Parse a tokio_postgres error into a more specific DbError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_helpers() {
        let err = DbError::validation("empty SET clause");
        assert!(err.is_validation());
        assert!(!err.is_unique_violation());
        assert_eq!(err.to_string(), "Validation error: empty SET clause");
    }

    #[test]
    fn decode_message_names_column() {
        let err = DbError::decode("price", "unsupported type numeric");
        assert_eq!(
            err.to_string(),
            "Decode error on column 'price': unsupported type numeric"
        );
    }
}
