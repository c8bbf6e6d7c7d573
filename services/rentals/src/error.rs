//! Custom error types for the rentals service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the rentals service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Input failed validation before any state was touched
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated. The response stays
    /// generic and does not name the constraint.
    #[error("Could not save the customer record")]
    Conflict,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    /// Classify a repository failure: unique violations become the
    /// generic conflict response, everything else is internal.
    pub fn persistence(err: anyhow::Error) -> Self {
        if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
            if db_err.is_unique_violation() {
                return ApiError::Conflict;
            }
        }
        ApiError::InternalServerError
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            ApiError::Conflict => (
                StatusCode::CONFLICT,
                "Could not save the customer record".to_string(),
            ),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for rentals service results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::ErrorKind;
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct DuplicateKeyError;

    impl std::fmt::Display for DuplicateKeyError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl StdError for DuplicateKeyError {}

    impl sqlx::error::DatabaseError for DuplicateKeyError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn test_persistence_maps_unique_violation_to_conflict() {
        let err = anyhow::Error::from(sqlx::Error::Database(Box::new(DuplicateKeyError)));
        assert!(matches!(ApiError::persistence(err), ApiError::Conflict));
    }

    #[test]
    fn test_persistence_defaults_to_internal() {
        let err = anyhow::anyhow!("connection reset");
        assert!(matches!(
            ApiError::persistence(err),
            ApiError::InternalServerError
        ));
    }

    #[test]
    fn test_persistence_keeps_non_database_sqlx_errors_internal() {
        let err = anyhow::Error::from(sqlx::Error::RowNotFound);
        assert!(matches!(
            ApiError::persistence(err),
            ApiError::InternalServerError
        ));
    }
}
