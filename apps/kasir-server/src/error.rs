//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kasir POS                              │
//! │                                                                         │
//! │  Handler -> Result<T, ApiError>                                         │
//! │       │                                                                 │
//! │       ├── JsonRejection          ──► VALIDATION_ERROR  400              │
//! │       ├── PathRejection (bad id) ──► NOT_FOUND         404              │
//! │       ├── ValidationError        ──► VALIDATION_ERROR  400              │
//! │       ├── CoreError::Duplicate*  ──► CONFLICT          400              │
//! │       ├── CoreError::*NotFound   ──► NOT_FOUND         404              │
//! │       ├── DbError::*             ──► DATABASE_ERROR    500 (logged)     │
//! │       └── anything else          ──► INTERNAL          500 (logged)     │
//! │                                                                         │
//! │  Response body:                                                         │
//! │    {"error": "Product not found: 7", "code": "NOT_FOUND"}               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use kasir_core::{CoreError, ValidationError};
use kasir_db::DbError;

/// API error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Unique name already taken (400)
    Conflict,

    /// Resource not found (404)
    NotFound,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: ErrorCode,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: &self.message,
            code: self.code,
        };

        (status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
///
/// Details of server-side failures are logged, never returned.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                tracing::error!("Database operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::UnsupportedBackend(scheme) => {
                tracing::error!("Unsupported database backend: {}", scheme);
                ApiError::internal("Server misconfigured")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::DuplicateProduct(_) => ApiError::new(ErrorCode::Conflict, err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// A missing or malformed JSON body is a validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::validation(format!("Invalid form body: {}", rejection.body_text()))
    }
}

/// A path id that is not an `i64` names no resource.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("Not found: {}", rejection.body_text()),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            get_status(ApiError::validation("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CoreError::DuplicateProduct("Gula".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CoreError::ProductNotFound(9).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(DbError::QueryFailed("syntax".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(ApiError::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_details_not_exposed() {
        let err: ApiError = DbError::QueryFailed("no such table: products".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("products"));
    }

    #[test]
    fn test_core_error_messages() {
        let err: ApiError = CoreError::DuplicateProduct("Gula 1kg".to_string()).into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "product already exists: Gula 1kg");

        let err: ApiError = CoreError::from(ValidationError::required("total")).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "total is required");
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "Product not found: 7",
            code: ErrorCode::NotFound,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"error": "Product not found: 7", "code": "NOT_FOUND"})
        );
    }
}
