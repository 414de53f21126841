//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Toko API                               │
//! │                                                                         │
//! │  Handler                                                               │
//! │  Result<T, ApiError>                                                   │
//! │       │                                                                 │
//! │       ├── JsonRejection ─────────────────────► VALIDATION_ERROR  422   │
//! │       ├── DbError::Validation ───────────────► VALIDATION_ERROR  422   │
//! │       ├── DbError::UniqueViolation ──────────► DUPLICATE_KEY     422   │
//! │       ├── DbError::MissingReference ─────────► INVALID_REFERENCE 422   │
//! │       ├── DbError::NotFound ─────────────────► NOT_FOUND         404   │
//! │       ├── DbError::ReferentialConflict ──────► CONFLICT          409   │
//! │       ├── request deadline elapsed ──────────► TIMEOUT           408   │
//! │       └── anything else (logged, masked) ────► DATABASE_ERROR    500   │
//! │                                                                         │
//! │  Body: { "success": false, "message": "...", "code": "NOT_FOUND" }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::BoxError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use toko_db::DbError;
use ts_rs::TS;

/// API error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// const res = await fetch('/api/sales', { method: 'POST', body });
/// const body = await res.json();
/// if (!body.success && body.code === 'INVALID_REFERENCE') {
///   showFieldError(body.message);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (422)
    ValidationError,

    /// Identifier already taken (422)
    DuplicateKey,

    /// A referenced customer or product does not exist (422)
    InvalidReference,

    /// Resource not found (404)
    NotFound,

    /// Delete blocked by dependent records (409)
    Conflict,

    /// Request exceeded the configured deadline (408)
    Timeout,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::DuplicateKey | ErrorCode::InvalidReference => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Timeout => StatusCode::REQUEST_TIMEOUT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Body of every failed response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    code: ErrorCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: &self.message,
            code: self.code,
        };
        (self.code.status(), Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::MissingReference { entity, id } => ApiError::new(
                ErrorCode::InvalidReference,
                format!("{} not found: {}", entity, id),
            ),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::DuplicateKey,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ReferentialConflict { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            DbError::Validation(v) => ApiError::validation(v.to_string()),
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                tracing::error!(error = %err, "Database unavailable");
                ApiError::new(ErrorCode::DatabaseError, "Database unavailable")
            }
            DbError::TransactionFailed(_) => {
                tracing::error!(error = %err, "Transaction failed");
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { .. }
            | DbError::QueryFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::Internal(_) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %err, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Malformed or mistyped JSON bodies are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Turns errors raised by the middleware stack into the error envelope.
///
/// Dropping the handler future on timeout also drops any open transaction,
/// which rolls it back.
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request exceeded its deadline");
        ApiError::new(ErrorCode::Timeout, "Request timed out")
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::internal("Internal server error")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use toko_core::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DbError::not_found("Sale", "NOTA_1"), StatusCode::NOT_FOUND),
            (
                DbError::missing_reference("Product", "BRG_99"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DbError::duplicate("id", "NOTA_1"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                DbError::referenced("Product", "BRG_1", "sale items"),
                StatusCode::CONFLICT,
            ),
            (
                DbError::Validation(ValidationError::EmptyItemList),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DbError::QueryFailed("disk I/O error".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).code.status(), status);
        }
    }

    #[test]
    fn test_internal_details_are_masked() {
        let err = ApiError::from(DbError::Internal("secret path /var/db".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("secret"));
    }

    #[tokio::test]
    async fn test_middleware_errors_use_envelope_codes() {
        let err = handle_middleware_error(Box::new(tower::timeout::error::Elapsed::new())).await;
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.code.status(), StatusCode::REQUEST_TIMEOUT);

        let err = handle_middleware_error("layer exploded".into()).await;
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(!err.message.contains("exploded"));
    }

    #[test]
    fn test_error_code_wire_names() {
        let json = serde_json::to_string(&ErrorCode::InvalidReference).unwrap();
        assert_eq!(json, "\"INVALID_REFERENCE\"");
    }
}
