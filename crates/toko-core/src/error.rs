//! # Error Types
//!
//! Domain-specific error types for toko-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  toko-core errors (this file)                                          │
//! │  ├── ErrorKind        - Machine-checkable category of ANY failure      │
//! │  ├── CoreError        - Pure-domain failures                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  toko-db errors (separate crate)                                       │
//! │  └── DbError          - Store / transaction failures                   │
//! │                                                                         │
//! │  toko-api errors (in app)                                              │
//! │  └── ApiError         - What the HTTP client sees                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Error Kind
// =============================================================================

/// The category every failure in the system falls into.
///
/// Callers map kinds to transport status codes; the stores never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input, bad enum value, non-positive quantity.
    Validation,
    /// A referenced identifier does not exist.
    NotFound,
    /// Primary key collision on create.
    DuplicateKey,
    /// Delete blocked by dependent rows.
    ReferentialConflict,
    /// The underlying store failed inside an atomic scope.
    TransactionFailure,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product code does not resolve in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer id does not resolve.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Sale id does not resolve.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_)
            | CoreError::CustomerNotFound(_)
            | CoreError::SaleNotFound(_) => ErrorKind::NotFound,
            CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are detected before any atomic scope is opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (identifier shape, date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A sale must carry at least one line item.
    #[error("items must contain at least one line item")]
    EmptyItemList,

    /// Line item quantity below 1 (or beyond the column range).
    #[error("quantity for {product_code} must be at least 1, got {quantity}")]
    InvalidQuantity { product_code: String, quantity: i64 },

    /// The same product appears on two lines of one sale.
    #[error("product {product_code} appears more than once in items")]
    DuplicateLineItem { product_code: String },

    /// Σ(unit_price × quantity) does not fit the subtotal column.
    #[error("subtotal exceeds the supported range")]
    SubtotalOverflow,
}

impl ValidationError {
    /// Name of the offending input field, for field-keyed error maps.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
            ValidationError::EmptyItemList
            | ValidationError::DuplicateLineItem { .. }
            | ValidationError::SubtotalOverflow => "items",
            ValidationError::InvalidQuantity { .. } => "quantity",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::InvalidQuantity {
            product_code: "BRG_1".to_string(),
            quantity: 0,
        };
        assert_eq!(
            err.to_string(),
            "quantity for BRG_1 must be at least 1, got 0"
        );

        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            CoreError::ProductNotFound("BRG_9".into()).kind(),
            ErrorKind::NotFound
        );
        let core: CoreError = ValidationError::EmptyItemList.into();
        assert_eq!(core.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ValidationError::EmptyItemList.field(), "items");
        let err = ValidationError::TooLong {
            field: "domicile".into(),
            max: 20,
        };
        assert_eq!(err.field(), "domicile");
    }
}
