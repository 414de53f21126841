//! # Validation Module
//!
//! Input validation for every record that enters a store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (toko-api)                                              │
//! │  └── Type validation (JSON deserialization, enum names)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Identifier shape and length                                       │
//! │  ├── Text lengths                                                      │
//! │  └── Price / quantity ranges                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── PRIMARY KEY / CHECK constraints                                   │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::identifier;
use crate::types::{Customer, CustomerPatch, Product, ProductPatch};
use crate::{MAX_ID_LEN, MAX_UNSIGNED_AMOUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product or customer name.
pub const MAX_NAME_LEN: usize = 100;

/// Longest customer domicile.
pub const MAX_DOMICILE_LEN: usize = 20;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an identifier (`<PREFIX>_<digits>`, at most 20 characters).
///
/// ## Example
/// ```rust
/// use toko_core::validation::validate_id;
///
/// assert!(validate_id("code", "BRG_1").is_ok());
/// assert!(validate_id("code", "").is_err());
/// assert!(validate_id("code", "BRG-1").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.chars().count() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    let well_formed = identifier::parse(id).is_some_and(|(prefix, _)| {
        prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must look like PREFIX_123".to_string(),
        });
    }

    Ok(())
}

/// Validates a required free-text field with a maximum length.
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a unit price: whole Rupiah, zero allowed (free items).
///
/// ## Example
/// ```rust
/// use toko_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(15_000).is_ok());
/// assert!(validate_unit_price(0).is_ok());
/// assert!(validate_unit_price(-1).is_err());
/// ```
pub fn validate_unit_price(price: i64) -> ValidationResult<()> {
    if !(0..=MAX_UNSIGNED_AMOUNT).contains(&price) {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: MAX_UNSIGNED_AMOUNT,
        });
    }

    Ok(())
}

/// Validates a line-item quantity (at least 1).
pub fn validate_quantity(product_code: &str, quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_UNSIGNED_AMOUNT).contains(&quantity) {
        return Err(ValidationError::InvalidQuantity {
            product_code: product_code.to_string(),
            quantity,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a product before insert.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_id("code", &product.code)?;
    validate_text("name", &product.name, MAX_NAME_LEN)?;
    validate_unit_price(product.unit_price)
}

/// Validates the fields present in a product patch.
pub fn validate_product_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_text("name", name, MAX_NAME_LEN)?;
    }
    if let Some(price) = patch.unit_price {
        validate_unit_price(price)?;
    }
    Ok(())
}

/// Validates a customer before insert.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_id("id", &customer.id)?;
    validate_text("name", &customer.name, MAX_NAME_LEN)?;
    validate_text("domicile", &customer.domicile, MAX_DOMICILE_LEN)
}

/// Validates the fields present in a customer patch.
pub fn validate_customer_patch(patch: &CustomerPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_text("name", name, MAX_NAME_LEN)?;
    }
    if let Some(domicile) = &patch.domicile {
        validate_text("domicile", domicile, MAX_DOMICILE_LEN)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
