//! # Sale Composition
//!
//! The pure half of the sale transaction: request shapes, item-list rules,
//! and the subtotal. The stores in `toko-db` wrap this in a transaction.
//!
//! ## Create Flow
//! ```text
//! NewSale { id, date, customer_id, items[] }
//!      │
//!      ▼
//! validate()                      ← before any transaction opens
//!      ├── id shape
//!      ├── items non-empty        → EmptyItemList
//!      ├── quantity ≥ 1           → InvalidQuantity
//!      └── product codes unique   → DuplicateLineItem
//!      │
//!      ▼
//! compute_subtotal(items, price_of)
//!      ├── unknown product        → ProductNotFound
//!      └── Σ unit_price × qty     (checked, exact)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_id, validate_quantity, ValidationResult};

// =============================================================================
// Request Types
// =============================================================================

/// One requested line: a product reference and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemInput {
    pub product_code: String,
    pub quantity: i64,
}

impl LineItemInput {
    pub fn new(product_code: impl Into<String>, quantity: i64) -> Self {
        LineItemInput {
            product_code: product_code.into(),
            quantity,
        }
    }
}

/// A request to create a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub customer_id: String,
    pub items: Vec<LineItemInput>,
}

impl NewSale {
    /// Checks everything that can be checked without the database.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_id("id", &self.id)?;
        validate_id("customer_id", &self.customer_id)?;
        validate_items(&self.items)
    }
}

/// A partial update of a sale.
///
/// `items`, when present, REPLACES the whole item set and triggers a
/// subtotal recompute. When absent the items and subtotal are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalePatch {
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<LineItemInput>>,
}

impl SalePatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(customer_id) = &self.customer_id {
            validate_id("customer_id", customer_id)?;
        }
        if let Some(items) = &self.items {
            validate_items(items)?;
        }
        Ok(())
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.customer_id.is_none() && self.items.is_none()
    }
}

// =============================================================================
// Item Rules
// =============================================================================

/// Validates a requested item list.
///
/// A product may appear on at most one line; repeating it is rejected
/// rather than merged.
pub fn validate_items(items: &[LineItemInput]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::EmptyItemList);
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        validate_id("product_code", &item.product_code)?;
        validate_quantity(&item.product_code, item.quantity)?;
        if !seen.insert(item.product_code.as_str()) {
            return Err(ValidationError::DuplicateLineItem {
                product_code: item.product_code.clone(),
            });
        }
    }

    Ok(())
}

/// Computes Σ(unit_price × quantity) over `items`.
///
/// `price_of` resolves a product code to its current unit price; `None`
/// means the product does not exist. Arithmetic is exact and checked.
///
/// ## Example
/// ```rust
/// use toko_core::money::Money;
/// use toko_core::sale::{compute_subtotal, LineItemInput};
///
/// let items = vec![LineItemInput::new("BRG_1", 2), LineItemInput::new("BRG_2", 2)];
/// let subtotal = compute_subtotal(&items, |code| match code {
///     "BRG_1" => Some(Money::from_rupiah(15_000)),
///     "BRG_2" => Some(Money::from_rupiah(10_000)),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(subtotal.rupiah(), 50_000);
/// ```
pub fn compute_subtotal<F>(items: &[LineItemInput], mut price_of: F) -> CoreResult<Money>
where
    F: FnMut(&str) -> Option<Money>,
{
    let mut subtotal = Money::zero();

    for item in items {
        let price = price_of(&item.product_code)
            .ok_or_else(|| CoreError::ProductNotFound(item.product_code.clone()))?;

        subtotal = price
            .checked_mul_quantity(item.quantity)
            .and_then(|line| subtotal.checked_add(line))
            .ok_or(ValidationError::SubtotalOverflow)?;
    }

    Ok(subtotal)
}

// =============================================================================
// Unit Tests
// =============================================================================
