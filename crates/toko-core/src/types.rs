//! # Domain Types
//!
//! Entities and read models used throughout Toko.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Sale       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (PK)        │◄──│  customer_id    │   │  code (PK)      │       │
//! │  │  name           │   │  id (PK)        │   │  name           │       │
//! │  │  domicile       │   │  date           │   │  category       │       │
//! │  │  gender         │   │  subtotal       │   │  unit_price     │       │
//! │  └─────────────────┘   └────────▲────────┘   └────────▲────────┘       │
//! │                                 │ owns (cascade)      │ references     │
//! │                        ┌────────┴─────────────────────┴───┐            │
//! │                        │  LineItem (sale_id, product_code) │            │
//! │                        │  quantity                         │            │
//! │                        └───────────────────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are human-assigned (`BRG_1`, `PELANGGAN_1`, `NOTA_1`); see
//! [`crate::identifier`] for how they order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Alat tulis kantor (stationery).
    Atk,
    /// Rumah tangga (household).
    Rt,
    /// Kitchenware.
    Masak,
    /// Electronics.
    Elektronik,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Atk,
        Category::Rt,
        Category::Masak,
        Category::Elektronik,
    ];

    /// Wire/database name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Atk => "ATK",
            Category::Rt => "RT",
            Category::Masak => "MASAK",
            Category::Elektronik => "ELEKTRONIK",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Gender
// =============================================================================

/// Customer gender as recorded at the till.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Pria,
    Wanita,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Pria, Gender::Wanita];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Gender::Pria => "PRIA",
            Gender::Wanita => "WANITA",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "gender".to_string(),
                allowed: Gender::ALL.iter().map(|g| g.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Business key, e.g. `BRG_1`.
    pub code: String,
    pub name: String,
    pub category: Category,
    /// Whole Rupiah, never negative.
    pub unit_price: i64,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_rupiah(self.unit_price)
    }

    /// Applies the fields present in `patch`.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
    }
}

/// Partial update of a product. The code is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub unit_price: Option<i64>,
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Business key, e.g. `PELANGGAN_1`.
    pub id: String,
    pub name: String,
    /// Town of residence.
    pub domicile: String,
    pub gender: Gender,
}

impl Customer {
    /// Applies the fields present in `patch`.
    pub fn apply(&mut self, patch: CustomerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(domicile) = patch.domicile {
            self.domicile = domicile;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
    }
}

/// Partial update of a customer. The id is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domicile: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale header as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    /// Business key, e.g. `NOTA_1`.
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub customer_id: String,
    /// Σ(unit_price × quantity) over the items, computed server-side.
    pub subtotal: i64,
}

impl Sale {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_rupiah(self.subtotal)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One (product, quantity) entry of a sale.
///
/// Identified by the pair (`sale_id`, `product_code`); there is no
/// single-column key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LineItem {
    pub sale_id: String,
    pub product_code: String,
    pub quantity: i64,
}

/// A line item joined to its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemDetail {
    pub sale_id: String,
    pub product_code: String,
    pub quantity: i64,
    pub product: Product,
}

impl LineItemDetail {
    /// unit_price × quantity for this line.
    pub fn line_total(&self) -> Money {
        Money::from_rupiah(self.product.unit_price.saturating_mul(self.quantity))
    }
}

/// A sale with its customer and line items attached.
///
/// This is what every composer operation returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub customer_id: String,
    pub subtotal: i64,
    pub customer: Customer,
    pub items: Vec<LineItemDetail>,
}

impl SaleDetail {
    /// Attaches customer and items to a header.
    pub fn compose(sale: Sale, customer: Customer, items: Vec<LineItemDetail>) -> Self {
        SaleDetail {
            id: sale.id,
            date: sale.date,
            customer_id: sale.customer_id,
            subtotal: sale.subtotal,
            customer,
            items,
        }
    }

    /// The header fields alone.
    pub fn header(&self) -> Sale {
        Sale {
            id: self.id.clone(),
            date: self.date,
            customer_id: self.customer_id.clone(),
            subtotal: self.subtotal,
        }
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Store-wide totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub total_customers: i64,
    pub total_products: i64,
    pub total_sales: i64,
    /// Σ subtotal over all sales.
    pub total_revenue: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
