//! # toko-core: Pure Business Logic for Toko
//!
//! This crate holds the domain of the Toko retail backend as pure functions
//! and plain types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Toko Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Admin SPA (React)                            │   │
//! │  │    Dashboard ──► Pelanggan ──► Barang ──► Penjualan             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    toko-api (axum)                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ toko-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ identifier│  │   sale    │  │   │
//! │  │   │  Product  │  │   Money   │  │  ordering │  │ subtotal  │  │   │
//! │  │   │   Sale    │  │           │  │  next_id  │  │ items     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    toko-db (Database Layer)                     │   │
//! │  │        SQLite stores, sale transaction composer, migrations     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Product, Customer, Sale, LineItem) and read models
//! - [`money`] - Integer Rupiah amounts with checked arithmetic
//! - [`identifier`] - `<PREFIX>_<n>` identifiers, list ordering, next id
//! - [`sale`] - Sale requests and subtotal composition
//! - [`validation`] - Field-level input validation
//! - [`error`] - Domain error types and the machine-checkable [`ErrorKind`]
//!
//! ## Example Usage
//!
//! ```rust
//! use toko_core::money::Money;
//! use toko_core::sale::{compute_subtotal, LineItemInput};
//!
//! let items = vec![LineItemInput::new("BRG_1", 2)];
//! let subtotal = compute_subtotal(&items, |code| {
//!     (code == "BRG_1").then(|| Money::from_rupiah(15_000))
//! })
//! .unwrap();
//!
//! assert_eq!(subtotal.rupiah(), 30_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod identifier;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Identifier prefix for products (`BRG_1`, `BRG_2`, ...).
pub const PRODUCT_ID_PREFIX: &str = "BRG";

/// Identifier prefix for customers (`PELANGGAN_1`, ...).
pub const CUSTOMER_ID_PREFIX: &str = "PELANGGAN";

/// Identifier prefix for sales (`NOTA_1`, ...).
pub const SALE_ID_PREFIX: &str = "NOTA";

/// Maximum length of any entity identifier (column width in the schema).
pub const MAX_ID_LEN: usize = 20;

/// Upper bound for unit prices and quantities.
///
/// Both columns are unsigned 32-bit in the reference schema.
pub const MAX_UNSIGNED_AMOUNT: i64 = u32::MAX as i64;
