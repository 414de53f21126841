//! # Product Repository
//!
//! The catalog store: CRUD over the `products` table.
//!
//! ## Delete Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Deleting a Product                                   │
//! │                                                                         │
//! │  delete("BRG_3")                                                       │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  product exists? ──── no ───► NotFound                                 │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  any sale_items row with product_code = BRG_3?                         │
//! │       │                                                                 │
//! │       ├── yes ──► ReferentialConflict (rollback)                       │
//! │       │                                                                 │
//! │       ▼ no                                                              │
//! │  DELETE FROM products ── FK failure? ──► ReferentialConflict           │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use toko_core::identifier;
use toko_core::validation::{validate_product, validate_product_patch};
use toko_core::{Product, ProductPatch, PRODUCT_ID_PREFIX};

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let pen = repo.get("BRG_1").await?;
/// let catalog = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its code.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get(&self, code: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, code).await
    }

    /// Lists the whole catalog in identifier order (`BRG_2` before `BRG_10`).
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let mut products = sqlx::query_as::<_, Product>(
            "SELECT code, name, category, unit_price FROM products",
        )
        .fetch_all(&self.pool)
        .await?;

        identifier::sort_by_id(&mut products, |p| p.code.as_str());
        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// * `Validation` - malformed code, empty name, price out of range
    /// * `UniqueViolation` - the code is taken
    pub async fn create(&self, product: Product) -> DbResult<Product> {
        validate_product(&product)?;

        debug!(code = %product.code, price = product.unit_price, "Inserting product");

        sqlx::query(
            "INSERT INTO products (code, name, category, unit_price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.category)
        .bind(product.unit_price)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("code", &product.code),
            other => other,
        })?;

        Ok(product)
    }

    /// Applies a partial update. The code itself never changes.
    ///
    /// ## Errors
    /// * `NotFound` - no product with this code
    /// * `Validation` - a supplied field is invalid
    pub async fn update(&self, code: &str, patch: ProductPatch) -> DbResult<Product> {
        let mut tx = begin_write(&self.pool).await?;

        let mut product = fetch_product(&mut tx, code)
            .await?
            .ok_or_else(|| DbError::not_found("Product", code))?;
        validate_product_patch(&patch)?;
        product.apply(patch);

        debug!(code = %code, price = product.unit_price, "Updating product");

        sqlx::query("UPDATE products SET name = ?1, category = ?2, unit_price = ?3 WHERE code = ?4")
            .bind(&product.name)
            .bind(product.category)
            .bind(product.unit_price)
            .bind(code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(product)
    }

    /// Deletes a product that no line item references.
    ///
    /// ## Errors
    /// * `NotFound` - no product with this code
    /// * `ReferentialConflict` - at least one sale lists this product
    pub async fn delete(&self, code: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        if fetch_product(&mut tx, code).await?.is_none() {
            return Err(DbError::not_found("Product", code));
        }

        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE product_code = ?1")
                .bind(code)
                .fetch_one(&mut *tx)
                .await?;

        if references > 0 {
            warn!(code = %code, references, "Refusing to delete product still on sales");
            return Err(DbError::referenced("Product", code, "sale items"));
        }

        sqlx::query("DELETE FROM products WHERE code = ?1")
            .bind(code)
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => {
                    DbError::referenced("Product", code, "sale items")
                }
                other => other,
            })?;

        tx.commit().await?;

        debug!(code = %code, "Product deleted");
        Ok(())
    }

    /// Suggests the next free code: `BRG_<highest suffix + 1>`.
    pub async fn next_id(&self) -> DbResult<String> {
        let codes: Vec<String> = sqlx::query_scalar("SELECT code FROM products")
            .fetch_all(&self.pool)
            .await?;

        Ok(identifier::next_id(
            PRODUCT_ID_PREFIX,
            codes.iter().map(String::as_str),
        ))
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Loads one product on an existing connection (pool or transaction).
pub(crate) async fn fetch_product(
    conn: &mut SqliteConnection,
    code: &str,
) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT code, name, category, unit_price FROM products WHERE code = ?1",
    )
    .bind(code)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

// =============================================================================
// Unit Tests
// =============================================================================
