//! # Sale Repository
//!
//! The sale transaction composer: a header, its line items and the
//! server-computed subtotal, written all-or-nothing.
//!
//! ## Create Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Composing a Sale                                  │
//! │                                                                         │
//! │  NewSale::validate()        ← no connection touched yet                │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  id already used?  ──────────────────────► UniqueViolation             │
//! │  customer exists?  ── no ────────────────► MissingReference            │
//! │  every product exists? ── no ────────────► MissingReference            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  subtotal = Σ unit_price × quantity (checked)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT sales ─► INSERT sale_items × n                                 │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! │  SaleDetail { customer, items[ { product } ] }                         │
//! │                                                                         │
//! │  Any `?` between BEGIN and COMMIT drops the transaction guard,         │
//! │  which rolls everything back.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Item Replacement
//! An update that carries `items` deletes every existing line of the sale and
//! inserts the new list, then recomputes the subtotal from current prices.
//! An update without `items` leaves lines and subtotal exactly as they were.

use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use crate::repository::customer::fetch_customer;
use crate::repository::product::fetch_product;
use toko_core::identifier;
use toko_core::sale::{compute_subtotal, LineItemInput, NewSale, SalePatch};
use toko_core::{
    Category, Customer, LineItemDetail, Money, Product, Sale, SaleDetail, SALE_ID_PREFIX,
};

/// A line item joined to its product, as read back from SQLite.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    sale_id: String,
    product_code: String,
    quantity: i64,
    name: String,
    category: Category,
    unit_price: i64,
}

impl From<ItemRow> for LineItemDetail {
    fn from(row: ItemRow) -> Self {
        LineItemDetail {
            sale_id: row.sale_id,
            product: Product {
                code: row.product_code.clone(),
                name: row.name,
                category: row.category,
                unit_price: row.unit_price,
            },
            product_code: row.product_code,
            quantity: row.quantity,
        }
    }
}

const ITEM_ROWS: &str = "SELECT si.sale_id, si.product_code, si.quantity, \
            p.name, p.category, p.unit_price \
     FROM sale_items si \
     INNER JOIN products p ON p.code = si.product_code";

/// Repository composing and reading sales.
///
/// ## Usage
/// ```rust,ignore
/// let sale = db.sales().create(NewSale {
///     id: "NOTA_1".into(),
///     date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
///     customer_id: "PELANGGAN_1".into(),
///     items: vec![LineItemInput::new("BRG_1", 2)],
/// }).await?;
/// assert_eq!(sale.subtotal, 30_000);
/// ```
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Creates a sale with its line items in one transaction.
    ///
    /// ## Errors
    /// * `Validation` - bad id, empty item list, quantity < 1, repeated
    ///   product, subtotal overflow
    /// * `UniqueViolation` - the sale id is taken
    /// * `MissingReference` - unknown customer or product
    pub async fn create(&self, new: NewSale) -> DbResult<SaleDetail> {
        new.validate()?;

        let mut tx = begin_write(&self.pool).await?;

        if fetch_header(&mut tx, &new.id).await?.is_some() {
            return Err(DbError::duplicate("id", &new.id));
        }

        ensure_customer(&mut tx, &new.customer_id).await?;
        let subtotal = price_items(&mut tx, &new.items).await?;

        debug!(
            id = %new.id,
            customer = %new.customer_id,
            items = new.items.len(),
            subtotal = subtotal.rupiah(),
            "Inserting sale"
        );

        sqlx::query("INSERT INTO sales (id, date, customer_id, subtotal) VALUES (?1, ?2, ?3, ?4)")
            .bind(&new.id)
            .bind(new.date)
            .bind(&new.customer_id)
            .bind(subtotal.rupiah())
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("id", &new.id),
                other => other,
            })?;

        insert_items(&mut tx, &new.id, &new.items).await?;

        let detail = load_detail(&mut tx, &new.id)
            .await?
            .ok_or_else(|| DbError::Internal(format!("sale {} vanished before commit", new.id)))?;

        tx.commit().await?;

        info!(id = %detail.id, subtotal = detail.subtotal, "Sale created");
        Ok(detail)
    }

    /// Patches a sale; `items`, when present, replaces the whole item set.
    ///
    /// ## Errors
    /// * `NotFound` - no sale with this id
    /// * `Validation` - as for create, for the supplied fields
    /// * `MissingReference` - the new customer or a new product is unknown
    pub async fn update(&self, id: &str, patch: SalePatch) -> DbResult<SaleDetail> {
        let mut tx = begin_write(&self.pool).await?;

        // A missing sale answers NotFound before the patch is judged.
        let mut sale = fetch_header(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;
        patch.validate()?;

        if let Some(date) = patch.date {
            sale.date = date;
        }

        if let Some(customer_id) = patch.customer_id {
            ensure_customer(&mut tx, &customer_id).await?;
            sale.customer_id = customer_id;
        }

        if let Some(items) = &patch.items {
            let subtotal = price_items(&mut tx, items).await?;

            debug!(id = %id, items = items.len(), subtotal = subtotal.rupiah(), "Replacing sale items");

            sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_items(&mut tx, id, items).await?;

            sale.subtotal = subtotal.rupiah();
        }

        sqlx::query("UPDATE sales SET date = ?1, customer_id = ?2, subtotal = ?3 WHERE id = ?4")
            .bind(sale.date)
            .bind(&sale.customer_id)
            .bind(sale.subtotal)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let detail = load_detail(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::Internal(format!("sale {id} vanished before commit")))?;

        tx.commit().await?;

        info!(id = %id, subtotal = detail.subtotal, "Sale updated");
        Ok(detail)
    }

    /// Deletes a sale together with its items.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        if fetch_header(&mut tx, id).await?.is_none() {
            return Err(DbError::not_found("Sale", id));
        }

        let items = sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id = %id, items, "Sale deleted");
        Ok(())
    }

    /// Loads one sale with customer and items attached.
    pub async fn show(&self, id: &str) -> DbResult<SaleDetail> {
        let mut conn = self.pool.acquire().await?;
        load_detail(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Lists every sale, composed, in identifier order.
    ///
    /// Three queries regardless of the number of sales: headers, customers,
    /// and all item rows.
    pub async fn list(&self) -> DbResult<Vec<SaleDetail>> {
        let mut conn = self.pool.acquire().await?;

        let mut headers =
            sqlx::query_as::<_, Sale>("SELECT id, date, customer_id, subtotal FROM sales")
                .fetch_all(&mut *conn)
                .await?;
        identifier::sort_by_id(&mut headers, |s| s.id.as_str());

        let customers: HashMap<String, Customer> = sqlx::query_as::<_, Customer>(
            "SELECT id, name, domicile, gender FROM customers \
             WHERE id IN (SELECT customer_id FROM sales)",
        )
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect();

        let mut items: HashMap<String, Vec<LineItemDetail>> = HashMap::new();
        let rows = sqlx::query_as::<_, ItemRow>(&format!("{ITEM_ROWS} ORDER BY si.rowid"))
            .fetch_all(&mut *conn)
            .await?;
        for row in rows {
            items
                .entry(row.sale_id.clone())
                .or_default()
                .push(row.into());
        }

        headers
            .into_iter()
            .map(|sale| {
                let customer = customers.get(&sale.customer_id).cloned().ok_or_else(|| {
                    DbError::Internal(format!("sale {} has no customer row", sale.id))
                })?;
                let lines = items.remove(&sale.id).unwrap_or_default();
                Ok(SaleDetail::compose(sale, customer, lines))
            })
            .collect()
    }

    /// Suggests the next free id: `NOTA_<highest suffix + 1>`.
    pub async fn next_id(&self) -> DbResult<String> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM sales")
            .fetch_all(&self.pool)
            .await?;

        Ok(identifier::next_id(
            SALE_ID_PREFIX,
            ids.iter().map(String::as_str),
        ))
    }

    /// Number of recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

async fn fetch_header(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(
        "SELECT id, date, customer_id, subtotal FROM sales WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(sale)
}

async fn ensure_customer(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    match fetch_customer(conn, id).await? {
        Some(_) => Ok(()),
        None => Err(DbError::missing_reference("Customer", id)),
    }
}

/// Resolves every product's current price and sums the lines.
async fn price_items(conn: &mut SqliteConnection, items: &[LineItemInput]) -> DbResult<Money> {
    let mut prices = HashMap::with_capacity(items.len());
    for item in items {
        if let Some(product) = fetch_product(conn, &item.product_code).await? {
            prices.insert(product.code.clone(), product.price());
        }
    }

    let subtotal = compute_subtotal(items, |code| prices.get(code).copied())?;
    Ok(subtotal)
}

async fn insert_items(
    conn: &mut SqliteConnection,
    sale_id: &str,
    items: &[LineItemInput],
) -> DbResult<()> {
    for item in items {
        sqlx::query("INSERT INTO sale_items (sale_id, product_code, quantity) VALUES (?1, ?2, ?3)")
            .bind(sale_id)
            .bind(&item.product_code)
            .bind(item.quantity)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn load_detail(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<SaleDetail>> {
    let Some(sale) = fetch_header(conn, id).await? else {
        return Ok(None);
    };

    let customer = fetch_customer(conn, &sale.customer_id)
        .await?
        .ok_or_else(|| DbError::Internal(format!("sale {id} has no customer row")))?;

    let items = sqlx::query_as::<_, ItemRow>(&format!(
        "{ITEM_ROWS} WHERE si.sale_id = ?1 ORDER BY si.rowid"
    ))
    .bind(id)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(LineItemDetail::from)
    .collect();

    Ok(Some(SaleDetail::compose(sale, customer, items)))
}

// =============================================================================
// Unit Tests
// =============================================================================
