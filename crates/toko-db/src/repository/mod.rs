//! # Repository Module
//!
//! Stores for each table plus the sale transaction composer.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Repositories                                    │
//! │                                                                         │
//! │  Handler                                                               │
//! │       │  db.sales().create(new_sale)                                   │
//! │       ▼                                                                 │
//! │  SaleRepository ─── one transaction ───┐                               │
//! │  ├── create / update / delete          │ reads customers, products     │
//! │  └── show / list                       │ writes sales, sale_items      │
//! │                                        ▼                               │
//! │  ProductRepository   CustomerRepository   (same table rules, own       │
//! │  ├── list / get / create / update / delete / next_id / count)          │
//! │                                                                         │
//! │  DashboardRepository ── summary (COUNT + SUM)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every lookup that runs inside a transaction takes a
//! `&mut SqliteConnection` so it reuses the transaction's connection rather
//! than asking the pool for another one.
//!
//! Every mutation that reads before it writes opens its transaction through
//! [`begin_write`]. A deferred `BEGIN` would take the write lock only at the
//! first write, and under WAL a commit from another connection in between
//! fails that upgrade with `SQLITE_BUSY` without consulting the busy timeout.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD
//! - [`customer::CustomerRepository`] - Customer registry CRUD
//! - [`sale::SaleRepository`] - Sale composition with line items
//! - [`dashboard::DashboardRepository`] - Store-wide totals

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::DbResult;

pub mod customer;
pub mod dashboard;
pub mod product;
pub mod sale;

#[cfg(test)]
pub(crate) mod test_support;

/// Opens a transaction holding the database write lock from the start.
///
/// Concurrent writers queue on the connection's busy timeout instead of
/// failing, which serializes mutations of the same sale.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    let tx = pool.begin_with("BEGIN IMMEDIATE").await?;
    Ok(tx)
}
