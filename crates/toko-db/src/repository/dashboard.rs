//! # Dashboard Repository
//!
//! Store-wide totals for the admin landing page.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use toko_core::DashboardSummary;

/// Read-only aggregate queries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    /// Creates a new DashboardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Counts every table and sums sale subtotals in one statement, so the
    /// numbers come from a single snapshot.
    pub async fn summary(&self) -> DbResult<DashboardSummary> {
        let (total_customers, total_products, total_sales, total_revenue): (i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT \
                    (SELECT COUNT(*) FROM customers), \
                    (SELECT COUNT(*) FROM products), \
                    (SELECT COUNT(*) FROM sales), \
                    (SELECT COALESCE(SUM(subtotal), 0) FROM sales)",
            )
            .fetch_one(&self.pool)
            .await?;

        debug!(total_sales, total_revenue, "Dashboard summary computed");

        Ok(DashboardSummary {
            total_customers,
            total_products,
            total_sales,
            total_revenue,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{customer, product, test_db};
    use chrono::NaiveDate;
    use toko_core::sale::{LineItemInput, NewSale};

    #[tokio::test]
    async fn test_empty_store() {
        let db = test_db().await;
        let summary = db.dashboard().summary().await.unwrap();
        assert_eq!(summary.total_sales, 0);
        assert_eq!(summary.total_revenue, 0);
    }

    #[tokio::test]
    async fn test_revenue_is_sum_of_subtotals() {
        let db = test_db().await;
        db.products().create(product("BRG_1", 15_000)).await.unwrap();
        db.products().create(product("BRG_2", 10_000)).await.unwrap();
        db.customers().create(customer("PELANGGAN_1")).await.unwrap();

        let mut expected = 0;
        for (n, qty) in [(1, 2), (2, 5)] {
            let sale = db
                .sales()
                .create(NewSale {
                    id: format!("NOTA_{n}"),
                    date: NaiveDate::from_ymd_opt(2018, 1, n).unwrap(),
                    customer_id: "PELANGGAN_1".into(),
                    items: vec![
                        LineItemInput::new("BRG_1", qty),
                        LineItemInput::new("BRG_2", 1),
                    ],
                })
                .await
                .unwrap();
            expected += sale.subtotal;
        }

        let summary = db.dashboard().summary().await.unwrap();
        assert_eq!(summary.total_customers, 1);
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.total_sales, 2);
        assert_eq!(summary.total_revenue, expected);
        assert_eq!(expected, 40_000 + 85_000);
    }
}
