//! # Reference Data
//!
//! The demo data set the admin front-end is developed against: ten
//! products, ten customers and ten sales.
//!
//! Everything goes through the public stores, so every seeded subtotal is
//! computed by the composer (`NOTA_1` comes out at 50.000).

use chrono::NaiveDate;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use toko_core::sale::{LineItemInput, NewSale};
use toko_core::{Category, Customer, Gender, Product};

/// Catalog: (code, name, category, unit price).
const PRODUCTS: &[(&str, &str, Category, i64)] = &[
    ("BRG_1", "PEN", Category::Atk, 15_000),
    ("BRG_2", "PENSIL", Category::Atk, 10_000),
    ("BRG_3", "PAYUNG", Category::Rt, 70_000),
    ("BRG_4", "PANCI", Category::Masak, 110_000),
    ("BRG_5", "SAPU", Category::Rt, 40_000),
    ("BRG_6", "KIPAS", Category::Elektronik, 200_000),
    ("BRG_7", "KUALI", Category::Masak, 120_000),
    ("BRG_8", "SIKAT", Category::Rt, 30_000),
    ("BRG_9", "GELAS", Category::Rt, 25_000),
    ("BRG_10", "PIRING", Category::Rt, 35_000),
];

/// Customers: (id, name, domicile, gender).
const CUSTOMERS: &[(&str, &str, &str, Gender)] = &[
    ("PELANGGAN_1", "ANDI", "JAK-UT", Gender::Pria),
    ("PELANGGAN_2", "BUDI", "JAK-BAR", Gender::Pria),
    ("PELANGGAN_3", "JOHAN", "JAK-SEL", Gender::Pria),
    ("PELANGGAN_4", "SINTHA", "JAK-TIM", Gender::Wanita),
    ("PELANGGAN_5", "ANTO", "JAK-UT", Gender::Pria),
    ("PELANGGAN_6", "BUJANG", "JAK-BAR", Gender::Pria),
    ("PELANGGAN_7", "JOWAN", "JAK-SEL", Gender::Pria),
    ("PELANGGAN_8", "SINTIA", "JAK-TIM", Gender::Wanita),
    ("PELANGGAN_9", "BUTET", "JAK-BAR", Gender::Wanita),
    ("PELANGGAN_10", "JONNY", "JAK-SEL", Gender::Pria),
];

/// Sales: (id, date, customer, [(product, quantity)]).
#[allow(clippy::type_complexity)]
const SALES: &[(&str, (i32, u32, u32), &str, &[(&str, i64)])] = &[
    ("NOTA_1", (2018, 1, 1), "PELANGGAN_1", &[("BRG_1", 2), ("BRG_2", 2)]),
    ("NOTA_2", (2018, 1, 1), "PELANGGAN_2", &[("BRG_6", 1)]),
    ("NOTA_3", (2018, 1, 1), "PELANGGAN_3", &[("BRG_4", 1), ("BRG_6", 1), ("BRG_7", 1)]),
    ("NOTA_4", (2018, 1, 2), "PELANGGAN_7", &[("BRG_9", 2), ("BRG_10", 2)]),
    ("NOTA_5", (2018, 1, 2), "PELANGGAN_4", &[("BRG_3", 1)]),
    ("NOTA_6", (2018, 1, 3), "PELANGGAN_8", &[("BRG_3", 1), ("BRG_5", 1), ("BRG_7", 1)]),
    (
        "NOTA_7",
        (2018, 1, 3),
        "PELANGGAN_9",
        &[("BRG_5", 1), ("BRG_6", 1), ("BRG_7", 1), ("BRG_8", 1)],
    ),
    ("NOTA_8", (2018, 1, 3), "PELANGGAN_5", &[("BRG_5", 1), ("BRG_9", 1)]),
    ("NOTA_9", (2018, 1, 4), "PELANGGAN_2", &[("BRG_5", 1)]),
    ("NOTA_10", (2018, 2, 1), "PELANGGAN_1", &[("BRG_5", 10)]),
];

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The reference data was inserted.
    Seeded {
        products: usize,
        customers: usize,
        sales: usize,
    },
    /// The database already held data; nothing was touched.
    Skipped,
}

/// Loads the reference data into an empty database.
///
/// ## When This Skips
/// Any existing product, customer or sale makes this a no-op, so running it
/// on every server start is safe.
pub async fn seed_reference_data(db: &Database) -> DbResult<SeedOutcome> {
    let summary = db.dashboard().summary().await?;
    if summary.total_products + summary.total_customers + summary.total_sales > 0 {
        info!(
            products = summary.total_products,
            customers = summary.total_customers,
            sales = summary.total_sales,
            "Database not empty, skipping seed"
        );
        return Ok(SeedOutcome::Skipped);
    }

    for &(code, name, category, unit_price) in PRODUCTS {
        db.products()
            .create(Product {
                code: code.to_string(),
                name: name.to_string(),
                category,
                unit_price,
            })
            .await?;
    }

    for &(id, name, domicile, gender) in CUSTOMERS {
        db.customers()
            .create(Customer {
                id: id.to_string(),
                name: name.to_string(),
                domicile: domicile.to_string(),
                gender,
            })
            .await?;
    }

    for &(id, (year, month, day), customer_id, items) in SALES {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DbError::Internal(format!("bad seed date for {id}")))?;

        db.sales()
            .create(NewSale {
                id: id.to_string(),
                date,
                customer_id: customer_id.to_string(),
                items: items
                    .iter()
                    .map(|&(code, quantity)| LineItemInput::new(code, quantity))
                    .collect(),
            })
            .await?;
    }

    info!(
        products = PRODUCTS.len(),
        customers = CUSTOMERS.len(),
        sales = SALES.len(),
        "Reference data seeded"
    );

    Ok(SeedOutcome::Seeded {
        products: PRODUCTS.len(),
        customers: CUSTOMERS.len(),
        sales: SALES.len(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;

    #[tokio::test]
    async fn test_seed_computes_reference_subtotals() {
        let db = test_db().await;

        let outcome = seed_reference_data(&db).await.unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Seeded {
                products: 10,
                customers: 10,
                sales: 10
            }
        );

        let expected = [
            ("NOTA_1", 50_000),
            ("NOTA_2", 200_000),
            ("NOTA_3", 430_000),
            ("NOTA_4", 120_000),
            ("NOTA_5", 70_000),
            ("NOTA_6", 230_000),
            ("NOTA_7", 390_000),
            ("NOTA_8", 65_000),
            ("NOTA_9", 40_000),
            ("NOTA_10", 400_000),
        ];
        let sales = db.sales().list().await.unwrap();
        let actual: Vec<(&str, i64)> = sales.iter().map(|s| (s.id.as_str(), s.subtotal)).collect();
        assert_eq!(actual, expected);

        let summary = db.dashboard().summary().await.unwrap();
        assert_eq!(summary.total_revenue, expected.iter().map(|(_, s)| s).sum::<i64>());
    }

    #[tokio::test]
    async fn test_seed_skips_non_empty_database() {
        let db = test_db().await;
        seed_reference_data(&db).await.unwrap();
        assert_eq!(seed_reference_data(&db).await.unwrap(), SeedOutcome::Skipped);
        assert_eq!(db.sales().count().await.unwrap(), 10);
    }
}
