//! Fixtures shared by the repository tests.

use crate::pool::{Database, DbConfig};
use tempfile::TempDir;
use toko_core::{Category, Customer, Gender, Product};

/// Fresh migrated in-memory database.
pub(crate) async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Migrated WAL database in `dir` with a pool of several connections, for
/// tests where writers actually contend.
pub(crate) async fn file_db(dir: &TempDir) -> Database {
    Database::new(DbConfig::new(dir.path().join("toko.db")).max_connections(5))
        .await
        .expect("file-backed database")
}

pub(crate) fn product(code: &str, unit_price: i64) -> Product {
    Product {
        code: code.to_string(),
        name: format!("PRODUCT {code}"),
        category: Category::Atk,
        unit_price,
    }
}

pub(crate) fn customer(id: &str) -> Customer {
    Customer {
        id: id.to_string(),
        name: format!("CUSTOMER {id}"),
        domicile: "JAK-UT".to_string(),
        gender: Gender::Pria,
    }
}
