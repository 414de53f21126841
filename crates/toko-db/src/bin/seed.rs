//! # Seed Data Loader
//!
//! Fills an empty database with the reference catalog, customers and sales.
//!
//! ## Usage
//! ```bash
//! # Default database path
//! cargo run -p toko-db --bin seed
//!
//! # Specify database path
//! cargo run -p toko-db --bin seed -- --db ./data/toko.db
//! ```

use std::env;
use tracing_subscriber::EnvFilter;

use toko_db::seed::{seed_reference_data, SeedOutcome};
use toko_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./data/toko.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Toko Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/toko.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;

    match seed_reference_data(&db).await? {
        SeedOutcome::Seeded {
            products,
            customers,
            sales,
        } => {
            println!("✓ Seeded {db_path}: {products} products, {customers} customers, {sales} sales");
        }
        SeedOutcome::Skipped => {
            println!("⚠ {db_path} already has data; delete the file to reseed");
        }
    }

    db.close().await;
    Ok(())
}
