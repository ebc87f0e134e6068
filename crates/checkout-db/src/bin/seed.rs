//! # Catalog Seeder
//!
//! Loads the kiosk's built-in product table into a catalog database.
//!
//! ## Usage
//! ```bash
//! # Seed ./checkout_dev.db
//! cargo run -p checkout-db --bin seed
//!
//! # Specify database path
//! cargo run -p checkout-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! An already populated database is left alone.

use std::env;

use checkout_core::catalog::seed_products;
use checkout_core::ImportSource;
use checkout_db::{Database, DbConfig, NewProduct};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./checkout_dev.db");

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
                println!("Checkout Kiosk Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./checkout_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("Checkout Kiosk Catalog Seeder");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    let rows: Vec<NewProduct> = seed_products().into_iter().map(NewProduct::from).collect();
    let report = db.products().import(rows, ImportSource::Manual).await;

    println!();
    println!("✓ Imported {} products", report.imported);
    for error in &report.errors {
        println!("  ✗ row {}: {}", error.row, error.message);
    }

    let hits = db.products().search("organic", 10).await?;
    println!("  Search 'organic': {} results", hits.len());

    db.close().await;

    println!();
    if report.success() {
        println!("✓ Seed complete!");
    } else {
        println!("⚠ Seed finished with {} failed rows", report.failed);
    }

    Ok(())
}
