//! # checkout-db: Catalog Store for the Checkout Kiosk
//!
//! SQLite storage for the product catalog, using sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  seed binary / back-office import          kiosk startup               │
//! │       │ insert, import                          │ load_catalog          │
//! │       ▼                                         ▼                       │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  checkout-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ ProductRepo   │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                         │                       │
//! │       ▼                                         ▼                       │
//! │  SQLite file (WAL)                   checkout_core::MemoryCatalog      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The kiosk never queries SQLite per scan: the catalog is snapshotted into
//! memory once per run.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("catalog.db")).await?;
//! let catalog = db.products().load_catalog().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::product::{
    CatalogRecord, ImportReport, ImportRowError, NewProduct, ProductRepository,
};
