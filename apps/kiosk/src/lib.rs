//! # Checkout Kiosk
//!
//! Runtime for a self-checkout station: reads the scanner and operator
//! keyboard from stdin, keeps one checkout session, and writes the screen
//! to stdout.
//!
//! ## Module Organization
//! ```text
//! checkout_kiosk/
//! ├── lib.rs       ◄─── You are here (startup & catalog selection)
//! ├── config.rs    ◄─── KioskConfig: TOML + CHECKOUT_* env
//! ├── event.rs     ◄─── KioskEvent, operator commands
//! ├── keyboard.rs  ◄─── stdin listener task
//! ├── ticker.rs    ◄─── ad rotation / toast pruning tasks
//! ├── runtime.rs   ◄─── Kiosk: the event loop that owns the session
//! ├── render.rs    ◄─── text and JSON-lines output
//! └── error.rs     ◄─── KioskError
//! ```
//!
//! ## Startup
//! ```text
//!   KioskConfig::load ──► init_tracing ──► open_catalog ──► Kiosk::run
//!                                             │
//!                     db_path set? ── yes ──► SQLite snapshot
//!                                  └─ no ───► built-in product table
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod keyboard;
pub mod render;
pub mod runtime;
pub mod ticker;

use checkout_core::MemoryCatalog;
use checkout_db::{Database, DbConfig};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use config::{KioskConfig, RenderMode};
pub use error::{KioskError, KioskResult};
pub use event::{Command, KioskEvent};
pub use runtime::Kiosk;

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout stays free for the rendered screen.
/// Respects `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,checkout=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the catalog for a session.
///
/// With `db_path` the SQLite store is read once into memory; the session
/// never touches the database after that. A missing file is an error (the
/// kiosk never creates one); an empty store falls back to the built-in
/// table.
pub async fn open_catalog(config: &KioskConfig) -> KioskResult<MemoryCatalog> {
    let Some(path) = &config.db_path else {
        info!("Using built-in catalog");
        return Ok(MemoryCatalog::seeded());
    };

    if !path.exists() {
        return Err(KioskError::InvalidConfig(format!(
            "catalog database {} does not exist",
            path.display()
        )));
    }

    let db = Database::new(DbConfig::new(path).create_if_missing(false)).await?;
    let catalog = db.products().load_catalog().await;
    db.close().await;
    let catalog = catalog?;

    if catalog.is_empty() {
        warn!(
            path = %path.display(),
            "Catalog database has no products, using built-in catalog"
        );
        return Ok(MemoryCatalog::seeded());
    }

    info!(products = catalog.len(), "Catalog loaded from database");
    Ok(catalog)
}

/// Runs one checkout session against stdin and stdout.
pub async fn run(config: KioskConfig) -> KioskResult<()> {
    info!(
        store = %config.store_name,
        tax_rate = %config.tax_rate(),
        scanner_timeout_ms = config.scanner_timeout_ms,
        render = %config.render,
        "Starting checkout kiosk"
    );

    let catalog = open_catalog(&config).await?;

    let mut kiosk = Kiosk::new(&config, catalog, std::io::stdout());
    kiosk.run(BufReader::new(tokio::io::stdin())).await
}
