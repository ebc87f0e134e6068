//! # Repository Module
//!
//! SQL lives here and nowhere else.
//!
//! ```text
//!   kiosk startup / seed binary
//!        │  db.products().load_catalog()
//!        ▼
//!   ProductRepository
//!   ├── insert / update / delete
//!   ├── get_by_id / list / search / count
//!   ├── import (batch, per-row report)
//!   └── load_catalog (MemoryCatalog snapshot)
//!        │
//!        ▼
//!   SQLite `products` table
//! ```

pub mod product;
