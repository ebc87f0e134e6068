//! # checkout-core: Pure Business Logic for the Checkout Kiosk
//!
//! This crate is the **heart** of the self-checkout kiosk. It contains the
//! scanner decoder and the cart engine as pure reducers with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Kiosk Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Kiosk Runtime (apps/kiosk)                   │   │
//! │  │   keyboard listener ──► event loop ◄── ad / toast tickers       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ one event at a time                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ checkout-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  scanner  │  │   cart    │  │  catalog  │  │  session  │  │   │
//! │  │   │ KeyEvent  │─►│ CartLine  │◄─│  Catalog  │  │ reducer   │  │   │
//! │  │   │ ScanEvent │  │ totals    │  │  lookup   │  │ glue      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TIMERS • PURE REDUCERS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 checkout-db (Catalog Store)                     │   │
//! │  │              SQLite products, migrations, import                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, TaxRate)
//! - [`money`] - Integer-cent amounts and tax rounding
//! - [`error`] - `CoreError`, `ValidationError`
//! - [`validation`] - Catalog input validation
//! - [`scanner`] - Keystroke-timing barcode decoder
//! - [`catalog`] - Read-only product lookup
//! - [`cart`] - Cart reconciliation and totals
//! - [`notification`] - Transient toast queue
//! - [`carousel`] - Ad rotation state
//! - [`recommendation`] - Recommendation panel entries
//! - [`session`] - One checkout session tying it all together
//!
//! ## Example Usage
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use checkout_core::scanner::{Key, KeyEvent, ScanDecoder};
//!
//! let mut decoder = ScanDecoder::default();
//! let t0 = Instant::now();
//! let ms = |n| t0 + Duration::from_millis(n);
//!
//! assert!(decoder.feed(KeyEvent::new(Key::Char('4'), ms(0))).is_none());
//! assert!(decoder.feed(KeyEvent::new(Key::Char('2'), ms(5))).is_none());
//! let scan = decoder.feed(KeyEvent::new(Key::Enter, ms(10))).unwrap();
//! assert_eq!(scan.barcode(), "42");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod notification;
pub mod recommendation;
pub mod scanner;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::{Cart, CartEvent, CartLine, CartLineView, CartView};
pub use catalog::{Catalog, MemoryCatalog};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use scanner::{Key, KeyEvent, ScanDecoder, ScanEvent, ScannerConfig};
pub use session::{CheckoutSession, SessionConfig, SessionView};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default sales tax applied to the cart subtotal: 10%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Default maximum gap between scanner keystrokes, in milliseconds.
///
/// Hardware scanners emit digits far faster than this; humans rarely do.
pub const DEFAULT_SCANNER_TIMEOUT_MS: u64 = 50;

/// How many toast notifications stay on screen at once.
pub const NOTIFICATION_CAPACITY: usize = 5;

/// Default toast lifetime, in milliseconds.
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 2000;

/// Default interval between ad slides, in milliseconds.
pub const DEFAULT_AD_ROTATION_MS: u64 = 5000;
