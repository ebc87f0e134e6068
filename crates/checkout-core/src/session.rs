//! # Checkout Session
//!
//! One shopper's visit to the kiosk: the single owner of the decoder, the
//! cart and every piece of on-screen state.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CheckoutSession                                    │
//! │                                                                         │
//! │  KeyEvent ──► handle_key ──► ScanDecoder ──► scan(barcode)             │
//! │                                                  │                      │
//! │  search(query) ──► Catalog::find_product ────────┤                      │
//! │  add_recommended(i) ──► RecommendationPanel ─────┤                      │
//! │                                                  ▼                      │
//! │                                           add_item(id, now)             │
//! │                                             │           │               │
//! │                                         Ok(event)   Err(not found)      │
//! │                                             │           │               │
//! │                          toast "Added: <name>"     inline error         │
//! │                          inline error cleared      "Product not found"  │
//! │                                                                         │
//! │  Tickers:  rotate_ad()   prune_notifications(now)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is a plain value mutated through `&mut self`; the kiosk
//! runtime applies events to it one at a time from a single task.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::carousel::{Ad, AdCarousel};
use crate::cart::{Cart, CartEvent, CartView};
use crate::catalog::Catalog;
use crate::error::CoreResult;
use crate::notification::NotificationQueue;
use crate::recommendation::{Recommendation, RecommendationPanel};
use crate::scanner::{KeyEvent, ScanDecoder, ScannerConfig};
use crate::types::{Product, TaxRate};
use crate::{DEFAULT_NOTIFICATION_TTL_MS, NOTIFICATION_CAPACITY};

// =============================================================================
// Configuration
// =============================================================================

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub scanner: ScannerConfig,
    pub tax_rate: TaxRate,
    pub notification_capacity: usize,
    pub notification_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            scanner: ScannerConfig::default(),
            tax_rate: TaxRate::default(),
            notification_capacity: NOTIFICATION_CAPACITY,
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// A single checkout session over a catalog.
#[derive(Debug)]
pub struct CheckoutSession<C> {
    catalog: C,
    decoder: ScanDecoder,
    cart: Cart,
    notifications: NotificationQueue,
    carousel: AdCarousel,
    recommendations: RecommendationPanel,
    error: Option<String>,
}

impl<C: Catalog> CheckoutSession<C> {
    /// Starts a session with an empty cart and the built-in ads and
    /// recommendations.
    pub fn new(catalog: C, config: SessionConfig) -> Self {
        CheckoutSession {
            catalog,
            decoder: ScanDecoder::new(config.scanner),
            cart: Cart::with_tax_rate(config.tax_rate),
            notifications: NotificationQueue::new(
                config.notification_capacity,
                config.notification_ttl,
            ),
            carousel: AdCarousel::seeded(),
            recommendations: RecommendationPanel::seeded(),
            error: None,
        }
    }

    pub fn with_carousel(mut self, carousel: AdCarousel) -> Self {
        self.carousel = carousel;
        self
    }

    pub fn with_recommendations(mut self, recommendations: RecommendationPanel) -> Self {
        self.recommendations = recommendations;
        self
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Feeds one raw key press. When it completes a scan burst, the barcode
    /// goes through [`scan`](Self::scan) and its result is returned.
    pub fn handle_key(&mut self, event: KeyEvent) -> Option<CoreResult<CartEvent>> {
        let now = event.at;
        let scan = self.decoder.feed(event)?;
        Some(self.scan(scan.barcode(), now))
    }

    /// A decoded barcode.
    pub fn scan(&mut self, barcode: &str, now: Instant) -> CoreResult<CartEvent> {
        debug!(barcode, "Barcode scanned");
        self.add_item(barcode, now)
    }

    /// Adds one unit of `product_id`.
    ///
    /// ## Outcome
    /// - Found: toast pushed, inline error cleared
    /// - Not found: inline error set to `"Product not found: <id>"`
    ///
    /// Either way the session keeps running.
    pub fn add_item(&mut self, product_id: &str, now: Instant) -> CoreResult<CartEvent> {
        match self.cart.add_item(&self.catalog, product_id) {
            Ok(event) => {
                self.notifications.push(event.notification(), now);
                self.error = None;
                Ok(event)
            }
            Err(err) => {
                warn!(product_id, "Lookup failed: {}", err);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Manual search: adds the first matching product.
    ///
    /// Returns the product added, or `None` when nothing matched. A miss
    /// shows no error.
    pub fn search(&mut self, query: &str, now: Instant) -> Option<Product> {
        let product = self.catalog.find_product(query)?;
        self.add_item(&product.id, now).ok()?;
        Some(product)
    }

    /// Products listed by the search dialog for `query`.
    pub fn search_results(&self, query: &str) -> Vec<Product> {
        self.catalog.matching(query)
    }

    /// Adds the recommendation at `index`. `None` when out of range.
    pub fn add_recommended(&mut self, index: usize, now: Instant) -> Option<CoreResult<CartEvent>> {
        let product_id = self.recommendations.get(index)?.product_id.clone();
        Some(self.add_item(&product_id, now))
    }

    pub fn change_quantity(&mut self, product_id: &str, delta: i64) {
        self.cart.change_quantity(product_id, delta);
    }

    pub fn remove_item(&mut self, product_id: &str) -> bool {
        self.cart.remove_item(product_id)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // -------------------------------------------------------------------------
    // Ticks
    // -------------------------------------------------------------------------

    pub fn rotate_ad(&mut self) -> Option<&Ad> {
        self.carousel.advance()
    }

    /// Drops expired toasts; returns how many went.
    pub fn prune_notifications(&mut self, now: Instant) -> usize {
        self.notifications.prune(now)
    }

    // -------------------------------------------------------------------------
    // Payment
    // -------------------------------------------------------------------------

    pub fn can_proceed_to_payment(&self) -> bool {
        !self.cart.is_empty()
    }

    /// Hands the cart to payment. Payment is not wired up, so this only
    /// logs. Returns whether the cart was eligible.
    pub fn proceed_to_payment(&self) -> bool {
        if !self.can_proceed_to_payment() {
            debug!("Payment requested with an empty cart");
            return false;
        }
        info!(
            lines = self.cart.len(),
            total = %self.cart.total(),
            "Proceeding to payment"
        );
        true
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn carousel(&self) -> &AdCarousel {
        &self.carousel
    }

    pub fn recommendations(&self) -> &RecommendationPanel {
        &self.recommendations
    }

    /// Inline error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Digits of a scan burst in progress.
    pub fn pending_scan(&self) -> &str {
        self.decoder.pending()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            cart: self.cart.view(),
            notifications: self
                .notifications
                .iter()
                .map(|n| NotificationView {
                    id: n.id,
                    message: n.message.clone(),
                })
                .collect(),
            error: self.error.clone(),
            ad: self.carousel.current().cloned(),
            recommendations: self.recommendations.entries().to_vec(),
            can_proceed_to_payment: self.can_proceed_to_payment(),
        }
    }

    /// Forgets any half-read scan burst. Called when the session ends.
    pub fn teardown(&mut self) {
        self.decoder.reset();
        debug!("Session torn down");
    }
}

// =============================================================================
// View
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: u64,
    pub message: String,
}

/// Everything the renderer draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub cart: CartView,
    /// Newest first.
    pub notifications: Vec<NotificationView>,
    pub error: Option<String>,
    pub ad: Option<Ad>,
    pub recommendations: Vec<Recommendation>,
    pub can_proceed_to_payment: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::error::CoreError;
    use crate::scanner::Key;

    fn session() -> CheckoutSession<MemoryCatalog> {
        CheckoutSession::new(MemoryCatalog::seeded(), SessionConfig::default())
    }

    fn type_burst(
        session: &mut CheckoutSession<MemoryCatalog>,
        start: Instant,
        digits: &str,
    ) -> Option<CoreResult<CartEvent>> {
        let mut at = start;
        for c in digits.chars() {
            assert!(session.handle_key(KeyEvent::new(Key::Char(c), at)).is_none());
            at += Duration::from_millis(5);
        }
        session.handle_key(KeyEvent::new(Key::Enter, at))
    }

    #[test]
    fn test_scan_adds_and_notifies() {
        let t0 = Instant::now();
        let mut session = session();

        let result = type_burst(&mut session, t0, "0345678").unwrap();

        assert!(result.is_ok());
        assert_eq!(session.cart().line("0345678").unwrap().quantity, 1);
        assert_eq!(session.notifications().messages(), vec!["Added: Fresh Milk 1L"]);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_unknown_scan_sets_error_then_success_clears_it() {
        let t0 = Instant::now();
        let mut session = session();

        let result = type_burst(&mut session, t0, "999999").unwrap();
        assert_eq!(result, Err(CoreError::ProductNotFound("999999".to_string())));
        assert_eq!(session.error(), Some("Product not found: 999999"));
        assert!(session.cart().is_empty());
        assert!(session.notifications().is_empty());

        let later = t0 + Duration::from_secs(1);
        type_burst(&mut session, later, "567890").unwrap().unwrap();
        assert!(session.error().is_none());
    }

    #[test]
    fn test_two_scans_of_same_item_merge() {
        let t0 = Instant::now();
        let mut session = session();

        type_burst(&mut session, t0, "456789");
        type_burst(&mut session, t0 + Duration::from_millis(500), "456789");

        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.cart().total_quantity(), 2);
        // the second toast repeats the newest one and is dropped
        assert_eq!(session.notifications().messages(), vec!["Added: Organic Eggs 12pk"]);
    }

    #[test]
    fn test_search_adds_first_match() {
        let t0 = Instant::now();
        let mut session = session();

        let product = session.search("bread", t0).unwrap();

        assert_eq!(product.id, "0234567");
        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.notifications().messages(), vec!["Added: Whole Wheat Bread"]);
    }

    #[test]
    fn test_search_miss_is_silent() {
        let t0 = Instant::now();
        let mut session = session();

        assert!(session.search("caviar", t0).is_none());
        assert!(session.search(" 123456", t0).is_none());
        assert!(session.cart().is_empty());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_empty_search_adds_first_product() {
        let t0 = Instant::now();
        let mut session = session();

        let product = session.search("", t0).unwrap();

        assert_eq!(product.id, "123456");
        assert_eq!(session.cart().line("123456").unwrap().quantity, 1);
    }

    #[test]
    fn test_search_results_listing() {
        let session = session();
        assert_eq!(session.search_results("milk").len(), 1);
        assert_eq!(session.search_results("").len(), 12);
    }

    #[test]
    fn test_add_recommended() {
        let t0 = Instant::now();
        let mut session = session();

        let event = session.add_recommended(1, t0).unwrap().unwrap();
        assert_eq!(event.notification(), "Added: iPhone 15 Pro");
        assert!(session.add_recommended(7, t0).is_none());
    }

    #[test]
    fn test_recommendation_missing_from_catalog_fails_like_scan() {
        let t0 = Instant::now();
        let mut session = CheckoutSession::new(MemoryCatalog::new(), SessionConfig::default());

        let result = session.add_recommended(0, t0).unwrap();

        assert!(result.is_err());
        assert_eq!(session.error(), Some("Product not found: 123456"));
    }

    #[test]
    fn test_line_controls_and_payment_gate() {
        let t0 = Instant::now();
        let mut session = session();
        assert!(!session.can_proceed_to_payment());
        assert!(!session.proceed_to_payment());

        session.add_item("678901", t0).unwrap();
        session.change_quantity("678901", 1);
        session.change_quantity("678901", -5);
        assert_eq!(session.cart().line("678901").unwrap().quantity, 1);
        assert!(session.proceed_to_payment());

        assert!(session.remove_item("678901"));
        assert!(!session.can_proceed_to_payment());
    }

    #[test]
    fn test_prune_and_rotate() {
        let t0 = Instant::now();
        let mut session = session();
        session.add_item("567890", t0).unwrap();

        assert_eq!(session.prune_notifications(t0 + Duration::from_millis(100)), 0);
        assert_eq!(session.prune_notifications(t0 + Duration::from_millis(2000)), 1);

        assert_eq!(session.rotate_ad().unwrap().title, "Members Only Deal");
    }

    #[test]
    fn test_custom_config() {
        let t0 = Instant::now();
        let config = SessionConfig {
            tax_rate: TaxRate::from_bps(500),
            notification_ttl: Duration::from_millis(50),
            ..SessionConfig::default()
        };
        let mut session = CheckoutSession::new(MemoryCatalog::seeded(), config);

        session.add_item("0345678", t0).unwrap();

        assert_eq!(session.cart().tax().cents(), 25);
        assert_eq!(session.prune_notifications(t0 + Duration::from_millis(50)), 1);
    }

    #[test]
    fn test_teardown_drops_partial_burst() {
        let t0 = Instant::now();
        let mut session = session();
        session.handle_key(KeyEvent::new(Key::Char('1'), t0));
        assert_eq!(session.pending_scan(), "1");

        session.teardown();

        assert_eq!(session.pending_scan(), "");
    }

    #[test]
    fn test_view_snapshot() {
        let t0 = Instant::now();
        let mut session = session();
        session.add_item("123456", t0).unwrap();
        let _ = session.add_item("000", t0);

        let view = session.view();

        assert_eq!(view.cart.total_cents, 142_999);
        assert_eq!(view.error.as_deref(), Some("Product not found: 000"));
        assert_eq!(view.notifications[0].message, "Added: iPhone 15 Pro Max");
        assert_eq!(view.ad.unwrap().title, "Weekly Specials");
        assert!(view.can_proceed_to_payment);
    }
}
