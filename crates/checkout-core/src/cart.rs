//! # Cart Engine
//!
//! The shopping cart of one checkout session.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Trigger                 Operation               Cart Change            │
//! │  ───────                 ─────────               ───────────            │
//! │                                                                         │
//! │  Barcode scan ─────────► add_item(catalog, id) ─► qty += 1 or push     │
//! │  Search / recommended ─► add_item(catalog, id) ─► qty += 1 or push     │
//! │                                                                         │
//! │  [+] / [-] ────────────► change_quantity(id, ±1) ► qty = max(1, q+d)   │
//! │                                                                         │
//! │  [Remove] ─────────────► remove_item(id) ───────► line deleted         │
//! │                                                                         │
//! │  Render ───────────────► view() ────────────────► (read only)          │
//! │                                                                         │
//! │  NOTE: [-] never removes a line; only [Remove] does.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are recomputed from the lines on every read, so they can never
//! drift from the cart contents.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, TaxRate};

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart with its quantity.
///
/// The product is a copy taken at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,

    /// Always at least 1.
    pub quantity: i64,
}

impl CartLine {
    fn new(product: Product) -> Self {
        CartLine {
            product,
            quantity: 1,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Events
// =============================================================================

/// Outcome of a successful add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Added {
        product_id: String,
        name: String,
        /// Quantity of the line after the add.
        quantity: i64,
    },
}

impl CartEvent {
    /// Toast text for the notification queue.
    pub fn notification(&self) -> String {
        match self {
            CartEvent::Added { name, .. } => format!("Added: {}", name),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding again increments the quantity)
/// - Line order is first-add order; quantity changes keep the position
/// - Every quantity is >= 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    tax_rate: TaxRate,
}

impl Cart {
    /// Creates an empty cart taxed at the default rate.
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        Cart {
            lines: Vec::new(),
            tax_rate,
        }
    }

    /// Adds one unit of a catalog product.
    ///
    /// ## Behavior
    /// - Product already in cart: its quantity goes up by one, in place
    /// - Product not in cart: a new line with quantity 1 is appended
    /// - Unknown id: `CoreError::ProductNotFound`, cart untouched
    ///
    /// ```rust
    /// use checkout_core::{Cart, MemoryCatalog};
    ///
    /// let catalog = MemoryCatalog::seeded();
    /// let mut cart = Cart::new();
    ///
    /// let event = cart.add_item(&catalog, "456789").unwrap();
    /// assert_eq!(event.notification(), "Added: Organic Eggs 12pk");
    /// assert!(cart.add_item(&catalog, "999999").is_err());
    /// assert_eq!(cart.len(), 1);
    /// ```
    pub fn add_item<C>(&mut self, catalog: &C, product_id: &str) -> CoreResult<CartEvent>
    where
        C: Catalog + ?Sized,
    {
        let product = catalog
            .get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let quantity = match self.line_mut(product_id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            None => {
                self.lines.push(CartLine::new(product.clone()));
                1
            }
        };

        debug!(product_id = %product.id, quantity, "Cart line added");

        Ok(CartEvent::Added {
            product_id: product.id,
            name: product.name,
            quantity,
        })
    }

    /// Adjusts a line's quantity by `delta`, never going below 1.
    ///
    /// No-op when the product is not in the cart.
    pub fn change_quantity(&mut self, product_id: &str, delta: i64) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_add(delta).max(1);
            debug!(product_id, quantity = line.quantity, "Cart quantity changed");
        }
    }

    /// Deletes a line regardless of its quantity.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);
        let removed = self.lines.len() != before;
        if removed {
            debug!(product_id, "Cart line removed");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product.id == product_id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Σ(price × quantity).
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Tax on the whole subtotal, rounded once.
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(self.tax_rate)
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> CartView {
        CartView::from(self)
    }
}

// =============================================================================
// Cart View
// =============================================================================

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        CartLineView {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            category: line.product.category.clone(),
            unit_price_cents: line.product.price_cents,
            quantity: line.quantity,
            line_total_cents: line.line_total().cents(),
        }
    }
}

/// Cart summary handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub tax_rate_bps: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        let tax = subtotal.calculate_tax(cart.tax_rate);
        CartView {
            lines: cart.lines.iter().map(CartLineView::from).collect(),
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: subtotal.cents(),
            tax_cents: tax.cents(),
            total_cents: (subtotal + tax).cents(),
            tax_rate_bps: cart.tax_rate.bps(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
