//! # Catalog Module
//!
//! Read-only product lookup consumed by the cart engine.
//!
//! ## Catalog Providers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Abstraction                                │
//! │                                                                         │
//! │                      ┌──────────────────────┐                           │
//! │                      │   trait Catalog      │                           │
//! │                      │   get(id)            │                           │
//! │                      │   products()         │                           │
//! │                      │   find_product(q)    │ (provided)                │
//! │                      │   matching(q)        │ (provided)                │
//! │                      └──────────┬───────────┘                           │
//! │                 ┌───────────────┴──────────────┐                        │
//! │                 ▼                              ▼                        │
//! │       MemoryCatalog::seeded()       checkout-db load_catalog()          │
//! │       (built-in kiosk table)        (SQLite snapshot → MemoryCatalog)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Search is plain substring matching in catalog order; there is no
//! relevance ranking.

use std::collections::HashMap;

use crate::types::Product;

// =============================================================================
// Catalog Trait
// =============================================================================

/// A read-only mapping from product id to product.
pub trait Catalog {
    /// Exact lookup by product id.
    fn get(&self, id: &str) -> Option<Product>;

    /// Every product, in catalog iteration order.
    fn products(&self) -> Vec<Product>;

    /// Manual search: the first product whose id equals the query or whose
    /// name contains it (case-insensitive).
    ///
    /// The query is used as typed. An empty query is contained in every
    /// name, so it returns the first product.
    fn find_product(&self, query: &str) -> Option<Product> {
        let needle = query.to_lowercase();

        self.products()
            .into_iter()
            .find(|p| p.id == query || p.name.to_lowercase().contains(&needle))
    }

    /// Search dialog listing: products whose name contains the query
    /// (case-insensitive) or whose id contains it. A blank query lists the
    /// whole catalog.
    fn matching(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();

        self.products()
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle) || p.id.contains(query))
            .collect()
    }
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// Insertion-ordered in-memory catalog.
///
/// Re-inserting an existing id replaces the record in place (keeps its
/// position).
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = MemoryCatalog::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Adds or replaces a product.
    pub fn insert(&mut self, product: Product) {
        match self.index.get(&product.id) {
            Some(&pos) => self.products[pos] = product,
            None => {
                self.index.insert(product.id.clone(), self.products.len());
                self.products.push(product);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// The kiosk's built-in product table.
    pub fn seeded() -> Self {
        MemoryCatalog::from_products(seed_products())
    }
}

impl Catalog for MemoryCatalog {
    fn get(&self, id: &str) -> Option<Product> {
        self.index.get(id).map(|&pos| self.products[pos].clone())
    }

    fn products(&self) -> Vec<Product> {
        self.products.clone()
    }

    fn find_product(&self, query: &str) -> Option<Product> {
        let needle = query.to_lowercase();

        // same predicate as the trait default, without cloning every record
        self.products
            .iter()
            .find(|p| p.id == query || p.name.to_lowercase().contains(&needle))
            .cloned()
    }
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn get(&self, id: &str) -> Option<Product> {
        (**self).get(id)
    }

    fn products(&self) -> Vec<Product> {
        (**self).products()
    }

    fn find_product(&self, query: &str) -> Option<Product> {
        (**self).find_product(query)
    }
}

// =============================================================================
// Seed Data
// =============================================================================

const PHONE_IMAGE: &str =
    "https://shop.mobileklinik.ca/cdn/shop/files/iPhone15Pro-Black-500px_500x500.png?v=1707401037";

/// (id, name, price_cents, category)
const SEED_TABLE: &[(&str, &str, i64, &str)] = &[
    ("123456", "iPhone 15 Pro Max", 129_999, "Smartphones"),
    ("234567", "iPhone 15 Pro", 99_999, "Smartphones"),
    ("345678", "iPhone 15", 79_999, "Smartphones"),
    ("456789", "Organic Eggs 12pk", 599, "Dairy"),
    ("567890", "Tomatoes", 249, "Produce"),
    ("678901", "Red Apples", 399, "Produce"),
    ("0123456", "Organic Bananas", 299, "Produce"),
    ("0234567", "Whole Wheat Bread", 349, "Bakery"),
    ("0345678", "Fresh Milk 1L", 499, "Dairy"),
    ("0456789", "Organic Eggs 12pk", 599, "Dairy"),
    ("0567890", "Tomatoes", 249, "Produce"),
    ("0678901", "Red Apples", 399, "Produce"),
];

/// The built-in product table, in display order.
pub fn seed_products() -> Vec<Product> {
    SEED_TABLE
        .iter()
        .map(|(id, name, price_cents, category)| {
            Product::new(*id, *name, *price_cents, PHONE_IMAGE, *category)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
