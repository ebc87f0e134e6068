//! # Recommendations
//!
//! The "You might also like" panel. Entries are static; picking one adds
//! its product to the cart through the normal catalog lookup, so a
//! recommendation for a product the catalog lacks fails like a bad scan.

use serde::{Deserialize, Serialize};

use crate::money::Money;

const PHONE_IMAGE: &str =
    "https://shop.mobileklinik.ca/cdn/shop/files/iPhone15Pro-Black-500px_500x500.png?v=1707401037";

/// One suggested product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_id: String,
    pub name: String,
    pub price_cents: i64,
    pub image: String,
    /// Match confidence, 0-100.
    pub confidence: u8,
    pub reason: String,
}

impl Recommendation {
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Ordered list of recommendations shown to the shopper.
#[derive(Debug, Clone, Default)]
pub struct RecommendationPanel {
    entries: Vec<Recommendation>,
}

impl RecommendationPanel {
    pub fn new(entries: Vec<Recommendation>) -> Self {
        RecommendationPanel { entries }
    }

    pub fn seeded() -> Self {
        let entry = |id: &str, name: &str, price_cents, confidence, reason: &str| Recommendation {
            product_id: id.to_string(),
            name: name.to_string(),
            price_cents,
            image: PHONE_IMAGE.to_string(),
            confidence,
            reason: reason.to_string(),
        };

        RecommendationPanel::new(vec![
            entry("123456", "iPhone 15 Pro Max", 129_999, 92, "Best-selling smartphone model"),
            entry("234567", "iPhone 15 Pro", 99_999, 85, "Popular among tech enthusiasts"),
            entry("345678", "iPhone 15", 79_999, 78, "Great value for features"),
        ])
    }

    pub fn get(&self, index: usize) -> Option<&Recommendation> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Recommendation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, MemoryCatalog};

    #[test]
    fn test_seeded_panel() {
        let panel = RecommendationPanel::seeded();
        assert_eq!(panel.len(), 3);

        let first = panel.get(0).unwrap();
        assert_eq!(first.product_id, "123456");
        assert_eq!(first.confidence, 92);
        assert_eq!(first.price().to_string(), "$1299.99");
        assert!(panel.get(3).is_none());
    }

    #[test]
    fn test_seeded_entries_exist_in_seeded_catalog() {
        let catalog = MemoryCatalog::seeded();
        for rec in RecommendationPanel::seeded().entries() {
            let product = catalog.get(&rec.product_id).unwrap();
            assert_eq!(product.price_cents, rec.price_cents);
        }
    }
}
