//! # Domain Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    TaxRate      │   │  ImportSource   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (barcode)   │   │  bps (u32)      │   │  Manual         │       │
//! │  │  name           │   │  1000 = 10%     │   │  Csv / Excel    │       │
//! │  │  price_cents    │   └─────────────────┘   │  Api            │       │
//! │  │  image          │                         └─────────────────┘       │
//! │  │  category       │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product's `id` is the digit string printed in its barcode, so a decoded
//! scan can be looked up directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Sales tax in basis points: 1 bps = 0.01%, so the 10% default is 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// `8.25` -> 825 bps. Used for `CHECKOUT_TAX_RATE`.
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Display only; money math stays in bps.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

/// Renders like `10%` or `8.25%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        match frac {
            0 => write!(f, "{}%", whole),
            f10 if f10 % 10 == 0 => write!(f, "{}.{}%", whole, f10 / 10),
            _ => write!(f, "{}.{:02}%", whole, frac),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Immutable once loaded into a catalog; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Barcode digits, unique within a catalog.
    pub id: String,

    /// Display name shown on the cart line and in toasts.
    pub name: String,

    /// Price in cents. Never negative.
    pub price_cents: i64,

    /// Image URL for the cart thumbnail.
    pub image: String,

    /// Category badge text ("Dairy", "Produce", ...).
    pub category: String,
}

impl Product {
    /// Builds a product.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        image: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price_cents,
            image: image.into(),
            category: category.into(),
        }
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Import Source
// =============================================================================

/// Where a catalog record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportSource {
    /// Typed in by an operator.
    #[default]
    Manual,
    /// Bulk import from a CSV file.
    Csv,
    /// Bulk import from an Excel workbook.
    Excel,
    /// Pushed by an external system.
    Api,
}

impl ImportSource {
    /// Lowercase name as stored in the catalog table.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportSource::Manual => "manual",
            ImportSource::Csv => "csv",
            ImportSource::Excel => "excel",
            ImportSource::Api => "api",
        }
    }
}

impl fmt::Display for ImportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(ImportSource::Manual),
            "csv" => Ok(ImportSource::Csv),
            "excel" | "xlsx" | "xls" => Ok(ImportSource::Excel),
            "api" => Ok(ImportSource::Api),
            other => Err(format!("Unknown import source: {}", other)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(10.0).bps(), 1000);
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn test_tax_rate_default_is_ten_percent() {
        assert_eq!(TaxRate::default().bps(), 1000);
    }

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(1000).to_string(), "10%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
        assert_eq!(TaxRate::from_bps(750).to_string(), "7.5%");
        assert_eq!(TaxRate::from_bps(5).to_string(), "0.05%");
    }

    #[test]
    fn test_product_price() {
        let product = Product::new("456789", "Organic Eggs 12pk", 599, "", "Dairy");
        assert_eq!(product.price(), Money::from_cents(599));
    }

    #[test]
    fn test_import_source_parsing() {
        assert_eq!("csv".parse::<ImportSource>().unwrap(), ImportSource::Csv);
        assert_eq!("XLSX".parse::<ImportSource>().unwrap(), ImportSource::Excel);
        assert_eq!(ImportSource::Api.to_string(), "api");
        assert!("ftp".parse::<ImportSource>().is_err());
    }
}
