//! # Catalog Field Rules
//!
//! ```text
//!   ProductRepository::insert / update / import
//!            │
//!            ▼
//!   validate_product  (this module; first failing field wins)
//!            │
//!            ▼
//!   SQLite: PRIMARY KEY (id), CHECK (price_cents >= 0)
//! ```
//!
//! The kiosk also runs `validate_tax_rate_bps` on its configuration.
//!
//! Scanning never validates: a scan that matches nothing is a
//! `ProductNotFound`, not a validation failure.

use crate::error::ValidationError;
use crate::types::Product;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest barcode we accept (GS1-128 tops out well below this).
pub const MAX_PRODUCT_ID_LEN: usize = 48;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_QUERY_LEN: usize = 100;
/// 100%
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

fn too_long(field: &str, max: usize) -> ValidationError {
    ValidationError::TooLong {
        field: field.to_string(),
        max,
    }
}

fn malformed(field: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn check_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(too_long(field, max));
    }
    Ok(())
}

// =============================================================================
// Fields
// =============================================================================

/// A product id is what the scanner types: 1 to 48 ASCII digits.
///
/// ```rust
/// use checkout_core::validation::validate_product_id;
///
/// assert!(validate_product_id("0123456").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("ABC-1").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();
    if id.is_empty() {
        return Err(required("id"));
    }
    check_len("id", id, MAX_PRODUCT_ID_LEN)?;
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("id", "must contain only digits"));
    }
    Ok(())
}

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(required("name"));
    }
    check_len("name", name, MAX_NAME_LEN)
}

/// Category badge text. Empty means no badge.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    check_len("category", category.trim(), MAX_CATEGORY_LEN)
}

/// Thumbnail URL. Empty means no thumbnail.
pub fn validate_image_url(url: &str) -> ValidationResult<()> {
    let url = url.trim();
    if url.is_empty() || url.starts_with("https://") || url.starts_with("http://") {
        return Ok(());
    }
    Err(malformed("image", "must be an http(s) URL"))
}

/// Returns the trimmed query. Empty is fine: the search dialog then lists
/// everything.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    check_len("query", query, MAX_QUERY_LEN)?;
    Ok(query.to_string())
}

/// Prices are never negative; zero is a free item.
///
/// ```rust
/// use checkout_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(129_999).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: i64::from(MAX_TAX_RATE_BPS),
        });
    }
    Ok(())
}

/// Every field rule, in column order; the first failure wins.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_id(&product.id)?;
    validate_product_name(&product.name)?;
    validate_price_cents(product.price_cents)?;
    validate_image_url(&product.image)?;
    validate_category(&product.category)
}

// =============================================================================
// Unit Tests
// =============================================================================
