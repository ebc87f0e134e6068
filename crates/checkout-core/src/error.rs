//! # Error Types
//!
//! ```text
//!   scan / search / +/- / remove
//!        │
//!        ├── unknown id ──────────► CoreError::ProductNotFound  (shown inline)
//!        └── everything else ─────► no error at all
//!
//!   catalog row (seed, import, back office)
//!        └── bad field ───────────► ValidationError ──► DbError / KioskError
//! ```
//!
//! Decoder noise and edits to lines that aren't in the cart are no-ops, not
//! errors. The `Display` text of a `CoreError` is what the shopper sees.

use thiserror::Error;

/// Session-level failures. None of them end the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The scanned or selected id isn't in the catalog. The cart is left
    /// exactly as it was.
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// A catalog field that breaks a rule in [`crate::validation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Required { field: String },

    #[error("{field} is longer than {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be within {min}..={max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// e.g. a product id with letters in it
    #[error("{field} is malformed: {reason}")]
    InvalidFormat { field: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_barcode() {
        let err = CoreError::ProductNotFound("999999".to_string());
        assert_eq!(err.to_string(), "Product not found: 999999");
    }

    #[test]
    fn test_validation_messages() {
        let missing = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(missing.to_string(), "name must not be empty");

        let range = ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        };
        assert_eq!(range.to_string(), "tax_rate must be within 0..=10000");
    }
}
