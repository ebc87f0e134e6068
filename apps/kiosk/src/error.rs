//! # Kiosk Error Type
//!
//! Failures that stop the kiosk from starting or running.
//!
//! ```text
//!   config file / env ──► ConfigLoadFailed, InvalidConfig
//!   catalog database  ──► Database(DbError)
//!   stdout            ──► Output
//! ```
//!
//! A bad scan is not here: it is a `CoreError` shown inline by the session.

use checkout_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KioskError {
    #[error("Invalid kiosk configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Catalog database error: {0}")]
    Database(#[from] DbError),

    #[error("Output failed: {0}")]
    Output(String),
}

impl From<toml::de::Error> for KioskError {
    fn from(err: toml::de::Error) -> Self {
        KioskError::ConfigLoadFailed(err.to_string())
    }
}

impl From<serde_json::Error> for KioskError {
    fn from(err: serde_json::Error) -> Self {
        KioskError::Output(err.to_string())
    }
}

impl From<std::io::Error> for KioskError {
    fn from(err: std::io::Error) -> Self {
        KioskError::Output(err.to_string())
    }
}

impl KioskError {
    /// `true` for problems an operator fixes by editing kiosk.toml or the
    /// environment.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            KioskError::InvalidConfig(_) | KioskError::ConfigLoadFailed(_)
        )
    }
}

pub type KioskResult<T> = Result<T, KioskError>;
