//! # Kiosk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CHECKOUT_TAX_RATE=8.25                                             │
//! │     CHECKOUT_DB_PATH=/var/lib/checkout/catalog.db                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/checkout-kiosk/kiosk.toml (Linux)                        │
//! │     ~/Library/Application Support/com.checkout.kiosk/kiosk.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     10% tax, 50ms scanner window, built-in catalog, text rendering     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Corner Market"
//! tax_rate_bps = 1000          # 10%
//! scanner_timeout_ms = 50
//! notification_ttl_ms = 2000
//! ad_rotation_ms = 5000
//! prune_interval_ms = 100
//! render = "text"              # text | json
//! db_path = "/var/lib/checkout/catalog.db"   # omit for the built-in catalog
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use checkout_core::scanner::ScannerConfig;
use checkout_core::validation::validate_tax_rate_bps;
use checkout_core::{
    SessionConfig, TaxRate, DEFAULT_AD_ROTATION_MS, DEFAULT_NOTIFICATION_TTL_MS,
    DEFAULT_SCANNER_TIMEOUT_MS, DEFAULT_TAX_RATE_BPS, NOTIFICATION_CAPACITY,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{KioskError, KioskResult};

// =============================================================================
// Render Mode
// =============================================================================

/// How the session view is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Human-readable screen.
    #[default]
    Text,
    /// One JSON object per line, for a separate display process.
    Json,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Text => write!(f, "text"),
            RenderMode::Json => write!(f, "json"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = KioskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(RenderMode::Text),
            "json" => Ok(RenderMode::Json),
            other => Err(KioskError::InvalidConfig(format!(
                "Unknown render mode: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Kiosk Configuration
// =============================================================================

/// Complete kiosk configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Shown in the screen header.
    pub store_name: String,

    /// Currency symbol for display.
    pub currency_symbol: String,

    /// Sales tax in basis points. Default: 1000 (10%)
    pub tax_rate_bps: u32,

    /// Maximum gap between keystrokes of one scan burst.
    pub scanner_timeout_ms: u64,

    /// Toast lifetime.
    pub notification_ttl_ms: u64,

    /// Interval between ad slides.
    pub ad_rotation_ms: u64,

    /// How often expired toasts are swept.
    pub prune_interval_ms: u64,

    pub render: RenderMode,

    /// SQLite catalog. `None` uses the built-in product table.
    pub db_path: Option<PathBuf>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        KioskConfig {
            store_name: "Self Checkout".to_string(),
            currency_symbol: "$".to_string(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            scanner_timeout_ms: DEFAULT_SCANNER_TIMEOUT_MS,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
            ad_rotation_ms: DEFAULT_AD_ROTATION_MS,
            prune_interval_ms: 100,
            render: RenderMode::Text,
            db_path: None,
        }
    }
}

impl KioskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (kiosk.toml)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that doesn't exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<PathBuf>) -> KioskResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading kiosk config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    KioskError::ConfigLoadFailed(format!("{}: {}", path.display(), e))
                })?;
                config = toml::from_str(&contents)?;
            } else if explicit {
                return Err(KioskError::ConfigLoadFailed(format!(
                    "{} does not exist",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> KioskResult<()> {
        validate_tax_rate_bps(self.tax_rate_bps)
            .map_err(|e| KioskError::InvalidConfig(e.to_string()))?;

        if self.scanner_timeout_ms == 0 {
            return Err(KioskError::InvalidConfig(
                "scanner_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.ad_rotation_ms == 0 || self.prune_interval_ms == 0 {
            return Err(KioskError::InvalidConfig(
                "ticker intervals must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.db_path {
            if path.as_os_str().is_empty() {
                return Err(KioskError::InvalidConfig("db_path is empty".into()));
            }
        }

        Ok(())
    }

    /// Applies `CHECKOUT_*` overrides.
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("CHECKOUT_STORE_NAME") {
            self.store_name = name;
        }

        // Percent, like the receipt shows it: "8.25"
        if let Some(rate) = lookup("CHECKOUT_TAX_RATE") {
            match rate.parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    debug!(rate = %rate, "Overriding tax rate from environment");
                    self.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(rate = %rate, "Ignoring invalid CHECKOUT_TAX_RATE"),
            }
        }

        if let Some(ms) = lookup("CHECKOUT_SCANNER_TIMEOUT_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.scanner_timeout_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring invalid CHECKOUT_SCANNER_TIMEOUT_MS"),
            }
        }

        if let Some(ms) = lookup("CHECKOUT_NOTIFICATION_TTL_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.notification_ttl_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring invalid CHECKOUT_NOTIFICATION_TTL_MS"),
            }
        }

        if let Some(mode) = lookup("CHECKOUT_RENDER") {
            match mode.parse() {
                Ok(parsed) => self.render = parsed,
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(path) = lookup("CHECKOUT_DB_PATH") {
            debug!(path = %path, "Overriding catalog database from environment");
            self.db_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "checkout", "kiosk")
            .map(|dirs| dirs.config_dir().join("kiosk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    pub fn ad_rotation(&self) -> Duration {
        Duration::from_millis(self.ad_rotation_ms)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_millis(self.prune_interval_ms)
    }

    /// Session tunables derived from this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            scanner: ScannerConfig::with_timeout_ms(self.scanner_timeout_ms),
            tax_rate: self.tax_rate(),
            notification_capacity: NOTIFICATION_CAPACITY,
            notification_ttl: Duration::from_millis(self.notification_ttl_ms),
        }
    }

    /// Formats a cent amount with this kiosk's currency symbol.
    ///
    /// ```rust
    /// use checkout_kiosk::config::KioskConfig;
    ///
    /// let config = KioskConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = KioskConfig::default();
        assert_eq!(config.tax_rate_bps, 1000);
        assert_eq!(config.scanner_timeout_ms, 50);
        assert_eq!(config.notification_ttl_ms, 2000);
        assert_eq!(config.ad_rotation(), Duration::from_secs(5));
        assert_eq!(config.render, RenderMode::Text);
        assert!(config.db_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: KioskConfig = toml::from_str(
            r#"
            store_name = "Corner Market"
            tax_rate_bps = 825
            render = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.store_name, "Corner Market");
        assert_eq!(config.tax_rate().to_string(), "8.25%");
        assert_eq!(config.render, RenderMode::Json);
        assert_eq!(config.scanner_timeout_ms, 50);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = KioskConfig::default();
        config.apply_overrides(env(&[
            ("CHECKOUT_TAX_RATE", "8.25"),
            ("CHECKOUT_SCANNER_TIMEOUT_MS", "80"),
            ("CHECKOUT_RENDER", "JSON"),
            ("CHECKOUT_DB_PATH", "/tmp/catalog.db"),
        ]));

        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.scanner_timeout_ms, 80);
        assert_eq!(config.render, RenderMode::Json);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/catalog.db")));
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = KioskConfig::default();
        config.apply_overrides(env(&[
            ("CHECKOUT_TAX_RATE", "lots"),
            ("CHECKOUT_SCANNER_TIMEOUT_MS", "-1"),
            ("CHECKOUT_RENDER", "hologram"),
        ]));

        assert_eq!(config, KioskConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = KioskConfig::default();

        config.tax_rate_bps = 10_001;
        assert!(config.validate().is_err());

        config.tax_rate_bps = 0;
        config.scanner_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.scanner_timeout_ms = 50;
        config.db_path = Some(PathBuf::new());
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = KioskConfig::load(Some(PathBuf::from("/definitely/not/here/kiosk.toml")))
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_session_config() {
        let mut config = KioskConfig::default();
        config.tax_rate_bps = 500;
        config.scanner_timeout_ms = 75;

        let session = config.session_config();
        assert_eq!(session.tax_rate.bps(), 500);
        assert_eq!(session.scanner.timeout, Duration::from_millis(75));
        assert_eq!(session.notification_capacity, 5);
    }

    #[test]
    fn test_format_currency() {
        let config = KioskConfig::default();
        assert_eq!(config.format_currency(2750), "$27.50");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_render_mode_parsing() {
        assert_eq!("text".parse::<RenderMode>().unwrap(), RenderMode::Text);
        assert_eq!("Json".parse::<RenderMode>().unwrap(), RenderMode::Json);
        assert!("xml".parse::<RenderMode>().is_err());
    }

    #[test]
    fn test_toml_round_trip_writes_keys() {
        let toml_str = toml::to_string_pretty(&KioskConfig::default()).unwrap();
        assert!(toml_str.contains("tax_rate_bps = 1000"));
        assert!(toml_str.contains("render = \"text\""));
    }
}
