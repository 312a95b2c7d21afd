//! # Cashdesk Configuration
//!
//! Where the exchange rates the engine needs come from.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Request file `rate` (highest, per checkout)                        │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CASHDESK_SELL_RATE=4000                                            │
//! │     CASHDESK_BUY_RATE=4100                                             │
//! │     CASHDESK_STORE_NAME="Riverside"                                    │
//! │     CASHDESK_DRAWER_PATH=/var/lib/cashdesk/drawer.json                 │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/cashdesk/cashdesk.toml (Linux)                           │
//! │     ~/Library/Application Support/com.cashdesk.cashdesk/... (macOS)    │
//! │                                                                         │
//! │  4. Default Values (lowest)                                            │
//! │     sell 4000, buy 4100                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [rate]
//! sell_rate = 4000
//! buy_rate = 4100
//!
//! [store]
//! name = "Riverside Branch"
//!
//! [drawer]
//! path = "/var/lib/cashdesk/drawer.json"
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use cashdesk_core::validation::validate_exchange_rate;
use cashdesk_core::{ExchangeRate, ValidationError};

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read or write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(#[from] ValidationError),

    #[error("No config path available")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Default KHR per USD when selling dollars.
pub const DEFAULT_SELL_RATE: i64 = 4000;

/// Default KHR per USD when buying dollars.
pub const DEFAULT_BUY_RATE: i64 = 4100;

fn default_sell_rate() -> Decimal {
    Decimal::from(DEFAULT_SELL_RATE)
}

fn default_buy_rate() -> Decimal {
    Decimal::from(DEFAULT_BUY_RATE)
}

/// Exchange rates used when a request does not carry its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSettings {
    #[serde(default = "default_sell_rate")]
    pub sell_rate: Decimal,

    #[serde(default = "default_buy_rate")]
    pub buy_rate: Decimal,
}

impl Default for RateSettings {
    fn default() -> Self {
        RateSettings {
            sell_rate: default_sell_rate(),
            buy_rate: default_buy_rate(),
        }
    }
}

fn default_store_name() -> String {
    "Cashdesk".to_string()
}

/// Store identity printed on receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

/// Where the drawer snapshot lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawerSettings {
    /// Falls back to the platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashdeskConfig {
    #[serde(default)]
    pub rate: RateSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub drawer: DrawerSettings,
}

impl CashdeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cashdesk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::from_file(config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reads the TOML file if there is one, defaults otherwise.
    pub fn from_file(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                return Ok(toml::from_str(&contents)?);
            }
            debug!(?path, "Config file not found, using defaults");
        }

        Ok(Self::default())
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_exchange_rate(&self.exchange_rate())?;
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("CASHDESK_SELL_RATE") {
            match raw.trim().parse::<Decimal>() {
                Ok(rate) => {
                    debug!(%rate, "Overriding sell rate from environment");
                    self.rate.sell_rate = rate;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparsable CASHDESK_SELL_RATE"),
            }
        }

        if let Some(raw) = lookup("CASHDESK_BUY_RATE") {
            match raw.trim().parse::<Decimal>() {
                Ok(rate) => {
                    debug!(%rate, "Overriding buy rate from environment");
                    self.rate.buy_rate = rate;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparsable CASHDESK_BUY_RATE"),
            }
        }

        if let Some(name) = lookup("CASHDESK_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(path) = lookup("CASHDESK_DRAWER_PATH") {
            debug!(%path, "Overriding drawer path from environment");
            self.drawer.path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cashdesk", "cashdesk")
            .map(|dirs| dirs.config_dir().join("cashdesk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The configured rates as the engine's type.
    pub fn exchange_rate(&self) -> ExchangeRate {
        ExchangeRate {
            sell_rate: self.rate.sell_rate,
            buy_rate: self.rate.buy_rate,
        }
    }

    /// The drawer snapshot file, configured or platform default.
    pub fn drawer_path(&self) -> Option<PathBuf> {
        self.drawer.path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "cashdesk", "cashdesk")
                .map(|dirs| dirs.data_dir().join("drawer.json"))
        })
    }
}
