//! # Request and Drawer Files
//!
//! JSON documents the CLI reads and writes.
//!
//! ## Request Format
//! ```json
//! {
//!   "transactions": [
//!     { "total": { "value": 50, "currency": "USD" } },
//!     { "total": { "value": 40000, "currency": "KHR" } }
//!   ],
//!   "discounts": [ { "type": "PCT", "value": 10, "isFixed": false } ],
//!   "services": [],
//!   "vouchers": [ { "type": "USD", "value": 2 } ],
//!   "tenders": [ { "value": 60, "currency": "USD" } ],
//!   "rate": { "sellRate": 4000, "buyRate": 4100 }
//! }
//! ```
//!
//! ## Drawer Format
//! ```json
//! [ { "cash": 20, "currency": "USD", "quantity": 5 } ]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use cashdesk_core::{AdjustmentRecord, Adjustments, CashDenomination, ExchangeRate, Money, Transaction};

use crate::config::CashdeskConfig;
use crate::error::AppResult;

/// A checkout as handed to the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub discounts: Vec<AdjustmentRecord>,

    #[serde(default)]
    pub services: Vec<AdjustmentRecord>,

    #[serde(default)]
    pub vouchers: Vec<AdjustmentRecord>,

    #[serde(default)]
    pub tenders: Vec<Money>,

    /// Overrides the configured rates for this checkout only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<ExchangeRate>,
}

impl CheckoutRequest {
    /// Reads and parses a request file.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let request: CheckoutRequest = serde_json::from_str(&contents)?;
        debug!(
            ?path,
            transactions = request.transactions.len(),
            tenders = request.tenders.len(),
            "Parsed checkout request"
        );
        Ok(request)
    }

    /// Discounts, services and vouchers in engine form.
    pub fn adjustments(&self) -> AppResult<Adjustments> {
        Ok(Adjustments::from_records(
            &self.discounts,
            &self.services,
            &self.vouchers,
        )?)
    }

    /// The request's own rate if present, the configured one otherwise.
    pub fn effective_rate(&self, config: &CashdeskConfig) -> ExchangeRate {
        self.rate.unwrap_or_else(|| config.exchange_rate())
    }
}

/// Reads a drawer snapshot.
pub fn load_drawer(path: &Path) -> AppResult<Vec<CashDenomination>> {
    let contents = std::fs::read_to_string(path)?;
    let drawer: Vec<CashDenomination> = serde_json::from_str(&contents)?;
    debug!(?path, denominations = drawer.len(), "Loaded drawer");
    Ok(drawer)
}

/// Writes a drawer snapshot, creating parent directories as needed.
pub fn save_drawer(path: &Path, drawer: &[CashDenomination]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(drawer)?;
    std::fs::write(path, contents)?;
    debug!(?path, denominations = drawer.len(), "Saved drawer");
    Ok(())
}
