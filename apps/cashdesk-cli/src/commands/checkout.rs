//! `cashdesk checkout`: the full chain, with an optional drawer commit.
//!
//! ```text
//! request.json ──► price ──► tenders ──► change ──► receipt (stdout)
//!                                           │
//!                                 --commit  ▼
//!                                    drawer.json updated
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use cashdesk_core::money::format_amount;
use cashdesk_core::{checkout, CashDenomination, CheckoutOutcome};

use super::{print_json, resolve_drawer_path};
use crate::config::CashdeskConfig;
use crate::error::AppResult;
use crate::request::{load_drawer, save_drawer, CheckoutRequest};

/// What the cashier prints and the caller stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub checkout_id: String,
    pub receipt_number: String,
    pub store_name: String,
    pub timestamp: String,
    /// Display strings, two decimals.
    pub subtotal_usd: String,
    pub total: String,
    pub tendered_usd: String,
    pub change_usd: String,
    pub outcome: CheckoutOutcome,
    /// True when the drawer file was rewritten.
    pub committed: bool,
}

/// Runs the chain for a request and drawer, building the receipt.
pub fn run_checkout(
    request: &CheckoutRequest,
    drawer: &[CashDenomination],
    config: &CashdeskConfig,
    now: DateTime<Utc>,
) -> AppResult<Receipt> {
    let rate = request.effective_rate(config);
    let adjustments = request.adjustments()?;
    let outcome = checkout(
        &request.transactions,
        &adjustments,
        &request.tenders,
        drawer,
        &rate,
    )?;

    Ok(Receipt {
        checkout_id: Uuid::new_v4().to_string(),
        receipt_number: generate_receipt_number(now),
        store_name: config.store.name.clone(),
        timestamp: now.to_rfc3339(),
        subtotal_usd: format_amount(outcome.settlement.subtotal.both),
        total: format!(
            "{} {}",
            format_amount(outcome.settlement.total.value),
            outcome.settlement.total.currency
        ),
        tendered_usd: format_amount(outcome.tendered),
        change_usd: format_amount(-outcome.remaining.usd),
        outcome,
        committed: false,
    })
}

pub fn handle(
    config: &CashdeskConfig,
    request_path: &Path,
    drawer: Option<PathBuf>,
    commit: bool,
) -> AppResult<()> {
    let request = CheckoutRequest::from_path(request_path)?;
    let drawer_path = resolve_drawer_path(config, drawer)?;
    let drawer = load_drawer(&drawer_path)?;

    let mut receipt = run_checkout(&request, &drawer, config, Utc::now())?;

    if receipt.outcome.change.return_cashes.iter().any(|c| c.is_synthetic()) {
        warn!(
            receipt = %receipt.receipt_number,
            short = %format_amount(-receipt.outcome.change.remain_cash),
            "Drawer cannot cover change exactly"
        );
    }

    if commit {
        save_drawer(&drawer_path, &receipt.outcome.change.cashes)?;
        receipt.committed = true;
        info!(drawer = %super::display(&drawer_path), "Drawer committed");
    }

    info!(
        checkout_id = %receipt.checkout_id,
        receipt = %receipt.receipt_number,
        total = %receipt.total,
        change_usd = %receipt.change_usd,
        "Checkout completed"
    );

    print_json(&receipt)
}

/// `yymmdd-HHMMSS-xxxx`, the suffix taken from a fresh UUID.
fn generate_receipt_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.format("%y%m%d-%H%M%S"), &suffix[..4])
}
