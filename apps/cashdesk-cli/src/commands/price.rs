//! `cashdesk price`: subtotals and the adjusted total, no payment.

use std::path::Path;
use tracing::info;

use cashdesk_core::money::format_amount;
use cashdesk_core::{settle, SettlementResult};

use super::print_json;
use crate::config::CashdeskConfig;
use crate::error::AppResult;
use crate::request::CheckoutRequest;

/// Prices a parsed request.
pub fn price(request: &CheckoutRequest, config: &CashdeskConfig) -> AppResult<SettlementResult> {
    let rate = request.effective_rate(config);
    let adjustments = request.adjustments()?;
    Ok(settle(&request.transactions, &adjustments, &rate)?)
}

pub fn handle(config: &CashdeskConfig, path: &Path) -> AppResult<()> {
    let request = CheckoutRequest::from_path(path)?;
    let result = price(&request, config)?;

    info!(
        subtotal_usd = %format_amount(result.subtotal.both),
        total = %format_amount(result.total.value),
        currency = %result.total.currency,
        "Checkout priced"
    );

    print_json(&result)
}
