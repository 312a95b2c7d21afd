//! `cashdesk change`: greedy change from a drawer snapshot.

use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{info, warn};

use cashdesk_core::money::format_amount;
use cashdesk_core::{resolve, CashDenomination, ChangeResult, ExchangeRate, RemainingOwed};

use super::{print_json, resolve_drawer_path};
use crate::config::CashdeskConfig;
use crate::error::AppResult;
use crate::request::load_drawer;

/// Builds the owed pair, deriving KHR from the sell rate when not given.
pub fn owed(usd: Decimal, khr: Option<Decimal>, rate: &ExchangeRate) -> AppResult<RemainingOwed> {
    match khr {
        Some(khr) => Ok(RemainingOwed { usd, khr }),
        None => Ok(RemainingOwed::from_usd(usd, rate)?),
    }
}

/// Resolves change; the drawer file is never written here.
pub fn make_change(
    drawer: &[CashDenomination],
    owed: &RemainingOwed,
    rate: &ExchangeRate,
) -> AppResult<ChangeResult> {
    Ok(resolve(drawer, owed, rate)?)
}

pub fn handle(
    config: &CashdeskConfig,
    drawer: Option<PathBuf>,
    owed_usd: Decimal,
    owed_khr: Option<Decimal>,
) -> AppResult<()> {
    let rate = config.exchange_rate();
    let path = resolve_drawer_path(config, drawer)?;
    let drawer = load_drawer(&path)?;
    let owed = owed(owed_usd, owed_khr, &rate)?;

    let change = make_change(&drawer, &owed, &rate)?;

    if change.return_cashes.iter().any(|c| c.is_synthetic()) {
        warn!(
            drawer = %super::display(&path),
            short = %format_amount(-change.remain_cash),
            "Drawer cannot cover change exactly"
        );
    }
    info!(
        owed_usd = %format_amount(owed.usd),
        pieces = change.return_cashes.len(),
        "Change resolved"
    );

    print_json(&change)
}
