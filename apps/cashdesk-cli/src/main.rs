//! # Cashdesk
//!
//! ```text
//! cashdesk price sale.json
//! cashdesk change --drawer drawer.json --owed-usd -27
//! cashdesk checkout sale.json --drawer drawer.json --commit
//! cashdesk config show
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use cashdesk_cli::cli::Cli;
use cashdesk_cli::config::CashdeskConfig;
use cashdesk_cli::{commands, init_tracing};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting cashdesk");

    let config = CashdeskConfig::load(cli.config.clone()).context("Failed to load configuration")?;

    if let Err(err) = commands::dispatch(cli.command, &config, cli.config) {
        error!(code = ?err.code, message = %err.message, "Command failed");
        eprintln!("{}", err.to_json());
        std::process::exit(err.code.exit_code());
    }

    Ok(())
}
