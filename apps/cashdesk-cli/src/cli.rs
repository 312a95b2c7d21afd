//! Command-line surface.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Cashdesk pricing and settlement engine.
#[derive(Debug, Parser)]
#[command(name = "cashdesk", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a checkout: subtotals and the adjusted total
    Price {
        /// Checkout request JSON
        request: PathBuf,
    },

    /// Resolve change from a drawer for an overpaid amount
    Change {
        /// Drawer snapshot JSON (defaults to the configured drawer)
        #[arg(long, value_name = "PATH")]
        drawer: Option<PathBuf>,

        /// Remaining owed in USD; negative means change is due
        #[arg(long, allow_hyphen_values = true)]
        owed_usd: Decimal,

        /// Remaining owed in KHR; derived from the sell rate when omitted
        #[arg(long, allow_hyphen_values = true)]
        owed_khr: Option<Decimal>,
    },

    /// Price, pay and make change in one go
    Checkout {
        /// Checkout request JSON
        request: PathBuf,

        /// Drawer snapshot JSON (defaults to the configured drawer)
        #[arg(long, value_name = "PATH")]
        drawer: Option<PathBuf>,

        /// Write the updated drawer back to disk
        #[arg(long)]
        commit: bool,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a config file with the current values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
