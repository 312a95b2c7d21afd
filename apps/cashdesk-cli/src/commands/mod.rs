//! # Commands Module
//!
//! One file per subcommand. Each exposes a pure function that does the
//! work and a `handle` that wires it to files, logs and stdout.
//!
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (dispatch, JSON output)
//! ├── price.rs     ◄─── cashdesk price
//! ├── change.rs    ◄─── cashdesk change
//! ├── checkout.rs  ◄─── cashdesk checkout
//! └── config.rs    ◄─── cashdesk config show|init
//! ```

pub mod change;
pub mod checkout;
pub mod config;
pub mod price;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::Command;
use crate::config::CashdeskConfig;
use crate::error::{AppError, AppResult};

/// Runs one parsed subcommand.
pub fn dispatch(
    command: Command,
    config: &CashdeskConfig,
    config_path: Option<PathBuf>,
) -> AppResult<()> {
    match command {
        Command::Price { request } => price::handle(config, &request),
        Command::Change {
            drawer,
            owed_usd,
            owed_khr,
        } => change::handle(config, drawer, owed_usd, owed_khr),
        Command::Checkout {
            request,
            drawer,
            commit,
        } => checkout::handle(config, &request, drawer, commit),
        Command::Config { action } => config::handle(config, config_path, action),
    }
}

/// Pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The drawer given on the command line, else the configured one.
pub(crate) fn resolve_drawer_path(
    config: &CashdeskConfig,
    drawer: Option<PathBuf>,
) -> AppResult<PathBuf> {
    drawer
        .or_else(|| config.drawer_path())
        .ok_or_else(|| AppError::validation("No drawer file given and no default location"))
}

pub(crate) fn display(path: &Path) -> String {
    path.display().to_string()
}
