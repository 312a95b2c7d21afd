//! # Cashdesk CLI Library
//!
//! The shell around `cashdesk-core`: configuration, files, logging and
//! the command surface. All settlement math lives in the core crate.
//!
//! ## Module Organization
//! ```text
//! cashdesk_cli/
//! ├── lib.rs          ◄─── You are here (tracing setup, exports)
//! ├── cli.rs          ◄─── clap definitions
//! ├── config.rs       ◄─── TOML + environment configuration
//! ├── request.rs      ◄─── Request and drawer JSON files
//! ├── error.rs        ◄─── AppError and exit codes
//! └── commands/
//!     ├── price.rs    ◄─── Subtotals and total
//!     ├── change.rs   ◄─── Change from a drawer
//!     ├── checkout.rs ◄─── Full checkout and receipt
//!     └── config.rs   ◄─── Show / init config
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod request;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` for this
/// workspace when `verbose`. Logs go to stderr so stdout stays JSON.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "info,cashdesk_cli=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
