//! `cashdesk config show|init`.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::{display, print_json};
use crate::cli::ConfigAction;
use crate::config::{CashdeskConfig, ConfigError};
use crate::error::{AppError, AppResult, ErrorCode};

/// Effective configuration plus where it would be read from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView<'a> {
    pub config_path: Option<String>,
    pub drawer_path: Option<String>,
    pub config: &'a CashdeskConfig,
}

pub fn view(config: &CashdeskConfig, config_path: Option<PathBuf>) -> ConfigView<'_> {
    ConfigView {
        config_path: config_path
            .or_else(CashdeskConfig::default_config_path)
            .map(|p| display(&p)),
        drawer_path: config.drawer_path().map(|p| display(&p)),
        config,
    }
}

/// Writes the config, refusing to clobber an existing file unless forced.
pub fn init(
    config: &CashdeskConfig,
    config_path: Option<PathBuf>,
    force: bool,
) -> AppResult<PathBuf> {
    let path = config_path
        .or_else(CashdeskConfig::default_config_path)
        .ok_or(ConfigError::NoConfigPath)?;

    if path.exists() && !force {
        return Err(AppError::new(
            ErrorCode::ConfigError,
            format!("{} already exists, use --force to overwrite", display(&path)),
        ));
    }

    Ok(config.save(Some(path))?)
}

pub fn handle(
    config: &CashdeskConfig,
    config_path: Option<PathBuf>,
    action: ConfigAction,
) -> AppResult<()> {
    match action {
        ConfigAction::Show => print_json(&view(config, config_path)),
        ConfigAction::Init { force } => {
            let path = init(config, config_path, force)?;
            info!(path = %super::display(&path), "Config file written");
            println!("{}", display(&path));
            Ok(())
        }
    }
}
