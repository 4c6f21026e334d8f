mod config;
pub mod database;

pub use config::{AiConfig, Config, FocusConfig, RewardsConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::StoreError;

/// Returns `~/.config/timequest[-dev]/` based on TIMEQUEST_ENV.
///
/// Set TIMEQUEST_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMEQUEST_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timequest-dev")
    } else {
        base_dir.join("timequest")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StoreError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
