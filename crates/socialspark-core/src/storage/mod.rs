mod config;

pub use config::{ApiConfig, Config, SparksConfig, UserConfig};

use crate::error::ConfigError;
use std::path::PathBuf;

/// Returns `~/.config/socialspark[-dev]/` based on SOCIALSPARK_ENV.
///
/// Set SOCIALSPARK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SOCIALSPARK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("socialspark-dev")
    } else {
        base_dir.join("socialspark")
    };

    std::fs::create_dir_all(&dir).map_err(ConfigError::DataDir)?;
    Ok(dir)
}
