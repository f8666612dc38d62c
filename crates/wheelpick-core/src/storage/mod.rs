mod config;

pub use config::{Config, FeedbackConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/wheelpick[-dev]/` based on WHEELPICK_ENV.
///
/// Set WHEELPICK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WHEELPICK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wheelpick-dev")
    } else {
        base_dir.join("wheelpick")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
