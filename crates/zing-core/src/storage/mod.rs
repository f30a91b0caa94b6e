mod config;

pub use config::{Config, ReconcileConfig, ServerConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `ZING_HOME` wins when set. Otherwise `~/.config/zing[-dev]/`, with
/// `ZING_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ZING_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ZING_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("zing-dev")
            } else {
                base_dir.join("zing")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Location of the retry queue for failed confirmations.
pub fn pending_queue_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("pending_confirmations.json"))
}
