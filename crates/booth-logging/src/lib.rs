// Logging module - logger setup and request logging
pub mod request_logger;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

// Re-export request logging functions
pub use request_logger::{
    log_request,
    log_request_to_file,
    log_response,
    log_response_to_file,
    mask_api_key,
};

/// Name of the per-user application directory under $HOME
pub const APP_DIR_NAME: &str = ".booth-assistant";

/// Initialise the `log` facade backed by env_logger.
///
/// `RUST_LOG` always wins; otherwise `--verbose` selects `debug` and the
/// default is `warn`. Calling this twice is harmless.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .format_timestamp_millis()
    .try_init();
}

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = if max_chars >= 3 { max_chars - 3 } else { 0 };
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Create `dir` (and parents) if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(dir.to_path_buf())
}

/// Get or create the base application directory (~/.booth-assistant)
/// This is shared between logging and history storage
pub fn get_app_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    ensure_dir(&PathBuf::from(home_dir).join(APP_DIR_NAME))
}

/// Get or create the logs directory below the given data directory
pub fn get_logs_dir(data_dir: &Path) -> Result<PathBuf> {
    ensure_dir(&data_dir.join("logs"))
}
