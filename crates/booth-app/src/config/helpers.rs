use anyhow::Result;
use std::path::{Path, PathBuf};

/// Text-to-speech program available out of the box on this platform
pub fn default_speech_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak"
    }
}

/// The explicit data directory, or `~/.booth-assistant`
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => booth_logging::get_app_dir(),
    }
}
