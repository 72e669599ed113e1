mod credentials;
mod settings;

pub use credentials::CredentialStore;
pub use settings::Settings;

use crate::error::{ReportError, Result};
use std::path::{Path, PathBuf};

/// Directory name under the platform data dir
const CONFIG_DIR_NAME: &str = "session-report";

/// Get the data directory path for storing credentials
/// Returns ~/.local/share/session-report on Unix, ~/Library/Application Support/session-report on macOS
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|p| p.join(CONFIG_DIR_NAME))
        .ok_or_else(|| ReportError::config("Could not determine data directory"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
