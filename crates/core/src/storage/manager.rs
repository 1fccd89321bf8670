use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::format;

/// High-level storage operations: save/load a portfolio to/from JSON text or files.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a portfolio to its pretty-printed JSON document.
    pub fn save_to_string(portfolio: &Portfolio) -> Result<String, CoreError> {
        format::encode(portfolio)
    }

    /// Parse a portfolio from a JSON document.
    pub fn load_from_str(text: &str) -> Result<Portfolio, CoreError> {
        format::decode(text)
    }

    /// Save portfolio to disk.
    ///
    /// The document is written to a sibling temp file and renamed over
    /// `path`, so a failed write never truncates the previous file.
    pub fn save_to_file(portfolio: &Portfolio, path: &Path) -> Result<(), CoreError> {
        let text = Self::save_to_string(portfolio)?;
        let tmp = Self::temp_path(path);
        std::fs::write(&tmp, text)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        info!(path = %path.display(), holdings = portfolio.len(), "Portfolio saved");
        Ok(())
    }

    /// Load portfolio from disk. A missing file is an empty portfolio, not an error.
    pub fn load_from_file(path: &Path) -> Result<Portfolio, CoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "No portfolio file yet, starting empty");
            return Ok(Portfolio::new());
        }
        let text = std::fs::read_to_string(path)?;
        let portfolio = Self::load_from_str(&text)?;
        debug!(path = %path.display(), holdings = portfolio.len(), "Portfolio loaded");
        Ok(portfolio)
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}
