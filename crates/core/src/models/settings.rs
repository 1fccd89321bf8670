use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default location of the portfolio file, relative to the working directory.
pub const DEFAULT_PORTFOLIO_FILE: &str = "portfolio.json";

/// Provider id under which the Alpha Vantage API key is stored.
pub const ALPHAVANTAGE_KEY: &str = "alphavantage";

/// Runtime configuration for a tracker instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Where the portfolio is loaded from and saved to.
    pub portfolio_path: PathBuf,

    /// Optional API keys for providers that require them.
    /// Keys: provider id (e.g., "alphavantage").
    /// Values: the API key string.
    pub api_keys: HashMap<String, String>,
}

impl Settings {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            portfolio_path: path.into(),
            ..Self::default()
        }
    }

    /// Register an API key; blank keys are ignored.
    pub fn set_api_key(&mut self, provider: impl Into<String>, key: impl Into<String>) {
        let key = key.into();
        if !key.trim().is_empty() {
            self.api_keys.insert(provider.into(), key.trim().to_string());
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            portfolio_path: PathBuf::from(DEFAULT_PORTFOLIO_FILE),
            api_keys: HashMap::new(),
        }
    }
}
