use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stock_tracker_core::models::settings::{Settings, ALPHAVANTAGE_KEY, DEFAULT_PORTFOLIO_FILE};

/// Track stock holdings, live prices and profit/loss.
///
/// Without a subcommand an interactive menu is started.
#[derive(Debug, Parser)]
#[command(name = "stock-tracker", version, about)]
pub(crate) struct Args {
    /// Portfolio file to load and save
    #[arg(short = 'f', long, env = "STOCK_TRACKER_FILE", default_value = DEFAULT_PORTFOLIO_FILE)]
    pub file: PathBuf,

    /// Alpha Vantage API key (adds a fallback source for prices and company information)
    #[arg(long, env = "ALPHAVANTAGE_API_KEY", hide_env_values = true)]
    pub alphavantage_key: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Add a new holding bought today
    Add {
        symbol: String,
        shares: u64,
        /// Purchase price per share
        price: f64,
    },
    /// Remove a holding
    Remove { symbol: String },
    /// Change shares and purchase price of an existing holding
    Update {
        symbol: String,
        shares: u64,
        /// Purchase price per share
        price: f64,
    },
    /// Refresh prices and print the portfolio
    View {
        /// Use the prices stored in the file instead of fetching
        #[arg(long)]
        offline: bool,
    },
}

impl Args {
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::with_path(&self.file);
        if let Some(key) = &self.alphavantage_key {
            settings.set_api_key(ALPHAVANTAGE_KEY, key);
        }
        settings
    }
}
