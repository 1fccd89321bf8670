pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{
    holding::Holding, portfolio::Portfolio, report::PortfolioReport, settings::Settings,
};
use providers::registry::QuoteProviderRegistry;
use services::{portfolio_service::PortfolioService, quote_service::QuoteService};
use storage::manager::StorageManager;
use tracing::{info, warn};

use errors::CoreError;

/// Main entry point for the Stock Tracker core library.
/// Holds the portfolio state and all services needed to operate on it.
///
/// Every mutating operation (add/update/remove) saves the portfolio file
/// immediately. Refreshing prices only changes memory; the refreshed
/// figures reach disk with the next save.
#[must_use]
pub struct StockTracker {
    portfolio: Portfolio,
    settings: Settings,
    portfolio_service: PortfolioService,
    quote_service: QuoteService,
    /// Tracks whether in-memory state differs from what was last saved/loaded.
    dirty: bool,
}

impl std::fmt::Debug for StockTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockTracker")
            .field("holdings", &self.portfolio.len())
            .field("path", &self.settings.portfolio_path)
            .field("providers", &self.quote_service.provider_names())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl StockTracker {
    /// Load the portfolio named by `settings`, using the default providers.
    /// A missing file yields an empty portfolio.
    pub fn load(settings: Settings) -> Result<Self, CoreError> {
        let registry = QuoteProviderRegistry::new_with_defaults(&settings.api_keys);
        Self::load_with_registry(settings, registry)
    }

    /// Like [`StockTracker::load`], but an unreadable or corrupt file is
    /// logged and treated as an empty portfolio. The file itself is left alone
    /// until the next save.
    pub fn open(settings: Settings) -> Self {
        let registry = QuoteProviderRegistry::new_with_defaults(&settings.api_keys);
        Self::open_with_registry(settings, registry)
    }

    /// Load with an explicit set of quote providers.
    pub fn load_with_registry(
        settings: Settings,
        registry: QuoteProviderRegistry,
    ) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_from_file(&settings.portfolio_path)?;
        Ok(Self::build(portfolio, settings, registry))
    }

    /// Open with an explicit set of quote providers, falling back to empty on load errors.
    pub fn open_with_registry(settings: Settings, registry: QuoteProviderRegistry) -> Self {
        let portfolio = match StorageManager::load_from_file(&settings.portfolio_path) {
            Ok(portfolio) => portfolio,
            Err(e) => {
                warn!(
                    path = %settings.portfolio_path.display(),
                    error = %e,
                    "Error loading portfolio, starting empty"
                );
                Portfolio::new()
            }
        };
        Self::build(portfolio, settings, registry)
    }

    // ── Holding Management ──────────────────────────────────────────

    /// Buy into a new stock today (local calendar date).
    pub async fn add_stock(
        &mut self,
        symbol: &str,
        shares: u64,
        purchase_price: f64,
    ) -> Result<&Holding, CoreError> {
        let today = chrono::Local::now().date_naive();
        self.add_stock_on(symbol, shares, purchase_price, today).await
    }

    /// Add a new holding with an explicit purchase date.
    ///
    /// The symbol is verified with a live quote first; if no provider can
    /// price it, nothing is added and nothing is saved. The verifying quote
    /// also seeds the holding's price and metadata.
    pub async fn add_stock_on(
        &mut self,
        symbol: &str,
        shares: u64,
        purchase_price: f64,
        purchase_date: NaiveDate,
    ) -> Result<&Holding, CoreError> {
        let symbol = Holding::normalize_symbol(symbol)?;
        Holding::validate_position(shares, purchase_price)?;
        self.portfolio_service.ensure_absent(&self.portfolio, &symbol)?;

        let quote = self.quote_service.fetch_quote(&symbol).await?;

        let mut holding = Holding::new(&symbol, shares, purchase_price, purchase_date)?;
        holding.apply_quote(&quote);
        self.portfolio_service
            .add_holding(&mut self.portfolio, holding)?;
        self.dirty = true;
        info!(%symbol, shares, purchase_price, "Added holding");

        self.save()?;
        self.portfolio
            .get(&symbol)
            .ok_or(CoreError::HoldingNotFound(symbol))
    }

    /// Remove a holding. An unknown symbol is reported without touching the file.
    pub fn remove_stock(&mut self, symbol: &str) -> Result<Holding, CoreError> {
        let removed = self
            .portfolio_service
            .remove_holding(&mut self.portfolio, symbol)?;
        self.dirty = true;
        info!(symbol = %removed.symbol, "Removed holding");
        self.save()?;
        Ok(removed)
    }

    /// Change the share count and purchase price of an existing holding.
    pub fn update_stock(
        &mut self,
        symbol: &str,
        shares: u64,
        purchase_price: f64,
    ) -> Result<&Holding, CoreError> {
        self.portfolio_service
            .update_holding(&mut self.portfolio, symbol, shares, purchase_price)?;
        self.dirty = true;
        info!(symbol = %symbol.trim().to_uppercase(), shares, purchase_price, "Updated holding");
        self.save()?;
        self.portfolio
            .get(symbol)
            .ok_or_else(|| CoreError::HoldingNotFound(symbol.trim().to_uppercase()))
    }

    // ── Prices & Report ─────────────────────────────────────────────

    /// Refresh every holding sequentially. Failed fetches leave the holding
    /// as it was. Returns how many holdings changed. Nothing is saved.
    pub async fn refresh_all(&mut self) -> usize {
        let changed = self
            .quote_service
            .refresh_portfolio(&mut self.portfolio)
            .await;
        if changed > 0 {
            self.dirty = true;
        }
        changed
    }

    /// Refresh all holdings, then compute the profit/loss report.
    pub async fn portfolio_report(&mut self) -> PortfolioReport {
        if !self.portfolio.is_empty() {
            self.refresh_all().await;
        }
        self.cached_report()
    }

    /// Compute the report from the prices already in memory (no network).
    #[must_use]
    pub fn cached_report(&self) -> PortfolioReport {
        self.portfolio_service.build_report(&self.portfolio)
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Write the whole portfolio to the configured file.
    /// Clears the unsaved-changes flag on success.
    pub fn save(&mut self) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, &self.settings.portfolio_path)?;
        self.dirty = false;
        Ok(())
    }

    /// The portfolio as the JSON document that would be saved.
    pub fn to_json(&self) -> Result<String, CoreError> {
        StorageManager::save_to_string(&self.portfolio)
    }

    /// Returns `true` if the portfolio has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Case-insensitive lookup of a single holding.
    #[must_use]
    pub fn get_holding(&self, symbol: &str) -> Option<&Holding> {
        self.portfolio.get(symbol)
    }

    /// All holdings in insertion order.
    #[must_use]
    pub fn holdings(&self) -> Vec<&Holding> {
        self.portfolio.iter().collect()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.quote_service.provider_names()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(portfolio: Portfolio, settings: Settings, registry: QuoteProviderRegistry) -> Self {
        Self {
            portfolio,
            settings,
            portfolio_service: PortfolioService::new(),
            quote_service: QuoteService::new(registry),
            dirty: false,
        }
    }
}
