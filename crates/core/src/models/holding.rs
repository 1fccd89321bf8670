use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::company_info::CompanyInfo;
use super::quote::Quote;

/// One owned stock position.
///
/// `current_price == 0.0` means the price has never been fetched
/// successfully, not that the stock trades at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    /// Ticker symbol, uppercased. Identity key inside a portfolio.
    pub symbol: String,

    /// Number of shares held (always positive)
    pub shares: u64,

    /// Price per share at acquisition (always positive)
    pub purchase_price: f64,

    /// Calendar date of acquisition
    pub purchase_date: NaiveDate,

    /// Last successfully fetched price, 0.0 until the first fetch
    pub current_price: f64,

    /// Last successfully fetched company metadata
    pub company_info: CompanyInfo,
}

/// Persisted shape of a holding inside the portfolio file.
///
/// `symbol` is written for readability but ignored on load: the map key
/// of the enclosing document is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    #[serde(default)]
    pub symbol: Option<String>,
    pub shares: u64,
    pub purchase_price: f64,
    pub purchase_date: NaiveDate,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub company_info: CompanyInfo,
}

impl Holding {
    /// Create a holding with no market data yet.
    pub fn new(
        symbol: &str,
        shares: u64,
        purchase_price: f64,
        purchase_date: NaiveDate,
    ) -> Result<Self, CoreError> {
        let symbol = Self::normalize_symbol(symbol)?;
        Self::validate_position(shares, purchase_price)?;
        Ok(Self {
            symbol,
            shares,
            purchase_price,
            purchase_date,
            current_price: 0.0,
            company_info: CompanyInfo::default(),
        })
    }

    /// Trim and uppercase a ticker symbol, rejecting anything that cannot be one.
    pub fn normalize_symbol(symbol: &str) -> Result<String, CoreError> {
        let upper = symbol.trim().to_uppercase();
        if upper.is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }
        if !upper
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
        {
            return Err(CoreError::ValidationError(format!(
                "Invalid symbol '{symbol}': only letters, digits and . - ^ = are allowed"
            )));
        }
        Ok(upper)
    }

    /// Share count must be positive, purchase price finite and positive.
    pub fn validate_position(shares: u64, purchase_price: f64) -> Result<(), CoreError> {
        if shares == 0 {
            return Err(CoreError::ValidationError(
                "Number of shares must be positive".into(),
            ));
        }
        if !purchase_price.is_finite() || purchase_price <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Purchase price must be a positive amount, got {purchase_price}"
            )));
        }
        Ok(())
    }

    /// Overwrite price and metadata with whatever the quote carries.
    /// Fields the quote lacks keep their previous values.
    /// Returns `true` if anything changed.
    pub fn apply_quote(&mut self, quote: &Quote) -> bool {
        let mut changed = false;
        if quote.price.is_finite() && quote.price > 0.0 && quote.price != self.current_price {
            self.current_price = quote.price;
            changed = true;
        }
        if let Some(info) = &quote.info {
            if !info.is_empty() && *info != self.company_info {
                self.company_info = info.clone();
                changed = true;
            }
        }
        changed
    }

    /// Whether a price has ever been fetched for this holding.
    pub fn has_price(&self) -> bool {
        self.current_price > 0.0
    }

    /// shares × purchase price
    pub fn cost_basis(&self) -> f64 {
        self.shares as f64 * self.purchase_price
    }

    /// shares × current price
    pub fn market_value(&self) -> f64 {
        self.shares as f64 * self.current_price
    }

    pub fn profit_loss(&self) -> f64 {
        self.market_value() - self.cost_basis()
    }

    /// Percentage move of the current price relative to the purchase price.
    pub fn change_percent(&self) -> f64 {
        (self.current_price / self.purchase_price - 1.0) * 100.0
    }

    pub fn to_record(&self) -> HoldingRecord {
        HoldingRecord {
            symbol: Some(self.symbol.clone()),
            shares: self.shares,
            purchase_price: self.purchase_price,
            purchase_date: self.purchase_date,
            current_price: self.current_price,
            company_info: self.company_info.clone(),
        }
    }

    /// Rebuild a holding from its persisted record.
    /// The symbol comes from `key`; `record.symbol` is ignored.
    pub fn from_record(record: HoldingRecord, key: &str) -> Result<Self, CoreError> {
        let mut holding = Self::new(key, record.shares, record.purchase_price, record.purchase_date)?;
        if record.current_price.is_finite() && record.current_price > 0.0 {
            holding.current_price = record.current_price;
        }
        holding.company_info = record.company_info;
        Ok(holding)
    }
}
