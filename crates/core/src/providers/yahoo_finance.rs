use async_trait::async_trait;
use tokio::sync::Mutex;
use yahoo_finance_api::{YQuoteSummary, YahooConnector};

use crate::errors::CoreError;
use crate::models::company_info::CompanyInfo;
use super::traits::QuoteProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance API provider for stock/equity prices and company profiles.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Prices come from the chart endpoint and are returned in the stock's
/// native currency (typically USD). Company metadata comes from the
/// quote-summary endpoint, which needs a session cookie and crumb; the
/// connector caches both, so it sits behind a mutex.
pub struct YahooFinanceProvider {
    connector: Mutex<YahooConnector>,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self {
            connector: Mutex::new(connector),
        })
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp = self
            .connector
            .lock()
            .await
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        // An unknown symbol or a day without trades yields an empty series.
        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No quote data for {symbol}: {e}"),
        })?;

        Ok(quote.close)
    }

    async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfo, CoreError> {
        let summary = self
            .connector
            .lock()
            .await
            .get_ticker_info(symbol)
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch profile for {symbol}: {e}"),
            })?;

        let info = company_info_from_summary(&summary);
        if info.is_empty() {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No profile data for {symbol}"),
            });
        }
        Ok(info)
    }
}

/// Pick the metadata fields out of a quote-summary response.
fn company_info_from_summary(summary: &YQuoteSummary) -> CompanyInfo {
    let Some(data) = summary
        .quote_summary
        .as_ref()
        .and_then(|s| s.result.as_ref())
        .and_then(|r| r.first())
    else {
        return CompanyInfo::default();
    };

    let text = |s: &Option<String>| s.as_ref().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let detail = data.summary_detail.as_ref();
    let number = |v: Option<f64>| v.filter(|n| n.is_finite());

    CompanyInfo {
        name: data
            .quote_type
            .as_ref()
            .and_then(|q| text(&q.long_name).or_else(|| text(&q.short_name))),
        sector: data.asset_profile.as_ref().and_then(|p| text(&p.sector)),
        market_cap: detail.and_then(|d| d.market_cap).map(|v| v as f64),
        pe_ratio: number(detail.and_then(|d| d.trailing_pe)),
        dividend_yield: number(detail.and_then(|d| d.dividend_yield)),
        week_52_high: number(detail.and_then(|d| d.fifty_two_week_high)),
        week_52_low: number(detail.and_then(|d| d.fifty_two_week_low)),
    }
}
