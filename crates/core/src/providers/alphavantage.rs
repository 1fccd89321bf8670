use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::company_info::CompanyInfo;
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage API provider for stock prices and company overviews.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (set via settings as "alphavantage").
/// - **Coverage**: 100k+ global equity symbols.
///
/// The `OVERVIEW` endpoint is the only source of company metadata
/// (name, sector, valuation figures, 52-week range).
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

/// `OVERVIEW` returns every value as a string, using "None" or "-" for gaps.
/// Its key names match `CompanyInfo`'s serialized names.
#[derive(Deserialize)]
struct OverviewResponse {
    #[serde(flatten)]
    info: CompanyInfo,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// Rate-limit and key errors come back as HTTP 200 with a prose message.
fn throttle_message(note: Option<String>, information: Option<String>) -> Option<String> {
    note.or(information)
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp: GlobalQuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        if let Some(message) = throttle_message(resp.note, resp.information) {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }

        let price_str = resp
            .global_quote
            .and_then(|q| q.price)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_uppercase(),
            })?;

        price_str.trim().parse().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Invalid price format for {symbol}: {e}"),
        })
    }

    async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfo, CoreError> {
        let resp: OverviewResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse overview for {symbol}: {e}"),
            })?;

        if let Some(message) = throttle_message(resp.note, resp.information) {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }

        // Unknown symbols produce an empty JSON object.
        if resp.info.is_empty() {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No overview data for {symbol}"),
            });
        }

        Ok(resp.info)
    }
}
