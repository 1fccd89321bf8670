use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder shown for any metadata field the provider did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Descriptive metadata for a listed company.
///
/// Every field is optional: providers routinely omit some of them
/// (ETFs have no sector, loss-making companies have no P/E, ...).
/// Serialized keys match the names used in the portfolio file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(
        rename = "Name",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    #[serde(
        rename = "Sector",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sector: Option<String>,

    #[serde(
        rename = "MarketCapitalization",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub market_cap: Option<f64>,

    #[serde(
        rename = "PERatio",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub pe_ratio: Option<f64>,

    #[serde(
        rename = "DividendYield",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub dividend_yield: Option<f64>,

    #[serde(
        rename = "52WeekHigh",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub week_52_high: Option<f64>,

    #[serde(
        rename = "52WeekLow",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub week_52_low: Option<f64>,
}

impl CompanyInfo {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sector.is_none()
            && self.market_cap.is_none()
            && self.pe_ratio.is_none()
            && self.dividend_yield.is_none()
            && self.week_52_high.is_none()
            && self.week_52_low.is_none()
    }

    /// Render an optional text field, falling back to `N/A`.
    pub fn display_text(value: &Option<String>) -> String {
        value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Render an optional numeric field, falling back to `N/A`.
    pub fn display_number(value: Option<f64>) -> String {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Older files store `"N/A"` (or numbers) where we expect text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !is_placeholder(&s) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts a JSON number, a numeric string, `null` or the `"N/A"` placeholder.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) if !is_placeholder(&s) => {
            s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    })
}

fn is_placeholder(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) || trimmed == "None"
}
