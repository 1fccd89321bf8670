use thiserror::Error;

/// Unified error type for the entire stock-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / File ──────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No quote provider available: {0}")]
    NoProvider(String),

    #[error("Price not available for {symbol}")]
    PriceNotAvailable { symbol: String },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Stock {0} already exists in portfolio. Use update to modify it.")]
    DuplicateHolding(String),

    #[error("Stock {0} not found in portfolio")]
    HoldingNotFound(String),
}

impl CoreError {
    /// The market-data provider could not deliver a quote.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            CoreError::Api { .. }
                | CoreError::Network(_)
                | CoreError::NoProvider(_)
                | CoreError::PriceNotAvailable { .. }
        )
    }

    /// Reading or writing the portfolio file failed.
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidFileFormat(_)
                | CoreError::Serialization(_)
                | CoreError::Deserialization(_)
                | CoreError::FileIO(_)
        )
    }

    /// The request was rejected by a domain rule.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            CoreError::ValidationError(_)
                | CoreError::DuplicateHolding(_)
                | CoreError::HoldingNotFound(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, including the apikey query parameter.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Replace every URL query string in `msg`, keeping the text around it.
/// A query ends at whitespace or a closing parenthesis.
fn redact_query(msg: &str) -> String {
    let mut out = String::with_capacity(msg.len());
    let mut rest = msg;
    while let Some(idx) = rest.find('?') {
        out.push_str(&rest[..=idx]);
        let tail = &rest[idx + 1..];
        let end = tail
            .find(|c: char| c.is_whitespace() || c == ')')
            .unwrap_or(tail.len());
        if end > 0 {
            out.push_str("<query redacted>");
        }
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}
