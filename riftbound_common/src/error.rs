//! Error types for marketplace access

/// Failure while talking to the CardTrader API
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API answered with a non-success status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Response body was not the expected JSON shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for marketplace operations
pub type MarketResult<T> = std::result::Result<T, MarketError>;
