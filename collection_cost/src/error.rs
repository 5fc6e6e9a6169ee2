//! Error types for collection_cost

use riftbound_common::MarketError;

/// Unified error type for collection_cost operations
///
/// Only run-level failures live here. Per-card problems (unresolved names,
/// failed listing fetches) are absorbed by the pricing pipeline and reported
/// as card outcomes instead.
#[derive(Debug, thiserror::Error)]
pub enum PricerError {
    /// Missing credential, unknown expansion name or similar setup problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog or inventory CSV could not be read or parsed
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Report could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Marketplace request failed where the caller cannot continue without it
    #[error(transparent)]
    Market(#[from] MarketError),
}

impl PricerError {
    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        PricerError::Csv {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result alias for collection_cost operations
pub type Result<T> = std::result::Result<T, PricerError>;
