//! Error Types

use thiserror::Error;

use crate::model::{Coin, Provider};

/// Result type alias for price resolution
pub type Result<T> = std::result::Result<T, PriceError>;

/// Price resolution error types
#[derive(Error, Debug)]
pub enum PriceError {
    /// Provider name outside the known set
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Ticker symbol that does not parse to a known coin
    #[error("Unknown coin symbol: {0}")]
    UnknownCoin(String),

    /// No conversion path from this coin to the provider's quote currency
    #[error("No {provider} bridge for coin {coin}")]
    UnsupportedCoin { coin: Coin, provider: Provider },

    /// Remote endpoint returned an empty or null result set
    #[error("No price data returned for pair {pair}")]
    DataUnavailable { pair: String },

    /// Paging bound exceeded before the series advanced past the target
    #[error("No bracket found for pair {pair} within {pages} pages")]
    BracketNotFound { pair: String, pages: u32 },

    /// History for the pair starts after the requested date
    #[error("History for pair {pair} begins after target time {target}")]
    MissingHistory { pair: String, target: i64 },

    /// Network or HTTP failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for PriceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl PriceError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PriceError::DataUnavailable { .. } | PriceError::Transport(_)
        )
    }
}
