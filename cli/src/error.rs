use thiserror::Error;

/// Failures while retrieving price history from the market-data provider.
/// None of these are retried automatically; each computation surfaces its
/// first failure to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider does not recognize the symbol, or returned an empty
    /// history for it.
    #[error("ticker '{symbol}' was not recognized by the market data provider")]
    NotFound { symbol: String },

    /// Transport or availability failure upstream.
    #[error("market data request failed: {0}")]
    Provider(String),

    /// The provider answered, but with a payload we cannot use.
    #[error("market data provider returned an unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Provider(error.to_string())
    }
}

/// Failures inside the returns/correlation pipeline. Dates dropped during
/// alignment are defined behavior, not errors; these cover the cases where
/// nothing meaningful can be computed at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComputeError {
    /// The two price series share no trading dates.
    #[error("the two price series have no overlapping dates")]
    EmptyData,

    /// Fewer than two aligned return rows, so correlation is meaningless.
    #[error("not enough overlapping history to compute returns ({rows} return rows, need at least 2)")]
    InsufficientData { rows: usize },
}
