//! # paircorr - Stock Pair Correlation Analysis
//!
//! Fetches daily price history for two tickers from a market-data provider,
//! aligns the series, and derives the statistics a correlation dashboard
//! renders:
//! - Daily fractional returns over the aligned (inner-joined) dates
//! - Overall Pearson correlation with an explicit undefined sentinel
//! - Trailing rolling-window correlation series
//! - Per-ticker descriptive statistics of the returns
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paircorr::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut client = YahooClient::new(true, 30)?;
//!     let a = client.fetch_history("7203.T", Period::OneYear).await?;
//!     let b = client.fetch_history("6758.T", Period::OneYear).await?;
//!     let analysis = compute(&a.series, &b.series, 60)?;
//!     println!("correlation: {:?}", analysis.correlation);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod models;
pub mod provider;

// Prelude for convenient imports
pub mod prelude {
    //! Most commonly used types and functions.

    pub use crate::engine::compute;
    pub use crate::error::{ComputeError, FetchError};
    pub use crate::models::{
        Correlation, Interpretation, PairAnalysis, Period, PriceSeries, StrengthThresholds,
        SummaryStats, TickerHistory,
    };
    pub use crate::provider::YahooClient;
}
