pub mod analysis;
pub mod price;

pub use analysis::{
    AlignedRow, Correlation, Interpretation, PairAnalysis, ReturnRow, RollingPoint, Sign,
    Strength, StrengthThresholds, SummaryStats,
};
pub use price::{Period, PricePoint, PriceSeries, TickerHistory};
