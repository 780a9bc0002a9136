use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One daily closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closing-price history for a single ticker, ascending by date with no
/// duplicate dates. Construction enforces both properties so downstream code
/// can rely on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw observations. Points are sorted by date and
    /// deduplicated, keeping the last observation for a repeated date.
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by(|later, earlier| {
            if later.date == earlier.date {
                // dedup_by removes `later`; keep its value in the surviving slot
                earlier.close = later.close;
                true
            } else {
                false
            }
        });
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// A fetched history plus the provider's best-effort display name for the
/// ticker. The name is enrichment only; `None` means callers fall back to the
/// raw symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerHistory {
    pub series: PriceSeries,
    pub short_name: Option<String>,
}

impl TickerHistory {
    /// Display name for chart labels, falling back to the raw symbol.
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.series.symbol)
    }
}

/// Lookback period accepted by the market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// Wire value understood by the provider's chart endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Period::OneMonth => "1 month",
            Period::ThreeMonths => "3 months",
            Period::SixMonths => "6 months",
            Period::OneYear => "1 year",
            Period::TwoYears => "2 years",
            Period::FiveYears => "5 years",
            Period::Max => "max available",
        }
    }

    pub fn all() -> &'static [Period] {
        &[
            Period::OneMonth,
            Period::ThreeMonths,
            Period::SixMonths,
            Period::OneYear,
            Period::TwoYears,
            Period::FiveYears,
            Period::Max,
        ]
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::OneYear
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::all()
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| {
                format!(
                    "unknown period '{}', expected one of: {}",
                    s,
                    Period::all()
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn series_sorts_and_dedups_on_construction() {
        let series = PriceSeries::new(
            "7203.T",
            vec![
                PricePoint { date: d("2024-01-03"), close: 101.0 },
                PricePoint { date: d("2024-01-02"), close: 100.0 },
                PricePoint { date: d("2024-01-03"), close: 102.0 },
            ],
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].date, d("2024-01-02"));
        // Later observation wins for a duplicated date
        assert_eq!(series.points[1].close, 102.0);
        assert_eq!(series.first_date(), Some(d("2024-01-02")));
        assert_eq!(series.last_date(), Some(d("2024-01-03")));
    }

    #[test]
    fn period_round_trips_through_str() {
        for period in Period::all() {
            assert_eq!(period.as_str().parse::<Period>().unwrap(), *period);
        }
        assert!("7d".parse::<Period>().is_err());
    }

    #[test]
    fn display_name_falls_back_to_symbol() {
        let history = TickerHistory {
            series: PriceSeries::new("6758.T", vec![]),
            short_name: None,
        };
        assert_eq!(history.display_name(), "6758.T");

        let named = TickerHistory {
            short_name: Some("Sony Group Corporation".to_string()),
            ..history
        };
        assert_eq!(named.display_name(), "Sony Group Corporation");
    }
}
