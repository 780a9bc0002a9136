use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the inner-joined price table: a date present in both input
/// series, with both closes guaranteed present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub close_a: f64,
    pub close_b: f64,
}

/// Daily fractional returns for both tickers on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnRow {
    pub date: NaiveDate,
    pub return_a: f64,
    pub return_b: f64,
}

/// Pearson correlation outcome. `Undefined` covers the zero-variance case so
/// callers branch explicitly instead of receiving a NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "value")]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

impl Correlation {
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Defined(v) => Some(*v),
            Correlation::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Correlation::Defined(_))
    }
}

/// Trailing-window correlation estimate for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Descriptive statistics over one ticker's daily-return series. Standard
/// deviation uses the sample (n-1) denominator; quartiles use linear
/// interpolation between the closest ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Everything the engine derives for one ticker pair. Plain data, no UI
/// coupling; the presentation layer turns this into charts and tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairAnalysis {
    pub aligned: Vec<AlignedRow>,
    pub returns: Vec<ReturnRow>,
    pub correlation: Correlation,
    pub rolling: Vec<RollingPoint>,
    pub stats_a: SummaryStats,
    pub stats_b: SummaryStats,
}

impl PairAnalysis {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.aligned.first().map(|r| r.date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.aligned.last().map(|r| r.date)
    }
}

/// Magnitude cutoffs for the strength label. Configurable; the defaults are
/// the conventional 0.4 / 0.7 breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthThresholds {
    pub moderate: f64,
    pub strong: f64,
}

impl Default for StrengthThresholds {
    fn default() -> Self {
        Self {
            moderate: 0.4,
            strong: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
    Zero,
}

/// Classification of a defined correlation value: magnitude label and sign,
/// reported independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub strength: Strength,
    pub sign: Sign,
}

impl Interpretation {
    /// Classify a correlation value against the configured thresholds.
    pub fn classify(value: f64, thresholds: &StrengthThresholds) -> Self {
        let magnitude = value.abs();
        let strength = if magnitude >= thresholds.strong {
            Strength::Strong
        } else if magnitude >= thresholds.moderate {
            Strength::Moderate
        } else {
            Strength::Weak
        };
        let sign = if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        };
        Self { strength, sign }
    }

    /// One-line guidance for display next to the gauge.
    pub fn guidance(&self) -> &'static str {
        match (self.strength, self.sign) {
            (Strength::Weak, _) => {
                "Little linear relationship between the two; holding both may offer diversification."
            }
            (Strength::Moderate, Sign::Negative) => {
                "The two tend to move in opposite directions; one may partially offset the other."
            }
            (Strength::Moderate, _) => {
                "The two tend to move in the same general direction; partial diversification only."
            }
            (Strength::Strong, Sign::Negative) => {
                "The two move almost inversely in lockstep; gains in one tend to offset losses in the other."
            }
            (Strength::Strong, _) => {
                "The two move almost in lockstep; holding both adds little diversification."
            }
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strength = match self.strength {
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
        };
        let sign = match self.sign {
            Sign::Positive => "positive",
            Sign::Negative => "negative",
            Sign::Zero => "zero",
        };
        write!(f, "{strength} {sign} correlation")
    }
}
