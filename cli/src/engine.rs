//! Returns and correlation pipeline.
//!
//! Pure functions over immutable price series: inner-join alignment, daily
//! fractional returns, overall and rolling Pearson correlation, and
//! per-ticker descriptive statistics. Every output is recomputed from scratch
//! per call; there is no state here.

use crate::error::ComputeError;
use crate::models::{
    AlignedRow, Correlation, PairAnalysis, PriceSeries, ReturnRow, RollingPoint, SummaryStats,
};
use tracing::debug;

/// Run the full pipeline for one ticker pair.
///
/// `window_days` is the trailing rolling-correlation window measured in
/// return rows. Windows that are short or have zero variance in either leg
/// are dropped from the rolling series, never substituted.
pub fn compute(
    series_a: &PriceSeries,
    series_b: &PriceSeries,
    window_days: usize,
) -> Result<PairAnalysis, ComputeError> {
    let aligned = align(series_a, series_b);
    if aligned.is_empty() {
        return Err(ComputeError::EmptyData);
    }

    let returns = daily_returns(&aligned);
    if returns.len() < 2 {
        return Err(ComputeError::InsufficientData {
            rows: returns.len(),
        });
    }

    debug!(
        symbol_a = %series_a.symbol,
        symbol_b = %series_b.symbol,
        aligned_rows = aligned.len(),
        return_rows = returns.len(),
        window_days,
        "Computing pair analysis"
    );

    let returns_a: Vec<f64> = returns.iter().map(|r| r.return_a).collect();
    let returns_b: Vec<f64> = returns.iter().map(|r| r.return_b).collect();

    let correlation = match pearson(&returns_a, &returns_b) {
        Some(value) => Correlation::Defined(value),
        None => Correlation::Undefined,
    };

    Ok(PairAnalysis {
        rolling: rolling_correlation(&returns, window_days),
        stats_a: summary_stats(&returns_a),
        stats_b: summary_stats(&returns_b),
        aligned,
        returns,
        correlation,
    })
}

/// Inner join of two price series on date. Dates present in only one series
/// are discarded silently. Both inputs are ascending by date (enforced by
/// `PriceSeries::new`), so a single merge pass suffices.
pub fn align(series_a: &PriceSeries, series_b: &PriceSeries) -> Vec<AlignedRow> {
    let mut rows = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < series_a.points.len() && j < series_b.points.len() {
        let a = &series_a.points[i];
        let b = &series_b.points[j];
        match a.date.cmp(&b.date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                rows.push(AlignedRow {
                    date: a.date,
                    close_a: a.close,
                    close_b: b.close,
                });
                i += 1;
                j += 1;
            }
        }
    }

    rows
}

/// Daily fractional returns between consecutive aligned rows. The first row
/// has nothing to diff against and is dropped, so the output has exactly one
/// fewer row than the input.
pub fn daily_returns(aligned: &[AlignedRow]) -> Vec<ReturnRow> {
    aligned
        .windows(2)
        .map(|pair| ReturnRow {
            date: pair[1].date,
            return_a: pair[1].close_a / pair[0].close_a - 1.0,
            return_b: pair[1].close_b / pair[0].close_b - 1.0,
        })
        .collect()
}

/// Pearson product-moment correlation of two equal-length samples.
///
/// Returns `None` when fewer than two observations are available or when
/// either sample has zero variance, where the coefficient is mathematically
/// undefined. A defined result is clamped to [-1, 1] so rounding drift never
/// leaks out of range.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Trailing-window Pearson correlation over the returns table.
///
/// An entry is emitted for each date whose preceding `window_days` return
/// rows (inclusive of the date itself) are fully available, so the first
/// possible entry sits at return-row index `window_days - 1`. Zero-variance
/// windows are dropped.
pub fn rolling_correlation(returns: &[ReturnRow], window_days: usize) -> Vec<RollingPoint> {
    if window_days == 0 || returns.len() < window_days {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(returns.len() - window_days + 1);
    for window in returns.windows(window_days) {
        let xs: Vec<f64> = window.iter().map(|r| r.return_a).collect();
        let ys: Vec<f64> = window.iter().map(|r| r.return_b).collect();
        if let Some(value) = pearson(&xs, &ys) {
            points.push(RollingPoint {
                date: window[window_days - 1].date,
                value,
            });
        }
    }

    points
}

/// Descriptive statistics over one return series: count, arithmetic mean,
/// sample standard deviation (n-1), min, quartiles by linear interpolation,
/// max. An empty slice yields a zeroed block rather than NaN.
pub fn summary_stats(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats {
            count: 0,
            mean: 0.0,
            std_dev: 0.0,
            min: 0.0,
            q25: 0.0,
            median: 0.0,
            q75: 0.0,
            max: 0.0,
        };
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std_dev = if n > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    SummaryStats {
        count: n,
        mean,
        std_dev,
        min: sorted[0],
        q25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        q75: percentile(&sorted, 0.75),
        max: sorted[n - 1],
    }
}

/// Linear-interpolation percentile over an ascending non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
