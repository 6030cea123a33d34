//! Average True Range Percentage over human horizons
//!
//! Each sampling interval maps to a fixed list of trailing windows, e.g. 20
//! daily bars ≈ "1 Month". Adding an interval is a change to [`HORIZON_TABLE`]
//! only.

use serde::Serialize;
use tracing::debug;

use crate::errors::{AnalysisError, Result};
use crate::types::Interval;

/// A trailing window length and the horizon it approximates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon {
    pub window: usize,
    pub label: &'static str,
}

const fn h(window: usize, label: &'static str) -> Horizon {
    Horizon { window, label }
}

const DAILY: &[Horizon] = &[
    h(5, "1 Week"),
    h(20, "1 Month"),
    h(60, "1 Quarter"),
    h(250, "1 Year"),
    h(750, "3 Years"),
    h(1250, "5 Years"),
    h(2500, "10 Years"),
    h(5000, "20 Years"),
    h(12500, "50 Years"),
];

const WEEKLY: &[Horizon] = &[
    h(4, "1 Month"),
    h(12, "1 Quarter"),
    h(52, "1 Year"),
    h(156, "3 Years"),
    h(260, "5 Years"),
    h(520, "10 Years"),
    h(1040, "20 Years"),
    h(2600, "50 Years"),
];

const MONTHLY: &[Horizon] = &[
    h(3, "1 Quarter"),
    h(12, "1 Year"),
    h(36, "3 Years"),
    h(60, "5 Years"),
    h(120, "10 Years"),
    h(240, "20 Years"),
    h(600, "50 Years"),
];

const QUARTERLY: &[Horizon] = &[
    h(4, "1 Year"),
    h(12, "3 Years"),
    h(20, "5 Years"),
    h(40, "10 Years"),
    h(80, "20 Years"),
    h(200, "50 Years"),
];

/// Horizon lists keyed by sampling interval
pub const HORIZON_TABLE: &[(Interval, &[Horizon])] = &[
    (Interval::Daily, DAILY),
    (Interval::Weekly, WEEKLY),
    (Interval::Monthly, MONTHLY),
    (Interval::Quarterly, QUARTERLY),
];

/// Horizons for `interval`, in ascending window order
pub fn horizons(interval: Interval) -> Result<&'static [Horizon]> {
    HORIZON_TABLE
        .iter()
        .find(|(key, _)| *key == interval)
        .map(|(_, horizons)| *horizons)
        .ok_or_else(|| AnalysisError::UnsupportedInterval {
            interval: interval.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtrpRow {
    pub window: usize,
    pub horizon: &'static str,
    /// Defined values that went into the average
    pub observations: usize,
    /// `None` when the window holds no defined value
    pub average_true_range_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtrpTable {
    pub interval: Interval,
    pub rows: Vec<AtrpRow>,
}

/// Mean of the defined values among the last `window` entries
pub fn trailing_mean(series: &[Option<f64>], window: usize) -> (usize, Option<f64>) {
    let start = series.len().saturating_sub(window);
    let defined: Vec<f64> = series[start..].iter().flatten().copied().collect();
    if defined.is_empty() {
        return (0, None);
    }
    let mean = statrs::statistics::Statistics::mean(&defined);
    (defined.len(), Some(mean))
}

/// ATRP table for a true-range-percent series sampled at `interval`.
///
/// Windows longer than the series average whatever is available.
pub fn atrp_table(true_range_pct: &[Option<f64>], interval: Interval) -> Result<AtrpTable> {
    let rows: Vec<AtrpRow> = horizons(interval)?
        .iter()
        .map(|horizon| {
            let (observations, average) = trailing_mean(true_range_pct, horizon.window);
            AtrpRow {
                window: horizon.window,
                horizon: horizon.label,
                observations,
                average_true_range_percent: average,
            }
        })
        .collect();

    debug!(%interval, series_len = true_range_pct.len(), rows = rows.len(), "ATRP table built");

    Ok(AtrpTable { interval, rows })
}
