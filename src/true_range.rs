//! True range as a fraction of the closing price
//!
//! ```text
//! TR[t]  = max(high[t] - low[t], |high[t] - close[t-1]|, |low[t] - close[t-1]|)
//! TRP[t] = TR[t] / close[t]
//! ```
//!
//! Row 0 has no previous close and is `None`, never zero, so trailing averages
//! that reach back to it simply skip it.

use crate::types::{PriceRow, finite_ratio};

/// True range of `row` given the previous period's close
///
/// `None` when high, low or the previous close is not finite.
pub fn true_range(row: &PriceRow, previous_close: f64) -> Option<f64> {
    if ![row.high, row.low, previous_close].iter().all(|p| p.is_finite()) {
        return None;
    }
    Some(
        (row.high - row.low)
            .max((row.high - previous_close).abs())
            .max((row.low - previous_close).abs()),
    )
}

/// Per-row true-range percentage aligned with `rows`
pub fn true_range_percent(rows: &[PriceRow]) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(rows.len());
    if rows.is_empty() {
        return values;
    }
    values.push(None);
    values.extend(rows.windows(2).map(|pair| {
        let (prev, curr) = (&pair[0], &pair[1]);
        true_range(curr, prev.close).and_then(|range| finite_ratio(range, curr.close))
    }));
    values
}
