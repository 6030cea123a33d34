//! Return series derived from a prepared price table

use serde::Serialize;

use crate::types::{PriceRow, ReturnKind, finite_ratio};

/// Returns aligned 1:1 with the rows they were computed from.
///
/// `None` marks an undefined value (the first close-to-close return, or any
/// ratio that is not finite). Statistics only ever see the defined values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    pub kind: ReturnKind,
    pub values: Vec<Option<f64>>,
}

impl ReturnSeries {
    pub fn new(kind: ReturnKind, values: Vec<Option<f64>>) -> Self {
        Self { kind, values }
    }

    /// Build a series where every value is defined
    pub fn from_values(kind: ReturnKind, values: &[f64]) -> Self {
        Self::new(kind, values.iter().map(|&v| Some(v)).collect())
    }

    /// Compute the series of the given kind over `rows`
    pub fn compute(kind: ReturnKind, rows: &[PriceRow]) -> Self {
        let values = match kind {
            ReturnKind::CloseToClose => close_to_close(rows),
            ReturnKind::HighToLow => rows.iter().map(PriceRow::high_to_low).collect(),
            ReturnKind::OpenToClose => rows.iter().map(PriceRow::open_to_close).collect(),
        };
        Self { kind, values }
    }

    /// Defined values in row order
    pub fn defined(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Percentage change of adjusted close; the first row has no predecessor
fn close_to_close(rows: &[PriceRow]) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(rows.len());
    if rows.is_empty() {
        return values;
    }
    values.push(None);
    values.extend(rows.windows(2).map(|pair| {
        let (prev, curr) = (pair[0].adjusted_close, pair[1].adjusted_close);
        finite_ratio(curr - prev, prev)
    }));
    values
}
