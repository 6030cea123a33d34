//! Sigma-scaled distribution-of-returns histogram
//!
//! Interior edges run from `mean - span*sigma` to `mean + span*sigma` in steps
//! of `step*sigma` (defaults 3 and 0.75, i.e. 9 edges). Two unbounded tail bins
//! close the partition, so every finite value lands in exactly one
//! `[lower, upper)` bin.

use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::errors::{AnalysisError, Result};
use crate::moments::Moments;
use crate::returns::ReturnSeries;
use crate::types::ReturnKind;

/// Half-open interval `[lower, upper)`; `None` bounds are infinite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bin {
    pub fn contains(&self, value: f64) -> bool {
        self.lower.is_none_or(|lower| value >= lower)
            && self.upper.is_none_or(|upper| value < upper)
    }

    /// "Less than X%", "Greater than Y%" or "L% to U%"
    pub fn label(&self, precision: usize) -> String {
        let pct = |edge: f64| format!("{:.*}%", precision, edge * 100.0);
        match (self.lower, self.upper) {
            (None, Some(upper)) => format!("Less than {}", pct(upper)),
            (Some(lower), None) => format!("Greater than {}", pct(lower)),
            (Some(lower), Some(upper)) => format!("{} to {}", pct(lower), pct(upper)),
            (None, None) => "All values".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub bin: Bin,
    pub label: String,
    pub count: usize,
    pub probability: f64,
    pub cumulative_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub kind: ReturnKind,
    pub mean: f64,
    pub std_dev: f64,
    pub total: usize,
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    /// Finite bin edges in ascending order
    pub fn edges(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|row| row.bin.upper).collect()
    }
}

/// Interior edges `mean + i*step*sigma` for `i*step` in `[-span, span]`
pub fn bin_edges(mean: f64, std_dev: f64, config: &AnalysisConfig) -> Result<Vec<f64>> {
    config.validate()?;
    Ok((0..config.edge_count())
        .map(|i| mean + (-config.sigma_span + i as f64 * config.bin_step) * std_dev)
        .collect())
}

/// Bins induced by `edges`, including both unbounded tails
pub fn bins_from_edges(edges: &[f64]) -> Vec<Bin> {
    let bounds: Vec<Option<f64>> = std::iter::once(None)
        .chain(edges.iter().copied().map(Some))
        .chain(std::iter::once(None))
        .collect();
    bounds
        .windows(2)
        .map(|pair| Bin {
            lower: pair[0],
            upper: pair[1],
        })
        .collect()
}

/// Build the frequency table of a return series
pub fn frequency_table(series: &ReturnSeries, config: &AnalysisConfig) -> Result<FrequencyTable> {
    let values = series.defined();
    let moments = Moments::compute(&values).ok_or_else(|| {
        AnalysisError::insufficient(format!("{} series has no defined values", series.kind))
    })?;
    let std_dev = moments.std_dev().ok_or_else(|| {
        AnalysisError::insufficient(format!(
            "{} series needs at least 2 values to derive bin widths",
            series.kind
        ))
    })?;

    if moments.is_constant() || std_dev == 0.0 || !std_dev.is_finite() {
        return Err(AnalysisError::DegenerateDistribution { std_dev });
    }

    let edges = bin_edges(moments.mean, std_dev, config)?;
    // Sigma below the resolution of the mean collapses neighbouring edges
    if !edges.windows(2).all(|w| w[0] < w[1]) {
        return Err(AnalysisError::DegenerateDistribution { std_dev });
    }
    let bins = bins_from_edges(&edges);

    let mut counts = vec![0usize; bins.len()];
    for value in &values {
        // Number of edges at or below the value is the index of its bin
        counts[edges.partition_point(|edge| edge <= value)] += 1;
    }

    let total = values.len();
    let mut cumulative = 0.0;
    let rows = bins
        .into_iter()
        .zip(counts)
        .map(|(bin, count)| {
            let probability = count as f64 / total as f64;
            cumulative += probability;
            FrequencyRow {
                label: bin.label(config.label_precision),
                bin,
                count,
                probability,
                cumulative_probability: cumulative,
            }
        })
        .collect();

    debug!(kind = %series.kind, total, bins = edges.len() + 1, "frequency table built");

    Ok(FrequencyTable {
        kind: series.kind,
        mean: moments.mean,
        std_dev,
        total,
        rows,
    })
}
