//! Sigma-band coverage compared with a normal distribution
//!
//! Empirical coverage of `[mean - k*sigma, mean + k*sigma]` for k = 1, 2, 3 is
//! reported next to the normal reference (68.27%, 95.45%, 99.73%). Coverage
//! below the reference at k = 3 is the usual sign of fat tails.

use serde::Serialize;
use statrs::function::erf::erf;

use crate::errors::{AnalysisError, Result};
use crate::moments::Moments;
use crate::returns::ReturnSeries;
use crate::types::ReturnKind;

/// Band widths reported, in standard deviations
pub const BAND_WIDTHS: [u32; 3] = [1, 2, 3];

/// Probability mass of a standard normal within ±k, rounded to 4 decimals
pub fn normal_coverage(k: u32) -> f64 {
    // P(|Z| <= k) = erf(k / sqrt(2))
    let coverage = erf(k as f64 / std::f64::consts::SQRT_2);
    (coverage * 10_000.0).round() / 10_000.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceBandRow {
    pub std_devs: u32,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub count: usize,
    pub count_pct: f64,
    pub normal_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceBandTable {
    pub kind: ReturnKind,
    pub mean: f64,
    pub std_dev: f64,
    pub total: usize,
    pub rows: Vec<VarianceBandRow>,
}

/// Count observations inside each sigma band (bounds inclusive)
pub fn variance_table(series: &ReturnSeries) -> Result<VarianceBandTable> {
    let values = series.defined();
    let (mean, std_dev) = Moments::compute(&values)
        .and_then(|m| Some((m.mean, m.std_dev()?)))
        .ok_or_else(|| {
            AnalysisError::insufficient(format!(
                "{} series needs at least 2 values for sigma bands",
                series.kind
            ))
        })?;

    let total = values.len();
    let rows = BAND_WIDTHS
        .iter()
        .map(|&k| {
            let upper_bound = mean + k as f64 * std_dev;
            let lower_bound = mean - k as f64 * std_dev;
            let count = values
                .iter()
                .filter(|&&v| lower_bound <= v && v <= upper_bound)
                .count();
            VarianceBandRow {
                std_devs: k,
                upper_bound,
                lower_bound,
                count,
                count_pct: count as f64 / total as f64,
                normal_pct: normal_coverage(k),
            }
        })
        .collect();

    Ok(VarianceBandTable {
        kind: series.kind,
        mean,
        std_dev,
        total,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_reference_values() {
        assert_eq!(normal_coverage(1), 0.6827);
        assert_eq!(normal_coverage(2), 0.9545);
        assert_eq!(normal_coverage(3), 0.9973);
    }

    #[test]
    fn test_reference_agrees_with_normal_cdf() {
        use statrs::distribution::{ContinuousCDF, Normal};
        let normal = Normal::new(0.0, 1.0).unwrap();
        for k in BAND_WIDTHS {
            let exact = normal.cdf(k as f64) - normal.cdf(-(k as f64));
            assert!((normal_coverage(k) - exact).abs() < 5e-5);
        }
    }

    #[test]
    fn test_bands_are_nested() {
        let values: Vec<f64> = (0..300)
            .map(|i| ((i * 53 % 97) as f64 - 48.0) / 800.0)
            .chain([0.4, -0.35])
            .collect();
        let series = ReturnSeries::from_values(ReturnKind::CloseToClose, &values);
        let table = variance_table(&series).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.rows.iter().map(|r| r.std_devs).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for pair in table.rows.windows(2) {
            assert!(pair[0].count <= pair[1].count);
            assert!(pair[0].upper_bound < pair[1].upper_bound);
            assert!(pair[0].lower_bound > pair[1].lower_bound);
        }
        // The two outliers sit beyond three sigma
        assert!(table.rows[2].count < table.total);
    }

    #[test]
    fn test_hand_computed_band() {
        // mean 0, sample std dev 1
        let series = ReturnSeries::from_values(ReturnKind::OpenToClose, &[-1.0, 0.0, 1.0]);
        let table = variance_table(&series).unwrap();
        assert!((table.std_dev - 1.0).abs() < 1e-12);
        // Bounds are inclusive, so ±1 falls inside the first band
        assert_eq!(table.rows[0].count, 3);
        assert!((table.rows[0].count_pct - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_covers_everything() {
        let series = ReturnSeries::from_values(ReturnKind::OpenToClose, &[0.01; 10]);
        let table = variance_table(&series).unwrap();
        assert!(table.rows.iter().all(|r| r.count == 10));
    }

    #[test]
    fn test_single_value_is_insufficient() {
        let series = ReturnSeries::from_values(ReturnKind::OpenToClose, &[0.01]);
        assert!(matches!(
            variance_table(&series),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }
}
