//! Descriptive summary of a return series

use serde::Serialize;

use crate::errors::{AnalysisError, Result};
use crate::moments::Moments;
use crate::returns::ReturnSeries;
use crate::types::ReturnKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub kind: ReturnKind,
    pub mean: f64,
    /// Sample standard deviation (n - 1)
    pub std_dev: f64,
    /// Excess kurtosis, `None` below four observations
    pub kurtosis: Option<f64>,
    /// Skewness, `None` below three observations
    pub skew: Option<f64>,
    pub max: f64,
    pub min: f64,
    pub range: f64,
    pub count: usize,
}

pub fn summary_statistics(series: &ReturnSeries) -> Result<SummaryStatistics> {
    let values = series.defined();
    let moments = Moments::compute(&values)
        .filter(|m| m.count >= 2)
        .ok_or_else(|| {
            AnalysisError::insufficient(format!(
                "{} series has {} defined values, at least 2 are needed",
                series.kind,
                values.len()
            ))
        })?;

    Ok(SummaryStatistics {
        kind: series.kind,
        mean: moments.mean,
        std_dev: moments.std_dev().unwrap_or(0.0),
        kurtosis: moments.kurtosis(),
        skew: moments.skew(),
        max: moments.max,
        min: moments.min,
        range: moments.max - moments.min,
        count: moments.count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_values() {
        let series = ReturnSeries::new(
            ReturnKind::CloseToClose,
            vec![None, Some(0.01), Some(0.02), Some(0.03), Some(0.04), Some(0.10)],
        );
        let summary = summary_statistics(&series).unwrap();
        assert_eq!(summary.count, 5);
        assert!((summary.mean - 0.04).abs() < 1e-12);
        assert!((summary.std_dev - 0.035_355_339_059_327_38).abs() < 1e-12);
        assert!((summary.skew.unwrap() - 1.697_056_274_847_714).abs() < 1e-9);
        assert!((summary.kurtosis.unwrap() - 3.152).abs() < 1e-9);
        assert_eq!(summary.max, 0.10);
        assert_eq!(summary.min, 0.01);
        assert!((summary.range - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series() {
        let series = ReturnSeries::from_values(ReturnKind::OpenToClose, &[0.01; 30]);
        let summary = summary_statistics(&series).unwrap();
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.range, 0.0);
        assert_eq!(summary.mean, 0.01);
    }

    #[test]
    fn test_single_value_is_insufficient() {
        let series = ReturnSeries::new(ReturnKind::CloseToClose, vec![None, Some(0.02)]);
        assert!(matches!(
            summary_statistics(&series),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_two_values_leave_higher_moments_undefined() {
        let series = ReturnSeries::from_values(ReturnKind::HighToLow, &[0.01, 0.03]);
        let summary = summary_statistics(&series).unwrap();
        assert_eq!(summary.skew, None);
        assert_eq!(summary.kurtosis, None);
        assert!((summary.std_dev - 0.02_f64.sqrt() / 10.0).abs() < 1e-12);
    }
}
