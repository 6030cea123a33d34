//! Positive / negative / zero decomposition of a return series
//!
//! `frequency_adjusted_return = average * frequency` is each partition's
//! contribution to the overall mean, so the three contributions add up to it.

use serde::Serialize;

use crate::errors::{AnalysisError, Result};
use crate::returns::ReturnSeries;
use crate::types::ReturnKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Partition {
    Positive,
    Negative,
    Zero,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Positive, Partition::Negative, Partition::Zero];

    pub const fn label(&self) -> &'static str {
        match self {
            Partition::Positive => "Positive Data Points",
            Partition::Negative => "Negative Data Points",
            Partition::Zero => "Zero",
        }
    }

    fn matches(&self, value: f64) -> bool {
        match self {
            Partition::Positive => value > 0.0,
            Partition::Negative => value < 0.0,
            Partition::Zero => value == 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub partition: Partition,
    /// `None` for an empty positive or negative partition
    pub average_return: Option<f64>,
    pub count: usize,
    pub frequency: f64,
    pub frequency_adjusted_return: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityTable {
    pub kind: ReturnKind,
    pub total: usize,
    pub rows: Vec<ProbabilityRow>,
}

impl ProbabilityTable {
    /// Sum of the partition contributions, equal to the series mean
    pub fn total_adjusted_return(&self) -> f64 {
        self.rows
            .iter()
            .filter_map(|row| row.frequency_adjusted_return)
            .sum()
    }

    pub fn row(&self, partition: Partition) -> Option<&ProbabilityRow> {
        self.rows.iter().find(|row| row.partition == partition)
    }
}

/// Split the defined values of `series` by sign
pub fn probability_table(series: &ReturnSeries) -> Result<ProbabilityTable> {
    let values = series.defined();
    if values.is_empty() {
        return Err(AnalysisError::insufficient(format!(
            "{} series has no defined values",
            series.kind
        )));
    }
    let total = values.len();

    let rows = Partition::ALL
        .iter()
        .map(|&partition| {
            let members: Vec<f64> = values
                .iter()
                .copied()
                .filter(|&v| partition.matches(v))
                .collect();
            let count = members.len();
            let frequency = count as f64 / total as f64;
            let average_return = match partition {
                Partition::Zero => Some(0.0),
                _ if members.is_empty() => None,
                _ => Some(members.iter().sum::<f64>() / count as f64),
            };
            ProbabilityRow {
                partition,
                average_return,
                count,
                frequency,
                frequency_adjusted_return: average_return.map(|avg| avg * frequency),
            }
        })
        .collect();

    Ok(ProbabilityTable {
        kind: series.kind,
        total,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions() {
        let series = ReturnSeries::from_values(
            ReturnKind::CloseToClose,
            &[0.02, -0.01, 0.0, 0.04, -0.03, 0.0, 0.01, 0.0],
        );
        let table = probability_table(&series).unwrap();
        assert_eq!(table.total, 8);

        let pos = table.row(Partition::Positive).unwrap();
        assert_eq!(pos.count, 3);
        assert!((pos.average_return.unwrap() - 0.07 / 3.0).abs() < 1e-12);
        assert!((pos.frequency - 0.375).abs() < 1e-12);

        let neg = table.row(Partition::Negative).unwrap();
        assert_eq!(neg.count, 2);
        assert!((neg.average_return.unwrap() + 0.02).abs() < 1e-12);

        let zero = table.row(Partition::Zero).unwrap();
        assert_eq!(zero.count, 3);
        assert_eq!(zero.average_return, Some(0.0));
        assert_eq!(zero.frequency_adjusted_return, Some(0.0));
    }

    #[test]
    fn test_contributions_sum_to_mean() {
        let values = [0.013, -0.021, 0.004, 0.0, 0.018, -0.007, 0.002];
        let series = ReturnSeries::from_values(ReturnKind::HighToLow, &values);
        let table = probability_table(&series).unwrap();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert!((table.total_adjusted_return() - mean).abs() < 1e-6);
    }

    #[test]
    fn test_empty_negative_partition_is_undefined() {
        let series = ReturnSeries::from_values(ReturnKind::HighToLow, &[0.01, 0.02]);
        let table = probability_table(&series).unwrap();
        let neg = table.row(Partition::Negative).unwrap();
        assert_eq!(neg.count, 0);
        assert_eq!(neg.average_return, None);
        assert_eq!(neg.frequency_adjusted_return, None);
        assert_eq!(neg.frequency, 0.0);
    }

    #[test]
    fn test_empty_series() {
        let series = ReturnSeries::new(ReturnKind::CloseToClose, vec![None]);
        assert!(matches!(
            probability_table(&series),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }
}
