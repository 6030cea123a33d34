//! Profile engine: one prepared price table in, every statistical table out
//!
//! Preparation failures abort the analysis. Once the table is prepared, each
//! statistical table carries its own outcome, so a degenerate open-to-close
//! histogram still leaves the summary, the other kinds and ATRP in place.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::atrp::{AtrpTable, atrp_table};
use crate::config::AnalysisConfig;
use crate::distribution::{FrequencyTable, frequency_table};
use crate::errors::{AnalysisError, Result};
use crate::prepare::{PriceTable, prepare};
use crate::probability::{ProbabilityTable, probability_table};
use crate::returns::ReturnSeries;
use crate::summary::{SummaryStatistics, summary_statistics};
use crate::true_range::true_range_percent;
use crate::types::{Interval, PriceRow, ReturnKind};
use crate::variance::{VarianceBandTable, variance_table};

/// Outcome of building one table
pub type TableResult<T> = std::result::Result<T, AnalysisError>;

/// Successful tables serialize as themselves, failures as `{"error": "..."}`
fn serialize_table<T, S>(
    table: &TableResult<T>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match table {
        Ok(table) => table.serialize(serializer),
        Err(error) => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("error", &error.to_string())?;
            map.end()
        }
    }
}

fn log_failure<T>(table: &'static str, kind: &dyn std::fmt::Display, result: &TableResult<T>) {
    if let Err(error) = result {
        warn!(table, kind = %kind, %error, "table unavailable");
    }
}

/// The four return-distribution tables of one return kind
#[derive(Debug, Serialize)]
pub struct ReturnProfile {
    pub kind: ReturnKind,
    #[serde(serialize_with = "serialize_table")]
    pub frequency: TableResult<FrequencyTable>,
    #[serde(serialize_with = "serialize_table")]
    pub probability: TableResult<ProbabilityTable>,
    #[serde(serialize_with = "serialize_table")]
    pub variance: TableResult<VarianceBandTable>,
    #[serde(serialize_with = "serialize_table")]
    pub summary: TableResult<SummaryStatistics>,
}

impl ReturnProfile {
    /// Every table was built
    pub fn is_complete(&self) -> bool {
        self.frequency.is_ok()
            && self.probability.is_ok()
            && self.variance.is_ok()
            && self.summary.is_ok()
    }
}

/// Complete statistical profile of one price history
#[derive(Debug, Serialize)]
pub struct AssetProfile {
    pub interval: Interval,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub rows_analyzed: usize,
    pub rows_dropped: usize,
    pub returns: Vec<ReturnProfile>,
    #[serde(serialize_with = "serialize_table")]
    pub atrp: TableResult<AtrpTable>,
}

impl AssetProfile {
    pub fn returns_for(&self, kind: ReturnKind) -> Option<&ReturnProfile> {
        self.returns.iter().find(|profile| profile.kind == kind)
    }

    pub fn is_complete(&self) -> bool {
        self.atrp.is_ok() && self.returns.iter().all(ReturnProfile::is_complete)
    }
}

/// Stateless analysis engine; safe to share across threads
#[derive(Debug, Clone, Default)]
pub struct ProfileEngine {
    config: AnalysisConfig,
}

impl ProfileEngine {
    /// Engine over a validated configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Frequency, probability, variance and summary tables of one series
    pub fn profile_returns(&self, series: &ReturnSeries) -> ReturnProfile {
        debug!(kind = %series.kind, defined = series.defined_count(), "profiling return series");
        let profile = ReturnProfile {
            kind: series.kind,
            frequency: frequency_table(series, &self.config),
            probability: probability_table(series),
            variance: variance_table(series),
            summary: summary_statistics(series),
        };
        log_failure("frequency", &series.kind, &profile.frequency);
        log_failure("probability", &series.kind, &profile.probability);
        log_failure("variance", &series.kind, &profile.variance);
        log_failure("summary", &series.kind, &profile.summary);
        profile
    }

    /// Prepare `rows` and profile the requested return kinds plus ATRP
    pub fn analyze_kinds(
        &self,
        rows: Vec<PriceRow>,
        interval: Interval,
        kinds: &[ReturnKind],
    ) -> Result<AssetProfile> {
        let prepared = prepare(PriceTable::new(rows)?)?;
        let table = prepared.table;
        let rows = table.rows();

        let returns: Vec<ReturnProfile> = kinds
            .iter()
            .map(|&kind| self.profile_returns(&ReturnSeries::compute(kind, rows)))
            .collect();

        let atrp = atrp_table(&true_range_percent(rows), interval);
        log_failure("atrp", &interval, &atrp);

        // prepare() guarantees at least one row
        let (first_date, last_date) = table
            .date_range()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MIN));

        info!(
            %interval,
            rows = rows.len(),
            rows_dropped = prepared.rows_dropped,
            %first_date,
            %last_date,
            "price history analyzed"
        );

        Ok(AssetProfile {
            interval,
            first_date,
            last_date,
            rows_analyzed: rows.len(),
            rows_dropped: prepared.rows_dropped,
            returns,
            atrp,
        })
    }
    /// Profile all three return kinds
    pub fn analyze(&self, rows: Vec<PriceRow>, interval: Interval) -> Result<AssetProfile> {
        self.analyze_kinds(rows, interval, &ReturnKind::ALL)
    }

    /// Analyze independent histories in parallel, preserving input order
    pub fn analyze_batch(
        &self,
        histories: Vec<Vec<PriceRow>>,
        interval: Interval,
        kinds: &[ReturnKind],
    ) -> Vec<Result<AssetProfile>> {
        debug!(
            histories = histories.len(),
            workers = rayon::current_num_threads(),
            "starting batch analysis"
        );
        histories
            .into_par_iter()
            .map(|rows| self.analyze_kinds(rows, interval, kinds))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_history(len: usize) -> Vec<PriceRow> {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let mut close = 100.0;
        (0..len)
            .map(|i| {
                let swing = ((i * 7919 % 23) as f64 - 11.0) / 400.0;
                let open = close;
                close = open * (1.0 + swing);
                PriceRow {
                    timestamp: start + Duration::days(i as i64),
                    open,
                    high: open.max(close) * 1.01,
                    low: open.min(close) * 0.99,
                    close,
                    adjusted_close: close,
                    volume: 1_000.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_analyze_produces_all_tables() {
        let profile = ProfileEngine::default()
            .analyze(create_test_history(300), Interval::Daily)
            .unwrap();
        assert_eq!(profile.rows_analyzed, 300);
        assert_eq!(profile.rows_dropped, 0);
        assert_eq!(profile.returns.len(), 3);
        assert_eq!(profile.atrp.as_ref().unwrap().rows.len(), 9);
        assert!(profile.is_complete());

        let cc = profile.returns_for(ReturnKind::CloseToClose).unwrap();
        // First close-to-close return is undefined
        assert_eq!(cc.summary.as_ref().unwrap().count, 299);
        assert_eq!(cc.frequency.as_ref().unwrap().total, 299);

        let oc = profile.returns_for(ReturnKind::OpenToClose).unwrap();
        assert_eq!(oc.summary.as_ref().unwrap().count, 300);
    }

    #[test]
    fn test_analyze_subset_of_kinds() {
        let profile = ProfileEngine::default()
            .analyze_kinds(
                create_test_history(50),
                Interval::Weekly,
                &[ReturnKind::HighToLow],
            )
            .unwrap();
        assert_eq!(profile.returns.len(), 1);
        assert!(profile.returns_for(ReturnKind::CloseToClose).is_none());
        assert_eq!(profile.atrp.as_ref().unwrap().rows.len(), 8);
    }

    #[test]
    fn test_constant_open_to_close_keeps_other_tables() {
        let flat: Vec<PriceRow> = create_test_history(100)
            .into_iter()
            .map(|row| PriceRow {
                open: row.close,
                ..row
            })
            .collect();
        let profile = ProfileEngine::default()
            .analyze(flat, Interval::Daily)
            .unwrap();
        assert!(!profile.is_complete());

        let oc = profile.returns_for(ReturnKind::OpenToClose).unwrap();
        assert!(matches!(
            oc.frequency,
            Err(AnalysisError::DegenerateDistribution { .. })
        ));
        assert_eq!(oc.summary.as_ref().unwrap().std_dev, 0.0);
        assert!(oc.probability.is_ok());
        assert!(oc.variance.is_ok());

        for kind in [ReturnKind::CloseToClose, ReturnKind::HighToLow] {
            assert!(profile.returns_for(kind).unwrap().is_complete(), "{kind}");
        }
        assert_eq!(profile.atrp.as_ref().unwrap().rows.len(), 9);

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["returns"][2]["frequency"]["error"].is_string());
        assert!(json["returns"][2]["summary"]["std_dev"].is_number());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let zero_step = AnalysisConfig {
            bin_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            ProfileEngine::new(zero_step),
            Err(AnalysisError::Config { .. })
        ));
        assert!(ProfileEngine::new(AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn test_date_range_follows_cleaned_rows() {
        let mut history = create_test_history(20);
        history[0].open = 0.0;
        let expected_first = history[1].timestamp;
        let profile = ProfileEngine::default()
            .analyze(history, Interval::Daily)
            .unwrap();
        assert_eq!(profile.rows_dropped, 1);
        assert_eq!(profile.first_date, expected_first);
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let histories = vec![
            create_test_history(40),
            Vec::new(),
            create_test_history(80),
        ];
        let results = ProfileEngine::default().analyze_batch(
            histories,
            Interval::Monthly,
            &ReturnKind::ALL,
        );
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().rows_analyzed, 40);
        assert!(matches!(
            results[1],
            Err(AnalysisError::InsufficientData { .. })
        ));
        assert_eq!(results[2].as_ref().unwrap().rows_analyzed, 80);
    }
}
