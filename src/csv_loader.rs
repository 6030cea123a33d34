//! CSV loading for locally exported price histories
//!
//! Expects Yahoo-style headers (`Date,Open,High,Low,Close,Adj Close,Volume`).
//! Lower-case and snake_case variants are accepted, `Adj Close` may be absent
//! (close is used instead), and `null`/empty cells load as NaN so that the
//! preparation step can discard them.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{AnalysisError, Result};
use crate::types::PriceRow;

/// Custom deserializer for provider numbers ("null", "" and "NaN" become NaN)
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim() {
        "" | "null" | "NaN" | "nan" => Ok(f64::NAN),
        other => other.parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("Invalid numeric value: {}", other))
        }),
    }
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient_f64(deserializer).map(Some)
}

/// CSV price record as exported by market-data providers
#[derive(Debug, Clone, Deserialize)]
pub struct CsvPriceRow {
    #[serde(rename = "Date", alias = "date", alias = "timestamp", alias = "Datetime")]
    pub date: String,
    #[serde(rename = "Open", alias = "open", deserialize_with = "lenient_f64")]
    pub open: f64,
    #[serde(rename = "High", alias = "high", deserialize_with = "lenient_f64")]
    pub high: f64,
    #[serde(rename = "Low", alias = "low", deserialize_with = "lenient_f64")]
    pub low: f64,
    #[serde(rename = "Close", alias = "close", deserialize_with = "lenient_f64")]
    pub close: f64,
    #[serde(
        rename = "Adj Close",
        alias = "adj_close",
        alias = "adjusted_close",
        default,
        deserialize_with = "lenient_opt_f64"
    )]
    pub adjusted_close: Option<f64>,
    #[serde(
        rename = "Volume",
        alias = "volume",
        default,
        deserialize_with = "lenient_opt_f64"
    )]
    pub volume: Option<f64>,
}

/// Parse the date part of "2020-01-02" or "2020-01-02 00:00:00-05:00"
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        AnalysisError::InvalidPriceTable {
            message: format!("Invalid date '{}': {}", raw, e),
        }
    })
}

impl TryFrom<CsvPriceRow> for PriceRow {
    type Error = AnalysisError;

    fn try_from(csv_row: CsvPriceRow) -> Result<Self> {
        Ok(Self {
            timestamp: parse_date(&csv_row.date)?,
            open: csv_row.open,
            high: csv_row.high,
            low: csv_row.low,
            close: csv_row.close,
            adjusted_close: csv_row.adjusted_close.unwrap_or(csv_row.close),
            volume: csv_row.volume.unwrap_or(f64::NAN),
        })
    }
}

/// Read price rows from any CSV source with a header line
pub fn read_price_rows<R: Read>(reader: R) -> Result<Vec<PriceRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let csv_row: CsvPriceRow = result?;
        rows.push(PriceRow::try_from(csv_row)?);
    }
    Ok(rows)
}

/// Load a CSV file of price rows
pub fn load_price_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PriceRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let rows = read_price_rows(std::io::BufReader::new(file))?;
    debug!(path = %path.display(), rows = rows.len(), "loaded price CSV");
    Ok(rows)
}
