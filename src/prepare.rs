//! Price table validation and cleaning
//!
//! A raw provider history often starts with rows whose open price is zero or
//! missing. Those rows produce infinite open-to-close ratios that would poison
//! every downstream statistic, so everything up to and including the last such
//! row is discarded before any returns are computed.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{AnalysisError, Result};
use crate::types::PriceRow;

/// Time-ordered OHLC table, validated on construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Build a table, rejecting out-of-order or duplicate timestamps
    pub fn new(rows: Vec<PriceRow>) -> Result<Self> {
        if let Some(pos) = rows
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(AnalysisError::InvalidPriceTable {
                message: format!(
                    "timestamps must strictly ascend, row {} ({}) follows {}",
                    pos + 1,
                    rows[pos + 1].timestamp,
                    rows[pos].timestamp
                ),
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last timestamp covered by the table
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.rows.first()?.timestamp, self.rows.last()?.timestamp))
    }

    pub fn into_rows(self) -> Vec<PriceRow> {
        self.rows
    }
}

/// Outcome of [`prepare`]: the cleaned table plus how much was removed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedTable {
    pub table: PriceTable,
    pub rows_dropped: usize,
}

/// Index of the last row whose open-to-close ratio is not finite
pub fn last_invalid_row(rows: &[PriceRow]) -> Option<usize> {
    rows.iter().rposition(|row| row.open_to_close().is_none())
}

/// Drop every row up to and including the last invalid open-to-close row.
///
/// Running this on an already prepared table returns it unchanged.
pub fn prepare(table: PriceTable) -> Result<PreparedTable> {
    let mut rows = table.into_rows();
    let original_len = rows.len();

    let rows_dropped = match last_invalid_row(&rows) {
        Some(k) => {
            rows.drain(..=k);
            k + 1
        }
        None => 0,
    };

    if rows_dropped > 0 {
        warn!(
            rows_dropped,
            original_len, "dropped leading rows with undefined open-to-close returns"
        );
    }

    if rows.is_empty() {
        return Err(AnalysisError::insufficient(format!(
            "no usable rows remain after cleaning {} input rows",
            original_len
        )));
    }

    debug!(rows = rows.len(), "price table prepared");

    Ok(PreparedTable {
        table: PriceTable { rows },
        rows_dropped,
    })
}
