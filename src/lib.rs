//! # Histvol
//!
//! Historical return distributions and volatility horizons for OHLC price series.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use histvol::{Interval, PriceRow, ProfileEngine, ReturnKind};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let rows: Vec<PriceRow> = (0..60)
//!     .map(|i| {
//!         let close = 100.0 + ((i * 7 % 11) as f64 - 5.0);
//!         PriceRow {
//!             timestamp: start + Duration::days(i),
//!             open: close - 0.5,
//!             high: close + 1.0,
//!             low: close - 1.5,
//!             close,
//!             adjusted_close: close,
//!             volume: 1_000.0,
//!         }
//!     })
//!     .collect();
//!
//! let profile = ProfileEngine::default().analyze(rows, Interval::Daily).unwrap();
//!
//! // Each table carries its own outcome
//! let cc = profile.returns_for(ReturnKind::CloseToClose).unwrap();
//! if let Ok(frequency) = &cc.frequency {
//!     for row in &frequency.rows {
//!         println!("{:<20} {:>4} {:.4}", row.label, row.count, row.probability);
//!     }
//! }
//! for row in &profile.atrp.as_ref().unwrap().rows {
//!     println!("{:>6} {:<10} {:?}", row.window, row.horizon, row.average_true_range_percent);
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Preparation**: drop every row up to the last one with an undefined
//!    open-to-close ratio (zero or missing open)
//! 2. **Returns**: close-to-close (adjusted), high-to-low, open-to-close, with
//!    undefined values carried as `None`
//! 3. **Tables**: sigma-binned frequency table, sign decomposition, 1-3 sigma
//!    band coverage, summary statistics
//! 4. **ATRP**: trailing true-range-percentage means over interval-specific
//!    horizons ("1 Week" to "50 Years")
//!
//! All computation is pure and allocation-local; the engine can be shared
//! freely between threads.

pub mod atrp;
pub mod config;
pub mod csv_loader;
pub mod distribution;
pub mod engine;
pub mod errors;
pub mod moments;
pub mod prepare;
pub mod probability;
pub mod returns;
pub mod summary;
pub mod true_range;
pub mod types;
pub mod variance;

#[cfg(feature = "cli")]
pub mod report;

// Re-export commonly used types for convenience
pub use atrp::{AtrpRow, AtrpTable, Horizon, atrp_table, horizons};
pub use config::AnalysisConfig;
pub use csv_loader::{load_price_csv, read_price_rows};
pub use distribution::{Bin, FrequencyRow, FrequencyTable, frequency_table};
pub use engine::{AssetProfile, ProfileEngine, ReturnProfile, TableResult};
pub use errors::{AnalysisError, Result};
pub use prepare::{PreparedTable, PriceTable, prepare};
pub use probability::{Partition, ProbabilityRow, ProbabilityTable, probability_table};
pub use returns::ReturnSeries;
pub use summary::{SummaryStatistics, summary_statistics};
pub use true_range::true_range_percent;
pub use types::{Interval, PriceRow, ReturnKind};
pub use variance::{VarianceBandRow, VarianceBandTable, variance_table};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!NAME.is_empty());
        assert!(!DESCRIPTION.is_empty());
    }

    #[test]
    fn test_engine_export() {
        let engine = ProfileEngine::default();
        assert_eq!(engine.config().bin_step, 0.75);
    }
}
