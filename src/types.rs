//! Core value types: price rows, return kinds and sampling intervals

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// One sampling period of OHLC data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    /// Period date (ascending, unique within a table)
    pub timestamp: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Close adjusted for splits and dividends
    pub adjusted_close: f64,
    pub volume: f64,
}

impl PriceRow {
    /// Open-to-close ratio, `None` when the ratio is not a finite number
    pub fn open_to_close(&self) -> Option<f64> {
        finite_ratio(self.close - self.open, self.open)
    }

    /// High-to-low spread as a fraction of the low
    pub fn high_to_low(&self) -> Option<f64> {
        finite_ratio(self.high - self.low, self.low)
    }
}

/// `numerator / denominator`, discarding infinities and NaN
pub(crate) fn finite_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}

/// The three supported return definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnKind {
    /// Period-over-period change in adjusted close
    CloseToClose,
    /// Intra-period high/low spread
    HighToLow,
    /// Intra-period open/close move
    OpenToClose,
}

impl ReturnKind {
    pub const ALL: [ReturnKind; 3] = [
        ReturnKind::CloseToClose,
        ReturnKind::HighToLow,
        ReturnKind::OpenToClose,
    ];

    /// Short label used in tables ("C-C", "H-L", "O-C")
    pub const fn label(&self) -> &'static str {
        match self {
            ReturnKind::CloseToClose => "C-C",
            ReturnKind::HighToLow => "H-L",
            ReturnKind::OpenToClose => "O-C",
        }
    }
}

impl fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReturnKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "c-c" | "cc" | "close-to-close" => Ok(ReturnKind::CloseToClose),
            "h-l" | "hl" | "high-to-low" => Ok(ReturnKind::HighToLow),
            "o-c" | "oc" | "open-to-close" => Ok(ReturnKind::OpenToClose),
            _ => Err(AnalysisError::InvalidReturnKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// Sampling interval of a price table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Interval {
    /// Provider-style code ("1d", "1wk", "1mo", "3mo")
    pub const fn code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
            Interval::Quarterly => "3mo",
        }
    }

    /// Human name used in table headings
    pub const fn timeframe(&self) -> &'static str {
        match self {
            Interval::Daily => "Daily",
            Interval::Weekly => "Weekly",
            Interval::Monthly => "Monthly",
            Interval::Quarterly => "Quarterly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Interval {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" | "daily" => Ok(Interval::Daily),
            // "5d" is the weekly bar code some data vendors emit
            "1wk" | "5d" | "weekly" => Ok(Interval::Weekly),
            "1mo" | "monthly" => Ok(Interval::Monthly),
            "3mo" | "quarterly" => Ok(Interval::Quarterly),
            _ => Err(AnalysisError::UnsupportedInterval {
                interval: s.to_string(),
            }),
        }
    }
}
