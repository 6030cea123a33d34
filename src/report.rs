//! Text tables for terminal output
//!
//! Percentages are rendered with two decimals, kurtosis and skew with three,
//! and undefined values as "n/a".

use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;

use crate::atrp::AtrpTable;
use crate::distribution::FrequencyTable;
use crate::engine::{AssetProfile, ReturnProfile, TableResult};
use crate::probability::ProbabilityTable;
use crate::summary::SummaryStatistics;
use crate::variance::VarianceBandTable;

const UNDEFINED: &str = "n/a";

/// Fraction as a percentage with two decimals
pub fn to_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn opt_percent(value: Option<f64>) -> String {
    value.map(to_percent).unwrap_or_else(|| UNDEFINED.to_string())
}

fn opt_decimal(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| UNDEFINED.to_string())
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn frequency_report(table: &FrequencyTable) -> Table {
    let mut out = new_table(headers(&[
        "Range",
        "Probability",
        "Cumulative Probability",
        "Count",
    ]));
    for row in &table.rows {
        out.add_row(vec![
            row.label.clone(),
            to_percent(row.probability),
            to_percent(row.cumulative_probability),
            row.count.to_string(),
        ]);
    }
    out
}

pub fn probability_report(table: &ProbabilityTable) -> Table {
    let mut out = new_table(headers(&[
        "",
        "Average Returns",
        "Count",
        "Frequency %",
        "Frequency Adjusted Returns",
    ]));
    for row in &table.rows {
        out.add_row(vec![
            row.partition.label().to_string(),
            opt_percent(row.average_return),
            row.count.to_string(),
            to_percent(row.frequency),
            opt_percent(row.frequency_adjusted_return),
        ]);
    }
    out
}

pub fn variance_report(table: &VarianceBandTable) -> Table {
    let mut out = new_table(headers(&[
        "Std Dev",
        "Upper Bound",
        "Lower Bound",
        "Count",
        "Count %",
        "Normal Count %",
    ]));
    for row in &table.rows {
        out.add_row(vec![
            row.std_devs.to_string(),
            to_percent(row.upper_bound),
            to_percent(row.lower_bound),
            row.count.to_string(),
            to_percent(row.count_pct),
            to_percent(row.normal_pct),
        ]);
    }
    out
}

pub fn summary_report(summary: &SummaryStatistics) -> Table {
    let mut out = new_table(headers(&["", "values"]));
    let rows = [
        ("mean", to_percent(summary.mean)),
        ("standard deviation", to_percent(summary.std_dev)),
        ("kurtosis", opt_decimal(summary.kurtosis)),
        ("skew", opt_decimal(summary.skew)),
        ("max", to_percent(summary.max)),
        ("min", to_percent(summary.min)),
        ("range", to_percent(summary.range)),
        ("count", summary.count.to_string()),
    ];
    for (name, value) in rows {
        out.add_row(vec![name.to_string(), value]);
    }
    out
}

pub fn atrp_report(table: &AtrpTable) -> Table {
    let mut out = new_table(vec![
        "Trading Periods".to_string(),
        "Horizon".to_string(),
        format!("Average {} True Range %", table.interval.timeframe()),
    ]);
    for row in &table.rows {
        out.add_row(vec![
            row.window.to_string(),
            row.horizon.to_string(),
            opt_percent(row.average_true_range_percent),
        ]);
    }
    out
}

/// Heading plus the rendered table, or the reason it is missing
fn section<T>(heading: &str, table: &TableResult<T>, render: impl Fn(&T) -> Table) -> String {
    match table {
        Ok(table) => format!("{}\n{}\n", heading, render(table)),
        Err(error) => format!("{}\n{}: {}\n", heading, UNDEFINED, error),
    }
}

/// All four tables of one return kind, with section headings
pub fn return_profile_report(profile: &ReturnProfile) -> String {
    let kind = profile.kind;
    [
        section(
            &format!("{kind} Distribution of Returns"),
            &profile.frequency,
            frequency_report,
        ),
        section(
            &format!("{kind} Probabilities"),
            &profile.probability,
            probability_report,
        ),
        section(&format!("{kind} Variance"), &profile.variance, variance_report),
        section(&format!("{kind} Summary"), &profile.summary, summary_report),
    ]
    .join("\n")
}

/// Full report for one asset profile
pub fn asset_report(name: &str, profile: &AssetProfile) -> String {
    let mut out = format!(
        "{} ({} bars, {} to {}, {} leading rows dropped)\n\n",
        name,
        profile.interval.timeframe(),
        profile.first_date,
        profile.last_date,
        profile.rows_dropped
    );
    for returns in &profile.returns {
        out.push_str(&return_profile_report(returns));
        out.push('\n');
    }
    out.push_str(&section(
        "Average True Range Percentage",
        &profile.atrp,
        atrp_report,
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atrp::atrp_table;
    use crate::engine::ProfileEngine;
    use crate::probability::probability_table;
    use crate::returns::ReturnSeries;
    use crate::types::{Interval, ReturnKind};

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(0.0123), "1.23%");
        assert_eq!(to_percent(-0.5), "-50.00%");
        assert_eq!(opt_percent(None), "n/a");
        assert_eq!(opt_decimal(Some(3.152)), "3.152");
    }

    #[test]
    fn test_probability_report_marks_undefined() {
        let series = ReturnSeries::from_values(ReturnKind::HighToLow, &[0.01, 0.03]);
        let rendered = probability_report(&probability_table(&series).unwrap()).to_string();
        assert!(rendered.contains("Positive Data Points"));
        assert!(rendered.contains("2.00%"));
        assert!(rendered.contains("n/a"));
    }

    #[test]
    fn test_atrp_report_heading() {
        let table = atrp_table(&[None, Some(0.02)], Interval::Monthly).unwrap();
        let rendered = atrp_report(&table).to_string();
        assert!(rendered.contains("Average Monthly True Range %"));
        assert!(rendered.contains("1 Quarter"));
        assert!(rendered.contains("2.00%"));
    }

    #[test]
    fn test_failed_table_is_reported_inline() {
        let series = ReturnSeries::from_values(ReturnKind::OpenToClose, &[0.0; 30]);
        let profile = ProfileEngine::default().profile_returns(&series);
        let rendered = return_profile_report(&profile);
        assert!(rendered.contains("O-C Distribution of Returns\nn/a: Degenerate distribution"));
        assert!(rendered.contains("O-C Summary"));
        assert!(rendered.contains("standard deviation"));
    }
}
