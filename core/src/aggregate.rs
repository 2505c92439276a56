//! Performance aggregation over the whole ledger.
//!
//! Pure functions of the records passed in. Nothing here is cached;
//! every view recomputes from the full table.

use crate::customer::CustomerRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row per distinct marketer seen in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub marketer: String,
    pub total_customers: usize,
    pub total_sales: u64,
    pub average_rating: f64,
}

#[derive(Default)]
struct Totals {
    customers: usize,
    sales: u64,
    rating_sum: u64,
}

/// Group all records by exact marketer name, ordered by name.
///
/// Covers every marketer, not just the logged-in one.
pub fn aggregate(records: &[CustomerRecord]) -> Vec<PerformanceSummary> {
    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
    for r in records {
        let t = groups.entry(r.marketer.as_str()).or_default();
        t.customers += 1;
        t.sales += r.product_quantity;
        t.rating_sum += u64::from(r.rating);
    }

    // Every group holds at least one record, so the mean never divides by zero.
    let summaries: Vec<PerformanceSummary> = groups
        .into_iter()
        .map(|(marketer, t)| PerformanceSummary {
            marketer: marketer.to_string(),
            total_customers: t.customers,
            total_sales: t.sales,
            average_rating: t.rating_sum as f64 / t.customers as f64,
        })
        .collect();
    log::debug!(
        "aggregate: {} records -> {} marketers",
        records.len(),
        summaries.len()
    );
    summaries
}

// ── Chart datasets ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// A bar chart with marketers on the x axis. With more than one series
/// the bars are grouped side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    pub grouped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCharts {
    /// total_customers and total_sales per marketer.
    pub activity: BarChart,
    /// average_rating per marketer.
    pub rating: BarChart,
}

pub fn charts(summaries: &[PerformanceSummary]) -> PerformanceCharts {
    let categories: Vec<String> = summaries.iter().map(|s| s.marketer.clone()).collect();

    let activity = BarChart {
        title: "Customer Count and Sales per Marketer".into(),
        x_label: "Marketer".into(),
        y_label: "Performance Metrics".into(),
        categories: categories.clone(),
        series: vec![
            BarSeries {
                name: "total_customers".into(),
                values: summaries.iter().map(|s| s.total_customers as f64).collect(),
            },
            BarSeries {
                name: "total_sales".into(),
                values: summaries.iter().map(|s| s.total_sales as f64).collect(),
            },
        ],
        grouped: true,
    };

    let rating = BarChart {
        title: "Average Customer Rating per Marketer".into(),
        x_label: "Marketer".into(),
        y_label: "Average Rating".into(),
        categories,
        series: vec![BarSeries {
            name: "average_rating".into(),
            values: summaries.iter().map(|s| s.average_rating).collect(),
        }],
        grouped: false,
    };

    PerformanceCharts { activity, rating }
}
