//! Typed backend response shapes and their adapters to [`TimeSeriesDataset`].
//!
//! Two chart payloads exist in the wild:
//!
//! - `{ "labels": [...], "datasets": [{ "label": .., "data": [...] }, ...] }`
//! - `{ "dates": [...], "cities": { "<name>": [...], ... } }`
//!
//! and the financial endpoints return an array of per-period records.
//! Each shape gets one adapter so the rest of the crate only sees datasets.

use serde::{Deserialize, Serialize};

use crate::dataset::{Series, TimeSeriesDataset};
use crate::error::{Error, Result};

/// A label that may arrive as a string or a bare number (e.g. a year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Text(String),
    Number(serde_json::Number),
}

impl RawLabel {
    pub fn into_string(self) -> String {
        match self {
            RawLabel::Text(s) => s,
            RawLabel::Number(n) => n.to_string(),
        }
    }
}

/// One entry of the `datasets` array. Styling fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    #[serde(default)]
    pub label: String,
    pub data: Vec<Option<f64>>,
}

/// `{labels, datasets}` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledResponse {
    pub labels: Vec<RawLabel>,
    pub datasets: Vec<LabeledSeries>,
}

/// `{dates, cities}` payload. Object order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedResponse {
    pub dates: Vec<RawLabel>,
    pub cities: serde_json::Map<String, serde_json::Value>,
}

/// Any chart payload the backend may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartResponse {
    Labeled(LabeledResponse),
    Keyed(KeyedResponse),
}

impl ChartResponse {
    /// Convert into the unified dataset, validating lengths.
    pub fn into_dataset(self) -> Result<TimeSeriesDataset> {
        match self {
            ChartResponse::Labeled(resp) => {
                let labels = resp.labels.into_iter().map(RawLabel::into_string).collect();
                let series = resp
                    .datasets
                    .into_iter()
                    .map(|d| Series::new(d.label, d.data))
                    .collect();
                TimeSeriesDataset::new(labels, series)
            }
            ChartResponse::Keyed(resp) => {
                let labels = resp.dates.into_iter().map(RawLabel::into_string).collect();
                let series = resp
                    .cities
                    .into_iter()
                    .map(|(name, values)| {
                        let values: Vec<Option<f64>> = serde_json::from_value(values)?;
                        Ok(Series::new(name, values))
                    })
                    .collect::<Result<Vec<_>>>()?;
                TimeSeriesDataset::new(labels, series)
            }
        }
    }
}

/// One period of company financials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(alias = "date")]
    pub year: RawLabel,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub earnings: Option<f64>,
    #[serde(default)]
    pub shares: Option<f64>,
    #[serde(default)]
    pub debt: Option<f64>,
    #[serde(default)]
    pub fcf: Option<f64>,
}

/// Financial metrics in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinancialMetric {
    Revenue,
    Earnings,
    Debt,
    FreeCashFlow,
    Shares,
}

impl FinancialMetric {
    pub const ALL: [FinancialMetric; 5] = [
        FinancialMetric::Revenue,
        FinancialMetric::Earnings,
        FinancialMetric::Debt,
        FinancialMetric::FreeCashFlow,
        FinancialMetric::Shares,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FinancialMetric::Revenue => "Revenue",
            FinancialMetric::Earnings => "Earnings",
            FinancialMetric::Debt => "Debt",
            FinancialMetric::FreeCashFlow => "Cash Flow",
            FinancialMetric::Shares => "Shares",
        }
    }

    fn value(&self, record: &FinancialRecord) -> Option<f64> {
        match self {
            FinancialMetric::Revenue => record.revenue,
            FinancialMetric::Earnings => record.earnings,
            FinancialMetric::Debt => record.debt,
            FinancialMetric::FreeCashFlow => record.fcf,
            FinancialMetric::Shares => record.shares,
        }
    }
}

/// Financial endpoint payload: records, or an already chart-shaped body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FinancialsResponse {
    Records(Vec<FinancialRecord>),
    Chart(ChartResponse),
}

impl FinancialsResponse {
    /// Convert into a dataset with one series per metric that has any value.
    pub fn into_dataset(self) -> Result<TimeSeriesDataset> {
        match self {
            FinancialsResponse::Chart(chart) => chart.into_dataset(),
            FinancialsResponse::Records(records) => records_to_dataset(&records),
        }
    }
}

/// Pivot per-period records into per-metric series.
pub fn records_to_dataset(records: &[FinancialRecord]) -> Result<TimeSeriesDataset> {
    let labels = records
        .iter()
        .map(|r| r.year.clone().into_string())
        .collect();

    let series = FinancialMetric::ALL
        .iter()
        .filter(|metric| records.iter().any(|r| metric.value(r).is_some()))
        .map(|metric| {
            Series::new(
                metric.label(),
                records.iter().map(|r| metric.value(r)).collect(),
            )
        })
        .collect();

    TimeSeriesDataset::new(labels, series)
}

/// Parse a chart payload from raw JSON.
pub fn parse_chart(body: &str) -> Result<TimeSeriesDataset> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| Error::Dataset(format!("unrecognized chart payload: {}", e)))?;
    response.into_dataset()
}
