//! Time-indexed dataset model shared by the fetcher, the filter and the chart.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named sequence of values, one per dataset label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Series name (e.g., "Los Angeles, CA").
    pub name: String,
    /// Values aligned with the dataset labels; `None` marks a missing point.
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a series without gaps.
    pub fn from_values(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }

    /// Minimum and maximum of the present values.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Parallel timestamps and per-series values.
///
/// Every series holds exactly `labels.len()` values; the constructor rejects
/// anything else, so slicing never has to re-check.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeriesDataset {
    labels: Vec<String>,
    series: Vec<Series>,
}

impl TimeSeriesDataset {
    /// Create a dataset, validating that all series match the label count.
    pub fn new(labels: Vec<String>, series: Vec<Series>) -> Result<Self> {
        if let Some(bad) = series.iter().find(|s| s.values.len() != labels.len()) {
            return Err(Error::Dataset(format!(
                "series '{}' has {} values but there are {} labels",
                bad.name,
                bad.values.len(),
                labels.len()
            )));
        }
        Ok(Self { labels, series })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Find a series by name.
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Copy of the dataset starting at `start` (clamped to the length).
    pub fn slice_from(&self, start: usize) -> Self {
        let start = start.min(self.labels.len());
        Self {
            labels: self.labels[start..].to_vec(),
            series: self
                .series
                .iter()
                .map(|s| Series::new(s.name.clone(), s.values[start..].to_vec()))
                .collect(),
        }
    }

    /// Combined value bounds across all series.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .filter_map(Series::bounds)
            .reduce(|(lo1, hi1), (lo2, hi2)| (lo1.min(lo2), hi1.max(hi2)))
    }
}

/// The ordered list of selectable series names, loaded once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesCatalog(Vec<String>);

impl SeriesCatalog {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Interpret a dataset label as a calendar date.
///
/// Accepts `YYYY-MM-DD`, an ISO date-time, `YYYY-MM` and a bare `YYYY`.
/// Anything else is not a date and never satisfies a time-range cutoff.
pub fn parse_label(label: &str) -> Option<NaiveDate> {
    let label = label.trim();

    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(label, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(label) {
        return Some(dt.date_naive());
    }
    if label.len() == 7 {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d") {
            return Some(date);
        }
    }
    if label.len() == 4 && label.chars().all(|c| c.is_ascii_digit()) {
        return label
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }
    None
}
