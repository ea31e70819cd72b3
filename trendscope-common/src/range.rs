//! Time-range filtering of a cached dataset.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};

use crate::dataset::{TimeSeriesDataset, parse_label};
use crate::error::Error;

/// Named window used to slice a dataset for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    /// Everything (default).
    #[default]
    Max,
    FiveYears,
    TwoYears,
    OneYear,
}

impl TimeRange {
    /// All ranges in button order.
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Max,
        TimeRange::FiveYears,
        TimeRange::TwoYears,
        TimeRange::OneYear,
    ];

    /// Wire/display token.
    pub fn token(&self) -> &'static str {
        match self {
            TimeRange::Max => "max",
            TimeRange::FiveYears => "5y",
            TimeRange::TwoYears => "2y",
            TimeRange::OneYear => "1y",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Max => "Max",
            TimeRange::FiveYears => "5Y",
            TimeRange::TwoYears => "2Y",
            TimeRange::OneYear => "1Y",
        }
    }

    /// Years covered, or `None` for the unbounded range.
    pub fn years(&self) -> Option<u32> {
        match self {
            TimeRange::Max => None,
            TimeRange::FiveYears => Some(5),
            TimeRange::TwoYears => Some(2),
            TimeRange::OneYear => Some(1),
        }
    }

    /// Earliest date kept by this range, relative to `today`.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        let years = self.years()?;
        today.checked_sub_months(Months::new(years * 12))
    }

    /// Index of the first label on or after the cutoff.
    ///
    /// Falls back to 0 when nothing qualifies, so the whole range is shown.
    pub fn start_index(&self, labels: &[String], today: NaiveDate) -> usize {
        let Some(cutoff) = self.cutoff(today) else {
            return 0;
        };

        labels
            .iter()
            .position(|label| parse_label(label).is_some_and(|date| date >= cutoff))
            .unwrap_or(0)
    }

    /// Produce the visible slice. The source dataset is never modified.
    pub fn apply(&self, dataset: &TimeSeriesDataset, today: NaiveDate) -> TimeSeriesDataset {
        match self {
            TimeRange::Max => dataset.clone(),
            _ => dataset.slice_from(self.start_index(dataset.labels(), today)),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(format!("unknown time range '{}'", s)))
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Series;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Month-end labels from 2020-01 through 2024-06 with a rising value.
    fn monthly_dataset() -> TimeSeriesDataset {
        let mut labels = Vec::new();
        let mut current = date(2020, 1, 1);
        while current <= date(2024, 6, 1) {
            let next = current.checked_add_months(Months::new(1)).unwrap();
            labels.push(next.pred_opt().unwrap().format("%Y-%m-%d").to_string());
            current = next;
        }
        let values: Vec<f64> = (0..labels.len()).map(|i| 100.0 + i as f64).collect();
        TimeSeriesDataset::new(
            labels,
            vec![
                Series::from_values("LA", values.clone()),
                Series::from_values("NY", values.iter().map(|v| v * 2.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_tokens_round_trip() {
        for range in TimeRange::ALL {
            assert_eq!(range.token().parse::<TimeRange>().unwrap(), range);
        }
        assert!("10y".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::default(), TimeRange::Max);
    }

    #[test]
    fn test_one_year_starts_at_first_label_after_cutoff() {
        let dataset = monthly_dataset();
        assert_eq!(dataset.labels()[0], "2020-01-31");
        assert_eq!(dataset.labels()[1], "2020-02-29");
        assert_eq!(dataset.labels().last().unwrap(), "2024-06-30");

        let filtered = TimeRange::OneYear.apply(&dataset, date(2024, 7, 1));
        assert_eq!(filtered.labels()[0], "2023-07-31");
        assert_eq!(filtered.len(), 12);
        assert_eq!(filtered.series()[0].values.len(), 12);
        assert_eq!(filtered.series()[1].values.len(), 12);
    }

    #[test]
    fn test_cutoff_on_exact_label_is_inclusive() {
        let dataset = monthly_dataset();
        let filtered = TimeRange::TwoYears.apply(&dataset, date(2024, 6, 30));
        assert_eq!(filtered.labels()[0], "2022-06-30");
    }

    #[test]
    fn test_max_returns_everything() {
        let dataset = monthly_dataset();
        assert_eq!(TimeRange::Max.apply(&dataset, date(2024, 7, 1)), dataset);
    }

    #[test]
    fn test_no_qualifying_label_falls_back_to_full_range() {
        let dataset = monthly_dataset();
        let filtered = TimeRange::OneYear.apply(&dataset, date(2030, 1, 1));
        assert_eq!(filtered, dataset);
    }

    #[test]
    fn test_unparseable_labels_never_qualify() {
        let dataset = TimeSeriesDataset::new(
            vec!["January".into(), "February".into()],
            vec![Series::from_values("A", [1.0, 2.0])],
        )
        .unwrap();
        assert_eq!(TimeRange::FiveYears.apply(&dataset, date(2024, 1, 1)), dataset);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dataset = monthly_dataset();
        let today = date(2024, 7, 1);
        let once = TimeRange::OneYear.apply(&dataset, today);
        let twice = TimeRange::OneYear.apply(&once, today);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let dataset = monthly_dataset();
        let snapshot = dataset.clone();
        let today = date(2024, 7, 1);

        let five = TimeRange::FiveYears.apply(&dataset, today);
        let max = TimeRange::Max.apply(&dataset, today);

        assert_eq!(dataset, snapshot);
        assert_eq!(max, snapshot);
        assert!(five.len() <= snapshot.len());
    }

    #[test]
    fn test_leap_day_cutoff_clamps() {
        assert_eq!(
            TimeRange::OneYear.cutoff(date(2024, 2, 29)),
            Some(date(2023, 2, 28))
        );
        assert_eq!(TimeRange::Max.cutoff(date(2024, 2, 29)), None);
    }
}
