//! Demo mode data source.
//!
//! Produces a synthetic metro catalog and monthly price/inventory series so
//! TrendScope can run without a backend. Output is deterministic for a given
//! seed and date: the same metro always gets the same curve.

use std::time::Duration;

use chrono::{Datelike, Months, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use trendscope_common::{DatasetEndpoint, Error, Result, Series, SeriesCatalog, TimeSeriesDataset};

/// Metros offered in demo mode.
const DEMO_METROS: [&str; 20] = [
    "Los Angeles, CA",
    "New York, NY",
    "Chicago, IL",
    "Houston, TX",
    "Phoenix, AZ",
    "Philadelphia, PA",
    "San Antonio, TX",
    "San Diego, CA",
    "Dallas, TX",
    "San Jose, CA",
    "Austin, TX",
    "Jacksonville, FL",
    "San Francisco, CA",
    "Columbus, OH",
    "Seattle, WA",
    "Denver, CO",
    "Boston, MA",
    "Nashville, TN",
    "Portland, OR",
    "Miami, FL",
];

/// Synthetic data generator.
#[derive(Debug, Clone)]
pub struct DemoSource {
    seed: u64,
    months: usize,
    latency: Duration,
    today: NaiveDate,
}

impl DemoSource {
    /// Demo source ending at the month before `today`.
    pub fn new(seed: u64, today: NaiveDate) -> Self {
        Self {
            seed,
            months: 72,
            latency: Duration::from_millis(150),
            today,
        }
    }

    /// Set the artificial response delay.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Simulate network latency.
    pub async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub fn catalog(&self) -> SeriesCatalog {
        SeriesCatalog::new(DEMO_METROS.iter().map(|s| s.to_string()).collect())
    }

    /// Month-end labels, oldest first, ending with the last full month.
    pub fn labels(&self) -> Vec<String> {
        let this_month = self.today.with_day(1).unwrap_or(self.today);
        (1..=self.months)
            .rev()
            .filter_map(|back| this_month.checked_sub_months(Months::new(back as u32)))
            .filter_map(month_end)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect()
    }

    /// Dataset for `endpoint` with one series per selected name.
    ///
    /// An empty selection is rejected the way the backend rejects it.
    pub fn dataset(
        &self,
        endpoint: DatasetEndpoint,
        selection: &[String],
    ) -> Result<TimeSeriesDataset> {
        if selection.is_empty() {
            return Err(Error::Status {
                url: endpoint.path().to_string(),
                status: 400,
            });
        }

        let labels = self.labels();
        let series = selection
            .iter()
            .map(|name| Series::from_values(name.clone(), self.walk(endpoint, name, labels.len())))
            .collect();
        TimeSeriesDataset::new(labels, series)
    }

    /// Yearly company financials, in dollars (shares in units).
    pub fn financials(&self) -> Result<TimeSeriesDataset> {
        let mut rng = SmallRng::seed_from_u64(self.seed ^ 0xF1_4A_4C_1A);
        let last_year = self.today.year() - 1;
        let years: Vec<i32> = (last_year - 8..=last_year).collect();

        let mut revenue = rng.random_range(180.0..260.0) * 1e9;
        let mut shares = rng.random_range(16.0..26.0) * 1e9;
        let mut rows = Vec::with_capacity(years.len());
        for _ in &years {
            revenue *= 1.0 + rng.random_range(-0.03..0.14);
            shares *= 1.0 - rng.random_range(0.0..0.04);
            let earnings = revenue * rng.random_range(0.18..0.27);
            let debt = revenue * rng.random_range(0.25..0.4);
            let fcf = earnings * rng.random_range(0.9..1.25);
            rows.push([revenue, earnings, debt, fcf, shares]);
        }

        let names = ["Revenue", "Earnings", "Debt", "Cash Flow", "Shares"];
        let series = names
            .iter()
            .enumerate()
            .map(|(i, name)| Series::from_values(*name, rows.iter().map(|row| row[i])))
            .collect();
        TimeSeriesDataset::new(years.iter().map(|y| y.to_string()).collect(), series)
    }

    /// Random walk for one metro on one endpoint.
    fn walk(&self, endpoint: DatasetEndpoint, name: &str, len: usize) -> Vec<f64> {
        let salt = match endpoint {
            DatasetEndpoint::Price => 1,
            DatasetEndpoint::Inventory => 2,
            DatasetEndpoint::City => 3,
        };
        let mut rng = SmallRng::seed_from_u64(name_seed(self.seed ^ salt, name));

        let (mut value, drift, noise): (f64, f64, f64) = match endpoint {
            DatasetEndpoint::Inventory => (rng.random_range(1_500.0..18_000.0), -0.002, 0.06),
            _ => (rng.random_range(280_000.0..1_300_000.0), 0.004, 0.012),
        };

        (0..len)
            .map(|_| {
                value *= 1.0 + drift + rng.random_range(-noise..noise);
                value.round()
            })
            .collect()
    }
}

/// Last day of the month starting at `first`.
fn month_end(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))?.pred_opt()
}

fn name_seed(seed: u64, name: &str) -> u64 {
    name.bytes()
        .fold(seed, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)))
}
