//! HTTP client for the read-only data backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::dataset::{SeriesCatalog, TimeSeriesDataset};
use crate::error::{Error, Result};
use crate::response::{ChartResponse, FinancialsResponse};

/// Path of the series catalog endpoint.
pub const CATALOG_PATH: &str = "/api/cities";

/// A per-selection chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetEndpoint {
    /// Mean list price.
    Price,
    /// For-sale inventory.
    Inventory,
    /// Combined city trend data.
    City,
}

impl DatasetEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            DatasetEndpoint::Price => "/api/pricedata",
            DatasetEndpoint::Inventory => "/api/inventorydata",
            DatasetEndpoint::City => "/api/citydata",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DatasetEndpoint::Price => "Mean List Price",
            DatasetEndpoint::Inventory => "For-Sale Inventory",
            DatasetEndpoint::City => "City Trends",
        }
    }

    /// Whether values are dollar amounts.
    pub fn is_currency(&self) -> bool {
        matches!(self, DatasetEndpoint::Price)
    }
}

impl std::fmt::Display for DatasetEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Thin `reqwest` wrapper; cheap to clone.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    financials_path: String,
}

impl BackendClient {
    /// Create a client from configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            financials_path: config.financials_path.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` with optional query pairs and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, ?query, "GET");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Backend returned an error status");
            return Err(Error::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the ordered list of selectable series.
    pub async fn fetch_catalog(&self) -> Result<SeriesCatalog> {
        let names: Vec<String> = self.get_json(CATALOG_PATH, &[]).await?;
        Ok(SeriesCatalog::new(names))
    }

    /// Fetch one dataset for the given selection.
    pub async fn fetch_dataset(
        &self,
        endpoint: DatasetEndpoint,
        selection: &[String],
    ) -> Result<TimeSeriesDataset> {
        let cities = selection.join(",");
        let response: ChartResponse = self
            .get_json(endpoint.path(), &[("cities", cities.as_str())])
            .await?;
        response.into_dataset()
    }

    /// Fetch several datasets concurrently, returned in `endpoints` order.
    ///
    /// The first failure fails the whole batch and the remaining requests are
    /// dropped, so callers never see a half-completed set.
    pub async fn fetch_datasets(
        &self,
        endpoints: &[DatasetEndpoint],
        selection: &[String],
    ) -> Result<Vec<TimeSeriesDataset>> {
        let mut set = JoinSet::new();
        for (index, &endpoint) in endpoints.iter().enumerate() {
            let client = self.clone();
            let selection = selection.to_vec();
            set.spawn(async move {
                let dataset = client.fetch_dataset(endpoint, &selection).await;
                (index, dataset)
            });
        }

        let mut results: Vec<Option<TimeSeriesDataset>> = vec![None; endpoints.len()];
        while let Some(joined) = set.join_next().await {
            let (index, dataset) = joined.map_err(|e| {
                Error::Io(std::io::Error::other(format!("fetch task failed: {}", e)))
            })?;
            results[index] = Some(dataset?);
        }

        results
            .into_iter()
            .map(|d| d.ok_or_else(|| Error::Dataset("missing dataset in batch".to_string())))
            .collect()
    }

    /// Fetch the financial records endpoint.
    pub async fn fetch_financials(&self) -> Result<TimeSeriesDataset> {
        let response: FinancialsResponse = self.get_json(&self.financials_path, &[]).await?;
        response.into_dataset()
    }
}
