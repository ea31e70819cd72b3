//! Where dashboard data comes from.

use trendscope_common::{BackendClient, DatasetEndpoint, Result, SeriesCatalog, TimeSeriesDataset};

use crate::demo::DemoSource;

/// Backend used by the application: the HTTP API or the built-in demo generator.
#[derive(Debug, Clone)]
pub enum DataSource {
    Http(BackendClient),
    Demo(DemoSource),
}

impl DataSource {
    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Http(client) => client.base_url().to_string(),
            DataSource::Demo(_) => "demo".to_string(),
        }
    }

    pub async fn catalog(self) -> Result<SeriesCatalog> {
        match self {
            DataSource::Http(client) => client.fetch_catalog().await,
            DataSource::Demo(demo) => {
                demo.wait().await;
                Ok(demo.catalog())
            }
        }
    }

    /// Fetch every endpoint for `selection`. One failure fails the batch.
    pub async fn datasets(
        self,
        endpoints: Vec<DatasetEndpoint>,
        selection: Vec<String>,
    ) -> Result<Vec<TimeSeriesDataset>> {
        match self {
            DataSource::Http(client) => client.fetch_datasets(&endpoints, &selection).await,
            DataSource::Demo(demo) => {
                demo.wait().await;
                endpoints
                    .iter()
                    .map(|&endpoint| demo.dataset(endpoint, &selection))
                    .collect()
            }
        }
    }

    pub async fn financials(self) -> Result<TimeSeriesDataset> {
        match self {
            DataSource::Http(client) => client.fetch_financials().await,
            DataSource::Demo(demo) => {
                demo.wait().await;
                demo.financials()
            }
        }
    }
}
