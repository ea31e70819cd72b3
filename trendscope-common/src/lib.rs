//! TrendScope Common Library
//!
//! This crate provides the GUI-independent core of the TrendScope dashboard:
//!
//! - [`dataset`] - Time-indexed dataset model (`TimeSeriesDataset`, `Series`, `SeriesCatalog`)
//! - [`response`] - Backend payload shapes and their adapters
//! - [`range`] - Time-range filtering (`TimeRange`)
//! - [`selection`] - Series selection, catalog search and candidate navigation
//! - [`fetch`] - Debounce and request-id bookkeeping
//! - [`client`] - HTTP backend client
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod range;
pub mod response;
pub mod selection;

// Re-export commonly used types at the crate root
pub use client::{BackendClient, CATALOG_PATH, DatasetEndpoint};
pub use config::{
    AppConfig, BackendConfig, DashboardConfig, LogFormat, LoggingConfig, load_config,
    parse_config,
};
pub use dataset::{Series, SeriesCatalog, TimeSeriesDataset, parse_label};
pub use error::{Error, Result};
pub use fetch::{Debouncer, LoadState, RequestId, RequestTracker};
pub use range::{TimeRange, today};
pub use response::{ChartResponse, FinancialMetric, FinancialRecord, FinancialsResponse};
pub use selection::{CandidateList, NavKey, SelectOutcome, Selection};

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// # Example
///
/// ```ignore
/// use trendscope_common::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
