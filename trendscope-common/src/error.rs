use thiserror::Error;

/// Common error type for TrendScope components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from the network or the backend's HTTP status.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status { .. })
    }
}

/// Result type alias using TrendScope's Error.
pub type Result<T> = std::result::Result<T, Error>;
