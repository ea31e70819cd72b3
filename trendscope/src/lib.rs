//! TrendScope - Desktop dashboard for housing and financial time series.
//!
//! This library exposes the core components for testing.

pub mod app;
pub mod demo;
pub mod message;
pub mod source;
pub mod view;

// Re-export commonly used types
pub use app::App;
pub use message::{Board, Message, Page};
pub use source::DataSource;
