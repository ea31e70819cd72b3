//! TrendScope - Desktop dashboard for housing and financial time series.
//!
//! Charts per-metro price and inventory trends plus company financials,
//! fetched from a read-only JSON backend.

use std::path::PathBuf;

use clap::Parser;
use iced::application;

use trendscope::{App, DataSource};
use trendscope::demo::DemoSource;
use trendscope_common::{AppConfig, BackendClient, init_tracing};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "trendscope")]
#[command(about = "Housing and financial trend dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long)]
    base_url: Option<String>,

    /// Use generated demo data instead of the backend
    #[arg(long)]
    demo: bool,

    /// Log level, overriding the configuration
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::discover(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.backend.base_url = base_url;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging)?;
    tracing::info!("Starting TrendScope");

    let source = if args.demo {
        DataSource::Demo(DemoSource::new(42, trendscope_common::today()))
    } else {
        DataSource::Http(BackendClient::new(&config.backend)?)
    };

    application(
        move || App::boot(config.clone(), source.clone()),
        App::update,
        App::view,
    )
    .title(App::title)
    .subscription(App::subscription)
    .theme(App::theme)
    .run()
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
