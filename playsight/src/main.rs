//! PlaySight - Interactive dashboard for gaming analytics metrics.
//!
//! Fetches metric payloads for a date range and renders each one as a
//! zoomable chart.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use iced::application;

use playsight::{AppOptions, MetricsSource, PlaySight};
use playsight_common::{
    AnalyticsClient, PlaySightConfig, ResponseCache, default_config_path, init_tracing,
    load_config,
};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(about = "PlaySight analytics dashboard")]
struct Args {
    /// Path to configuration file (defaults to the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chart generated demo data instead of querying the endpoint.
    #[arg(long, conflicts_with = "file")]
    demo: bool,

    /// Chart a metrics payload from a local JSON file.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Override the analytics endpoint.
    #[arg(long)]
    endpoint: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config: PlaySightConfig = match &config_path {
        Some(path) if path.exists() => load_config(path)?,
        _ => PlaySightConfig::default(),
    };

    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(endpoint) = args.endpoint {
        config.analytics.endpoint = endpoint;
    }

    init_tracing(&config.logging)?;
    tracing::info!("Starting PlaySight");

    let cache = if config.cache.enabled {
        match &config.cache.directory {
            Some(dir) => Some(ResponseCache::new(dir)),
            None => ResponseCache::default_location(),
        }
    } else {
        None
    };

    let source = if args.demo {
        MetricsSource::Demo
    } else if let Some(path) = args.file {
        MetricsSource::File(path)
    } else {
        let client = AnalyticsClient::new(&config.analytics, cache.clone())
            .context("Failed to create analytics client")?;
        MetricsSource::Remote(client)
    };
    tracing::info!(source = %source.describe(), "Metrics source selected");

    let options = AppOptions {
        config,
        config_path,
        source,
        cache,
    };

    application(
        move || PlaySight::boot(options.clone()),
        PlaySight::update,
        PlaySight::view,
    )
    .title(PlaySight::title)
    .theme(PlaySight::theme)
    .run()
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
