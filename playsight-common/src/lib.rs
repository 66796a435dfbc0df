//! PlaySight Common Library
//!
//! This crate provides shared types and utilities for the PlaySight dashboard:
//!
//! - [`metric`] - Wire model for metric payloads (`MetricsResponse`, `MetricRecord`, `MetricShape`)
//! - [`range`] - Date-range filters for metric queries
//! - [`dates`] - Date parsing and display helpers
//! - [`cache`] - Timed on-disk cache of metrics responses
//! - [`client`] - HTTP client for the analytics endpoint
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod cache;
pub mod client;
pub mod config;
pub mod dates;
pub mod error;
pub mod metric;
pub mod range;

// Re-export commonly used types at the crate root
pub use cache::{
    CACHE_FRESHNESS_MS, CachedMetricsResponse, ResponseCache, cache_key, current_timestamp_millis,
};
pub use client::{AnalyticsClient, load_metrics_file};
pub use config::{
    AnalyticsConfig, CacheConfig, LogFormat, LoggingConfig, PlaySightConfig, default_config_path,
    load_config, parse_config, save_config,
};
pub use error::{Error, Result};
pub use metric::{
    MetricRecord, MetricShape, MetricType, MetricsResponse, SeriesValues, ShapeError,
    UnknownMetricType, XValue,
};
pub use range::DateRange;

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// # Example
///
/// ```ignore
/// use playsight_common::{LoggingConfig, LogFormat, init_tracing};
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
