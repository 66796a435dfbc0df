use chrono::NaiveDate;
use std::path::Path;
use std::time::Duration;

use crate::cache::{ResponseCache, cache_key};
use crate::config::AnalyticsConfig;
use crate::error::{Error, Result};
use crate::metric::MetricsResponse;

/// HTTP client for the analytics metrics endpoint, with an optional
/// response cache in front of it.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: reqwest::Client,
    endpoint: String,
    cache: Option<ResponseCache>,
}

impl AnalyticsClient {
    /// Create a client from configuration.
    pub fn new(config: &AnalyticsConfig, cache: Option<ResponseCache>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// URL of the metrics resource.
    pub fn metrics_url(&self) -> String {
        format!("{}/metrics", self.endpoint)
    }

    /// Fetch metrics for a date range, serving fresh cached responses
    /// without a network round trip.
    pub async fn fetch_metrics(&self, start: NaiveDate, end: NaiveDate) -> Result<MetricsResponse> {
        let key = cache_key(start, end);

        if let Some(cache) = &self.cache
            && let Some(cached) = cached_response(cache, &key).await
        {
            tracing::debug!(key = %key, metrics = cached.metrics.len(), "Serving cached metrics");
            return Ok(cached);
        }

        let url = self.metrics_url();
        tracing::info!(url = %url, start = %start, end = %end, "Fetching metrics");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: MetricsResponse = response.json().await?;
        tracing::info!(metrics = data.metrics.len(), "Received metrics");

        if let Some(cache) = &self.cache
            && let Err(e) = store_response(cache, &key, &data).await
        {
            tracing::warn!(key = %key, error = %e, "Failed to cache metrics response");
        }

        Ok(data)
    }
}

/// Cache lookup on the blocking pool. A failed task counts as a miss.
async fn cached_response(cache: &ResponseCache, key: &str) -> Option<MetricsResponse> {
    let cache = cache.clone();
    let key = key.to_string();
    match tokio::task::spawn_blocking(move || cache.get(&key)).await {
        Ok(cached) => cached,
        Err(e) => {
            tracing::warn!(error = %e, "Cache lookup task failed");
            None
        }
    }
}

/// Cache write on the blocking pool.
async fn store_response(cache: &ResponseCache, key: &str, data: &MetricsResponse) -> Result<()> {
    let cache = cache.clone();
    let key = key.to_string();
    let data = data.clone();
    tokio::task::spawn_blocking(move || cache.put(&key, &data))
        .await
        .map_err(|e| Error::Cache(format!("cache write task failed: {}", e)))?
}

/// Load a metrics payload from a local JSON file.
pub fn load_metrics_file(path: impl AsRef<Path>) -> Result<MetricsResponse> {
    let path = path.as_ref();
    let content = std::fs::read(path)?;
    MetricsResponse::from_slice(&content).map_err(|e| match e {
        Error::Json(inner) => Error::Config(format!(
            "Failed to parse metrics file '{}': {}",
            path.display(),
            inner
        )),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_url_trims_slash() {
        let config = AnalyticsConfig {
            endpoint: "http://localhost:8000/api/".to_string(),
            ..AnalyticsConfig::default()
        };
        let client = AnalyticsClient::new(&config, None).unwrap();
        assert_eq!(client.metrics_url(), "http://localhost:8000/api/metrics");
    }

    #[tokio::test]
    async fn test_fetch_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let cached =
            MetricsResponse::new(vec![crate::MetricRecord::new("DAU").with_values(&[1.0])]);
        cache.put(&cache_key(start, end), &cached).unwrap();

        // The endpoint is unreachable, so a result can only come from the cache.
        let config = AnalyticsConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..AnalyticsConfig::default()
        };
        let client = AnalyticsClient::new(&config, Some(cache)).unwrap();

        let response = client.fetch_metrics(start, end).await.unwrap();
        assert_eq!(response, cached);
    }

    #[tokio::test]
    async fn test_store_then_lookup_uses_cache_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        let key = "metrics_2024-02-01_2024-02-29";
        let data = MetricsResponse::new(vec![crate::MetricRecord::new("WAU").with_values(&[3.0])]);

        assert_eq!(cached_response(&cache, key).await, None);
        store_response(&cache, key, &data).await.unwrap();

        assert_eq!(cache.get(key), Some(data.clone()));
        assert_eq!(cached_response(&cache, key).await, Some(data));
    }

    #[test]
    fn test_load_metrics_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(&path, r#"{"metrics": [{"name": "DAU", "values": [1, 2]}]}"#).unwrap();

        let response = load_metrics_file(&path).unwrap();
        assert_eq!(response.metrics.len(), 1);
        assert_eq!(response.metrics[0].name, "DAU");

        std::fs::write(&path, "{").unwrap();
        assert!(matches!(load_metrics_file(&path), Err(Error::Config(_))));
    }
}
