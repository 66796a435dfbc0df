//! Where dashboard metrics come from.

use std::path::PathBuf;

use chrono::NaiveDate;
use iced::Task;

use playsight_common::{AnalyticsClient, DateRange, MetricsResponse, load_metrics_file};

use crate::message::Message;
use crate::mock::demo_response;

/// A source of metric payloads.
#[derive(Debug, Clone)]
pub enum MetricsSource {
    /// The analytics HTTP endpoint, behind the response cache.
    Remote(AnalyticsClient),
    /// A local JSON payload, reread on every load.
    File(PathBuf),
    /// Generated demo data.
    Demo,
}

impl MetricsSource {
    /// Short description for the dashboard header.
    pub fn describe(&self) -> String {
        match self {
            MetricsSource::Remote(client) => client.metrics_url(),
            MetricsSource::File(path) => format!("file {}", path.display()),
            MetricsSource::Demo => "demo data".to_string(),
        }
    }

    /// Load metrics for a date range ending at `today`. The task resolves
    /// to [`Message::MetricsLoaded`].
    pub fn load(&self, range: DateRange, today: NaiveDate) -> Task<Message> {
        match self {
            MetricsSource::Remote(client) => {
                let client = client.clone();
                let (start, end) = range.bounds(today);
                Task::perform(
                    async move {
                        client
                            .fetch_metrics(start, end)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    move |result| Message::MetricsLoaded(range, result),
                )
            }
            MetricsSource::File(path) => {
                let path = path.clone();
                Task::perform(load_file(path), move |result| Message::MetricsLoaded(range, result))
            }
            MetricsSource::Demo => {
                Task::done(Message::MetricsLoaded(range, Ok(demo_response(range, today))))
            }
        }
    }
}

async fn load_file(path: PathBuf) -> Result<MetricsResponse, String> {
    tokio::task::spawn_blocking(move || load_metrics_file(&path))
        .await
        .map_err(|e| format!("File loader failed: {}", e))?
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playsight_common::AnalyticsConfig;

    #[test]
    fn test_describe() {
        assert_eq!(MetricsSource::Demo.describe(), "demo data");
        assert_eq!(
            MetricsSource::File(PathBuf::from("metrics.json")).describe(),
            "file metrics.json"
        );

        let config = AnalyticsConfig {
            endpoint: "https://analytics.example.com/api/".to_string(),
            ..AnalyticsConfig::default()
        };
        let client = AnalyticsClient::new(&config, None).unwrap();
        assert_eq!(
            MetricsSource::Remote(client).describe(),
            "https://analytics.example.com/api/metrics"
        );
    }

    #[tokio::test]
    async fn test_load_missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_file(dir.path().join("missing.json")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(&path, r#"{"metrics": [{"name": "DAU", "values": [1, 2, 3]}]}"#).unwrap();

        let response = load_file(path).await.unwrap();
        assert_eq!(response.metrics.len(), 1);
        assert_eq!(response.metrics[0].name, "DAU");
    }
}
