//! Demo metrics generator.
//!
//! Produces realistic metric payloads for every chart type, including a
//! few malformed records, so the dashboard can run without an analytics
//! backend.

use std::f64::consts::PI;

use chrono::{Days, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use playsight_common::{DateRange, MetricRecord, MetricType, MetricsResponse, SeriesValues};

/// Regions reported by the player-region pie, two more than a pie shows.
const REGIONS: &[(&str, f64)] = &[
    ("North America", 4200.0),
    ("Europe", 3900.0),
    ("Asia", 3100.0),
    ("South America", 1400.0),
    ("Oceania", 620.0),
    ("Middle East", 540.0),
    ("Africa", 310.0),
    ("Central America", 280.0),
    ("Caribbean", 150.0),
    ("Central Asia", 120.0),
    ("Antarctica", 0.0),
    ("Arctic", 35.0),
];

/// Generator of demo metric payloads.
pub struct DemoGenerator {
    rng: SmallRng,
}

impl Default for DemoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoGenerator {
    /// Create a generator with random jitter.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Create a generator that always produces the same payloads.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Multiply `value` by a random factor within `spread` of 1.
    fn jitter(&mut self, value: f64, spread: f64) -> f64 {
        value * self.rng.random_range((1.0 - spread)..(1.0 + spread))
    }

    /// Build a full response for a date range ending at `today`.
    pub fn response(&mut self, range: DateRange, today: NaiveDate) -> MetricsResponse {
        let days = dates(range, today);

        MetricsResponse::new(vec![
            self.daily_active_users(&days),
            self.revenue(&days),
            self.concurrent_players(&days),
            self.session_lengths(),
            self.player_regions(),
            self.retention(),
            unsupported_metric(),
            mismatched_series(),
        ])
    }

    fn daily_active_users(&mut self, days: &[NaiveDate]) -> MetricRecord {
        let pairs: Vec<(String, f64)> = days
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let weekly = (i as f64 * 2.0 * PI / 7.0).sin() * 1500.0;
                let trend = i as f64 * 25.0;
                (day.to_string(), self.jitter(12_000.0 + weekly + trend, 0.05).round())
            })
            .collect();

        MetricRecord::new("Daily Active Users")
            .with_id("dau")
            .with_type(MetricType::Line)
            .with_pairs(pairs)
            .with_axis_labels("Date", "Players")
    }

    fn revenue(&mut self, days: &[NaiveDate]) -> MetricRecord {
        let pairs: Vec<(String, f64)> = days
            .iter()
            .map(|day| {
                let value = self.jitter(8_500.0, 0.3);
                (day.to_string(), (value * 100.0).round() / 100.0)
            })
            .collect();

        MetricRecord::new("Revenue")
            .with_id("revenue")
            .with_type(MetricType::Bar)
            .with_pairs(pairs)
            .with_axis_labels("Date", "Revenue")
            .with_units("", "USD")
            .with_value_unit("USD")
    }

    /// Dated pairs without a declared type; charted as a line.
    fn concurrent_players(&mut self, days: &[NaiveDate]) -> MetricRecord {
        let pairs: Vec<(String, f64)> = days
            .iter()
            .map(|day| (day.to_string(), self.jitter(2_300.0, 0.15).round()))
            .collect();

        MetricRecord::new("Peak Concurrent Players")
            .with_pairs(pairs)
            .with_axis_labels("Date", "Players")
    }

    fn session_lengths(&mut self) -> MetricRecord {
        let buckets = ["0-5", "5-10", "10-20", "20-30", "30-60", "60+"];
        let shape = [900.0, 2400.0, 3800.0, 2100.0, 1200.0, 400.0];
        let pairs: Vec<(String, f64)> = buckets
            .iter()
            .zip(shape)
            .map(|(bucket, count)| (bucket.to_string(), self.jitter(count, 0.1).round()))
            .collect();

        MetricRecord::new("Session Length Distribution")
            .with_id("session-length")
            .with_type(MetricType::Hist)
            .with_pairs(pairs)
            .with_axis_labels("Session length", "Sessions")
            .with_units("min", "")
    }

    fn player_regions(&mut self) -> MetricRecord {
        let pairs: Vec<(String, f64)> = REGIONS
            .iter()
            .map(|(region, players)| (region.to_string(), self.jitter(*players, 0.05).round()))
            .collect();

        MetricRecord::new("Players by Region")
            .with_id("regions")
            .with_type(MetricType::Pie)
            .with_pairs(pairs)
            .with_value_unit("players")
    }

    fn retention(&mut self) -> MetricRecord {
        let categories = ["Day 1", "Day 3", "Day 7", "Day 14", "Day 30"];
        let decay = [1.0, 0.72, 0.55, 0.41, 0.3];
        let cohorts = [("January", 46.0), ("February", 51.0), ("March", 49.0)];

        let series = cohorts
            .iter()
            .map(|(name, day_one)| {
                let values = decay
                    .iter()
                    .map(|d| (self.jitter(day_one * d, 0.04) * 10.0).round() / 10.0)
                    .collect();
                SeriesValues::new(*name, values)
            })
            .collect();

        MetricRecord::new("Retention by Cohort")
            .with_id("retention")
            .with_type(MetricType::MultiLine)
            .with_series(&categories, series)
            .with_axis_labels("Days since install", "Retained")
            .with_units("", "%")
    }
}

/// Build a demo response with fresh jitter.
pub fn demo_response(range: DateRange, today: NaiveDate) -> MetricsResponse {
    DemoGenerator::new().response(range, today)
}

/// Days covered by a range, oldest first.
fn dates(range: DateRange, today: NaiveDate) -> Vec<NaiveDate> {
    let (start, end) = range.bounds(today);
    (0..=range.days())
        .filter_map(|i| start.checked_add_days(Days::new(i)))
        .take_while(|day| *day <= end)
        .collect()
}

/// A record with a chart type the dashboard does not draw.
fn unsupported_metric() -> MetricRecord {
    let mut record = MetricRecord::new("Churn Forecast")
        .with_id("churn")
        .with_values(&[0.1, 0.12, 0.09]);
    record.metric_type = Some("scatter".to_string());
    record
}

/// A multiline record whose series disagree with its categories.
fn mismatched_series() -> MetricRecord {
    MetricRecord::new("Matchmaking Latency")
        .with_id("latency")
        .with_type(MetricType::MultiLine)
        .with_series(
            &["EU", "NA", "APAC"],
            vec![
                SeriesValues::new("p50", vec![42.0, 38.0, 71.0]),
                SeriesValues::new("p99", vec![180.0, 150.0]),
            ],
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::normalize_all;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_dates_cover_range() {
        let days = dates(DateRange::LastWeek, today());
        assert_eq!(days.len(), 8);
        assert_eq!(days.first(), NaiveDate::from_ymd_opt(2024, 3, 3).as_ref());
        assert_eq!(days.last(), Some(&today()));
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let a = DemoGenerator::seeded(7).response(DateRange::LastMonth, today());
        let b = DemoGenerator::seeded(7).response(DateRange::LastMonth, today());
        assert_eq!(a, b);
    }

    #[test]
    fn test_demo_payload_charts() {
        let response = DemoGenerator::seeded(1).response(DateRange::LastMonth, today());
        assert_eq!(response.metrics.len(), 8);

        let charts = normalize_all(&response.metrics);
        let ids: Vec<&str> = charts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["dau", "revenue", "metric-2", "session-length", "regions", "retention"]
        );

        let kinds: Vec<MetricType> = charts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MetricType::Line,
                MetricType::Bar,
                MetricType::Line,
                MetricType::Hist,
                MetricType::Pie,
                MetricType::MultiLine,
            ]
        );
        assert_eq!(charts[4].data.len(), 10);
    }
}
