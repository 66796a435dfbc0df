//! UI tests using iced_test Simulator.
//!
//! These tests verify the UI behavior without an analytics backend.

use iced_test::simulator;

use playsight::chart::{ChartEvent, ZoomMode};
use playsight::message::Message;
use playsight::view::dashboard::{DashboardState, dashboard_view};
use playsight::view::settings::{SettingsState, settings_view};
use playsight_common::{DateRange, MetricRecord, MetricType, MetricsResponse};

fn single_chart_state() -> DashboardState {
    let mut state = DashboardState::new(DateRange::LastWeek, "demo data");
    state.apply_response(&MetricsResponse::new(vec![
        MetricRecord::new("Daily Active Users")
            .with_id("dau")
            .with_type(MetricType::Line)
            .with_pairs(vec![
                ("2024-03-01", 120.0),
                ("2024-03-02", 150.0),
                ("2024-03-03", 130.0),
            ]),
    ]));
    state
}

/// Test that the dashboard view renders correctly with no charts.
#[test]
fn test_dashboard_empty() {
    let state = DashboardState::default();
    let mut ui = simulator(dashboard_view(&state));

    assert!(ui.find("No metrics for this date range").is_ok());
    assert!(ui.find("0 charts").is_ok());
}

/// Test the empty dashboard while the first load is in flight.
#[test]
fn test_dashboard_loading() {
    let mut state = DashboardState::default();
    state.start_loading();
    let mut ui = simulator(dashboard_view(&state));

    assert!(ui.find("Loading metrics...").is_ok());
}

/// Test that charts render with their titles and zoom controls.
#[test]
fn test_dashboard_with_charts() {
    let state = single_chart_state();
    let mut ui = simulator(dashboard_view(&state));

    assert!(ui.find("Daily Active Users").is_ok());
    assert!(ui.find("1 charts").is_ok());
    assert!(ui.find("Mode: Drag").is_ok());
    assert!(ui.find("Source: demo data").is_ok());
}

/// Test that skipped metrics are reported in the header.
#[test]
fn test_dashboard_reports_skipped_metrics() {
    let mut state = DashboardState::default();
    let mut scatter = MetricRecord::new("Scatter").with_values(&[1.0, 2.0]);
    scatter.metric_type = Some("scatter".to_string());
    state.apply_response(&MetricsResponse::new(vec![
        MetricRecord::new("DAU").with_values(&[1.0, 2.0]),
        scatter,
    ]));

    let mut ui = simulator(dashboard_view(&state));
    assert!(ui.find("1 metric could not be charted").is_ok());
}

/// Test that load errors are shown.
#[test]
fn test_dashboard_error() {
    let mut state = DashboardState::default();
    state.apply_error("connection refused".to_string());
    let mut ui = simulator(dashboard_view(&state));

    assert!(ui.find("Error: connection refused").is_ok());
}

/// Test clicking the Settings button.
#[test]
fn test_dashboard_settings_button() {
    let state = DashboardState::default();
    let mut ui = simulator(dashboard_view(&state));

    let _ = ui.click("Settings");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::OpenSettings)));
}

/// Test clicking a date-range button.
#[test]
fn test_dashboard_date_range_button() {
    let state = DashboardState::default();
    let mut ui = simulator(dashboard_view(&state));

    let _ = ui.click("7d");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(
        messages
            .iter()
            .any(|m| matches!(m, Message::SetDateRange(DateRange::LastWeek)))
    );
}

/// Test clicking Refresh.
#[test]
fn test_dashboard_refresh_button() {
    let state = DashboardState::default();
    let mut ui = simulator(dashboard_view(&state));

    let _ = ui.click("Refresh");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::Refresh)));
}

/// Test toggling a chart's zoom mode.
#[test]
fn test_chart_mode_button() {
    let state = single_chart_state();
    let mut ui = simulator(dashboard_view(&state));

    let _ = ui.click("Mode: Drag");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(
        m,
        Message::Chart(id, ChartEvent::SetMode(ZoomMode::Wheel)) if id == "dau"
    )));
}

/// Test that the settings view renders correctly.
#[test]
fn test_settings_view() {
    let state = SettingsState::default();
    let mut ui = simulator(settings_view(&state));

    assert!(ui.find("Settings").is_ok());
    assert!(ui.find("Analytics Source").is_ok());
    assert!(ui.find("Caching is disabled").is_ok());
}

/// Test clicking Save Settings button.
#[test]
fn test_settings_save_button() {
    let state = SettingsState::default();
    let mut ui = simulator(settings_view(&state));

    let _ = ui.click("Save Settings");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::SaveSettings)));
}

/// Test clicking Back in the settings view.
#[test]
fn test_settings_back_button() {
    let state = SettingsState::default();
    let mut ui = simulator(settings_view(&state));

    let _ = ui.click("<- Back");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::CloseSettings)));
}
