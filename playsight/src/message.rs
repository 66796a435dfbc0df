use playsight_common::{DateRange, MetricsResponse};

use crate::chart::ChartEvent;

/// Messages for the PlaySight application.
#[derive(Debug, Clone)]
pub enum Message {
    /// A metrics load for the given date range finished.
    MetricsLoaded(DateRange, Result<MetricsResponse, String>),

    /// Reload metrics for the current date range.
    Refresh,

    /// User picked a date range.
    SetDateRange(DateRange),

    /// Interaction with the chart of the given id.
    Chart(String, ChartEvent),

    /// A chart switched between drag and wheel zoom.
    ZoomModeChanged(String),

    // Settings messages
    /// Open the settings view.
    OpenSettings,

    /// Close the settings view.
    CloseSettings,

    /// Set the analytics endpoint.
    SetEndpoint(String),

    /// Set the request timeout.
    SetTimeout(String),

    /// Set the date range selected at startup.
    SetDefaultRange(DateRange),

    /// Save settings.
    SaveSettings,

    /// Reset settings to defaults.
    ResetSettings,

    /// Remove every cached response.
    ClearCache,
}
