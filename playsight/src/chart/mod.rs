//! Interactive charting engine.
//!
//! Metric records flow through four stages:
//!
//! - [`normalize`] resolves a record into chart-type-specific data with a
//!   stable `original_index` per point
//! - [`domain`] computes padded value domains and tick density
//! - [`zoom`] holds the per-chart zoom state machine (drag and wheel modes)
//! - [`render`] turns data plus zoom state into a [`ChartScene`]
//!
//! Everything up to the scene is plain data with no I/O. [`canvas`] draws
//! scenes with Iced and turns mouse input into [`ChartEvent`]s, and
//! [`instance`] ties one chart's data, zoom state and geometry cache together.

pub mod canvas;
pub mod domain;
pub mod instance;
pub mod normalize;
pub mod render;
pub mod zoom;

use thiserror::Error;

use playsight_common::ShapeError;

pub use domain::{Domain, IndexWindow, calculate_domain, tick_count};
pub use instance::ChartInstance;
pub use normalize::{
    AxisLabels, CartesianPoint, ChartData, MultiLineRow, NormalizedChart, PieSlice, normalize,
    normalize_all,
};
pub use render::{ChartScene, Mark, Rgb, Tick, Tooltip, palette_color, render};
pub use zoom::{Bound, ZoomController, ZoomMode, ZoomOutcome, ZoomState};

/// Reasons a metric cannot be charted. Each one skips a single chart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("invalid data shape: {0}")]
    InvalidDataShape(String),

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("series '{series}' has {actual} values for {expected} categories")]
    MismatchedSeriesLength {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported chart type '{0}'")]
    UnsupportedChartType(String),
}

impl From<ShapeError> for ChartError {
    fn from(e: ShapeError) -> Self {
        match e {
            ShapeError::InvalidDataShape(reason) => ChartError::InvalidDataShape(reason),
            ShapeError::EmptyDataset => ChartError::EmptyDataset,
        }
    }
}

/// User interaction with one chart, published by its canvas or controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// Left button pressed over the data point at this index.
    MouseDown(usize),
    /// Cursor moved over this index while a selection is in progress.
    MouseMove(usize),
    /// Left button released.
    MouseUp,
    /// Wheel scrolled. `delta_y > 0` scrolls down (zoom out); `x_fraction`
    /// is the cursor position across the plot width.
    Wheel { delta_y: f64, x_fraction: f64 },
    /// Switch between drag-select and wheel zoom.
    SetMode(ZoomMode),
    /// Restore the full extent.
    Reset,
}
