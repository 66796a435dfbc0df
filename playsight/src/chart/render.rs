//! Pure scene construction.
//!
//! [`render`] maps a normalized chart and its zoom state to a [`ChartScene`]
//! in plot fractions: x runs 0..1 left to right, y runs 0..1 top to bottom.
//! The canvas scales the scene to pixels, so everything here is testable
//! without a renderer.

use std::f64::consts::{FRAC_PI_2, TAU};

use playsight_common::MetricType;

use super::domain::{Domain, IndexWindow};
use super::normalize::{ChartData, NormalizedChart};
use super::zoom::{ZoomController, ZoomMode};
use crate::view::formatting::{
    format_percent, format_value, format_value_with_unit, format_x_label, with_unit,
};

pub const DEFAULT_X_LABEL: &str = "X Axis";
pub const DEFAULT_Y_LABEL: &str = "Y Axis";

/// Share of a band taken by a bar; histogram bars fill their band.
const BAR_WIDTH: f64 = 0.8;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Series and slice colors, reused cyclically.
pub const PALETTE: [Rgb; 4] = [
    Rgb::new(0x88, 0x84, 0xd8),
    Rgb::new(0x82, 0xca, 0x9d),
    Rgb::new(0xff, 0xc6, 0x58),
    Rgb::new(0xff, 0x73, 0x00),
];

/// Color for the series or slice at `position`.
pub fn palette_color(position: usize) -> Rgb {
    PALETTE[position % PALETTE.len()]
}

/// An axis tick at a plot fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// A data point placed in the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub index: usize,
}

/// A drawable element of a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// A line through points, drawn with a marker on each point.
    Polyline {
        series: String,
        color: Rgb,
        points: Vec<PlotPoint>,
    },
    /// A bar between `top` and `bottom`, centered at `x`.
    Bar {
        index: usize,
        x: f64,
        width: f64,
        top: f64,
        bottom: f64,
        color: Rgb,
    },
    /// A pie wedge. Angles are in radians, clockwise from the positive x
    /// axis with y pointing down; the first wedge starts at the top.
    Wedge {
        index: usize,
        start_angle: f64,
        end_angle: f64,
        color: Rgb,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub color: Rgb,
}

/// Horizontal extent of an in-progress drag selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub start: f64,
    pub end: f64,
}

/// Zoom controls shown next to a zoomable chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomControls {
    pub mode: ZoomMode,
    pub zoomed: bool,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub title: String,
    pub kind: MetricType,
    pub x_title: String,
    pub y_title: String,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub marks: Vec<Mark>,
    pub legend: Vec<LegendEntry>,
    pub selection: Option<Selection>,
    /// Absent for pie charts, which do not zoom.
    pub controls: Option<ZoomControls>,
}

/// Hover details for one x position or slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
}

/// Build the scene for a chart, or `None` when there is nothing to draw.
pub fn render(chart: &NormalizedChart, controller: &ZoomController) -> Option<ChartScene> {
    if chart.data.is_empty() {
        return None;
    }

    let x_title = axis_title(
        chart.labels.x_label.as_deref(),
        chart.labels.x_unit.as_deref(),
        DEFAULT_X_LABEL,
    );
    let y_title = axis_title(
        chart.labels.y_label.as_deref(),
        chart.labels.y_unit.as_deref(),
        DEFAULT_Y_LABEL,
    );

    let mut scene = ChartScene {
        title: chart.title.clone(),
        kind: chart.kind,
        x_title,
        y_title,
        x_ticks: Vec::new(),
        y_ticks: Vec::new(),
        marks: Vec::new(),
        legend: Vec::new(),
        selection: None,
        controls: None,
    };

    if let ChartData::Pie(slices) = &chart.data {
        let total: f64 = slices.iter().map(|s| s.value).sum();
        let mut angle = -FRAC_PI_2;
        for (i, slice) in slices.iter().enumerate() {
            let share = slice.value / total;
            let end = angle + share * TAU;
            scene.marks.push(Mark::Wedge {
                index: i,
                start_angle: angle,
                end_angle: end,
                color: palette_color(i),
                label: format!("{} {}", slice.name, format_percent(share)),
            });
            angle = end;
        }
        return Some(scene);
    }

    let len = chart.data.len();
    let layout = Layout::new(chart, controller);
    let y = controller.y_domain(&chart.data)?;

    scene.y_ticks = y
        .ticks(controller.tick_count(len))
        .into_iter()
        .map(|value| Tick {
            position: 1.0 - y.fraction(value),
            label: format_value(value),
        })
        .collect();

    scene.x_ticks = tick_indices(layout.window, controller.tick_count(len))
        .into_iter()
        .filter_map(|i| {
            Some(Tick {
                position: layout.center(i),
                label: format_x_label(&chart.data.label_at(i)?),
            })
        })
        .collect();

    match &chart.data {
        ChartData::Cartesian(points) if layout.bars => {
            let baseline = if y.is_degenerate() {
                1.0
            } else {
                1.0 - y.fraction(0.0_f64.clamp(y.min, y.max))
            };
            let color = palette_color(0);
            for point in points.iter().filter(|p| layout.window.contains(p.original_index)) {
                let value = 1.0 - y.fraction(point.y);
                scene.marks.push(Mark::Bar {
                    index: point.original_index,
                    x: layout.center(point.original_index),
                    width: layout.band() * layout.bar_width,
                    top: value.min(baseline),
                    bottom: value.max(baseline),
                    color,
                });
            }
        }
        ChartData::Cartesian(points) => {
            scene.marks.push(Mark::Polyline {
                series: chart.title.clone(),
                color: palette_color(0),
                points: points
                    .iter()
                    .filter(|p| layout.window.contains(p.original_index))
                    .map(|p| PlotPoint {
                        x: layout.center(p.original_index),
                        y: 1.0 - y.fraction(p.y),
                        index: p.original_index,
                    })
                    .collect(),
            });
        }
        ChartData::MultiLine { series_names, rows } => {
            for (s, name) in series_names.iter().enumerate() {
                let color = palette_color(s);
                scene.legend.push(LegendEntry {
                    name: name.clone(),
                    color,
                });
                scene.marks.push(Mark::Polyline {
                    series: name.clone(),
                    color,
                    points: rows
                        .iter()
                        .filter(|r| layout.window.contains(r.original_index))
                        .filter_map(|r| {
                            Some(PlotPoint {
                                x: layout.center(r.original_index),
                                y: 1.0 - y.fraction(*r.values.get(s)?),
                                index: r.original_index,
                            })
                        })
                        .collect(),
                });
            }
        }
        ChartData::Pie(_) => {}
    }

    scene.selection = controller.selection().map(|(a, b)| Selection {
        start: layout.start_edge(a),
        end: layout.end_edge(b),
    });
    scene.controls = Some(ZoomControls {
        mode: controller.mode(),
        zoomed: controller.is_zoomed(),
    });

    Some(scene)
}

/// The `original_index` under a horizontal plot fraction.
pub fn index_at(
    chart: &NormalizedChart,
    controller: &ZoomController,
    x_fraction: f64,
) -> Option<usize> {
    if !chart.data.is_zoomable() || !(0.0..=1.0).contains(&x_fraction) {
        return None;
    }
    Layout::new(chart, controller).index_at(x_fraction)
}

/// Tooltip for the point nearest a horizontal plot fraction.
pub fn tooltip(
    chart: &NormalizedChart,
    controller: &ZoomController,
    x_fraction: f64,
) -> Option<Tooltip> {
    let index = index_at(chart, controller, x_fraction)?;
    let labels = &chart.labels;
    let title = with_unit(
        format_x_label(&chart.data.label_at(index)?),
        labels.x_unit.as_deref(),
    );

    let lines = match &chart.data {
        ChartData::Cartesian(points) => {
            let point = points.get(index)?;
            let (name, unit) = match chart.kind {
                MetricType::Bar | MetricType::Hist => (
                    labels.y_label.as_deref().unwrap_or("Value"),
                    labels.value_unit.as_deref().or(labels.y_unit.as_deref()),
                ),
                _ => (
                    labels.y_label.as_deref().unwrap_or(chart.title.as_str()),
                    labels.y_unit.as_deref(),
                ),
            };
            vec![format!("{}: {}", name, format_value_with_unit(point.y, unit))]
        }
        ChartData::MultiLine { series_names, rows } => {
            let row = rows.get(index)?;
            series_names
                .iter()
                .zip(&row.values)
                .map(|(name, value)| {
                    format!(
                        "{}: {}",
                        name,
                        format_value_with_unit(*value, labels.y_unit.as_deref())
                    )
                })
                .collect()
        }
        ChartData::Pie(_) => return None,
    };

    Some(Tooltip { title, lines })
}

/// Tooltip for a pie slice.
pub fn pie_tooltip(chart: &NormalizedChart, slice: usize) -> Option<Tooltip> {
    let ChartData::Pie(slices) = &chart.data else {
        return None;
    };
    let entry = slices.get(slice)?;
    let total: f64 = slices.iter().map(|s| s.value).sum();

    Some(Tooltip {
        title: entry.name.clone(),
        lines: vec![format!(
            "{} ({})",
            format_value_with_unit(entry.value, entry.unit.as_deref()),
            format_percent(entry.value / total)
        )],
    })
}

/// The slice under an angle measured like [`Mark::Wedge`] angles.
pub fn pie_slice_at(chart: &NormalizedChart, angle: f64) -> Option<usize> {
    let ChartData::Pie(slices) = &chart.data else {
        return None;
    };
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return None;
    }

    // Angle past the top, in [0, TAU).
    let swept = (angle + FRAC_PI_2).rem_euclid(TAU);
    let mut start = 0.0;
    for (i, slice) in slices.iter().enumerate() {
        let end = start + slice.value / total * TAU;
        if swept < end {
            return Some(i);
        }
        start = end;
    }
    slices.len().checked_sub(1)
}

fn axis_title(label: Option<&str>, unit: Option<&str>, fallback: &str) -> String {
    let label = label.filter(|l| !l.trim().is_empty()).unwrap_or(fallback);
    match unit.filter(|u| !u.trim().is_empty()) {
        Some(unit) => format!("{} ({})", label, unit),
        None => label.to_string(),
    }
}

/// Evenly spread tick indices across a window.
fn tick_indices(window: IndexWindow, count: usize) -> Vec<usize> {
    let visible = window.visible_count();
    if count == 0 {
        return Vec::new();
    }
    if count >= visible {
        return window.indices().collect();
    }
    if count == 1 {
        return vec![window.start];
    }

    let step = (visible - 1) as f64 / (count - 1) as f64;
    let mut indices: Vec<usize> = (0..count)
        .map(|k| window.start + (k as f64 * step).round() as usize)
        .collect();
    indices.dedup();
    indices
}

/// Horizontal placement of indices. Lines map the continuous zoom range
/// onto the width; bars split the visible window into equal bands.
struct Layout {
    window: IndexWindow,
    x_range: Domain,
    bars: bool,
    bar_width: f64,
}

impl Layout {
    fn new(chart: &NormalizedChart, controller: &ZoomController) -> Self {
        let len = chart.data.len();
        let bars = matches!(chart.kind, MetricType::Bar | MetricType::Hist)
            && matches!(chart.data, ChartData::Cartesian(_));
        Self {
            window: controller.window(len),
            x_range: controller.x_range(len),
            bars,
            bar_width: if chart.kind == MetricType::Hist {
                1.0
            } else {
                BAR_WIDTH
            },
        }
    }

    fn band(&self) -> f64 {
        1.0 / self.window.visible_count() as f64
    }

    fn center(&self, index: usize) -> f64 {
        if self.bars {
            (index.saturating_sub(self.window.start) as f64 + 0.5) * self.band()
        } else {
            self.x_range.fraction(index as f64)
        }
    }

    fn start_edge(&self, index: usize) -> f64 {
        if self.bars {
            self.center(index) - self.band() / 2.0
        } else {
            self.center(index)
        }
        .clamp(0.0, 1.0)
    }

    fn end_edge(&self, index: usize) -> f64 {
        if self.bars {
            self.center(index) + self.band() / 2.0
        } else {
            self.center(index)
        }
        .clamp(0.0, 1.0)
    }

    fn index_at(&self, x_fraction: f64) -> Option<usize> {
        let index = if self.bars {
            self.window.start + (x_fraction / self.band()).floor() as usize
        } else if self.x_range.is_degenerate() {
            self.window.start
        } else {
            self.x_range.value_at(x_fraction).round().max(0.0) as usize
        };
        Some(index.clamp(self.window.start, self.window.end))
    }
}
