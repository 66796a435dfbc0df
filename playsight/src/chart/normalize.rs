//! Conversion of metric records into chart-ready data.

use std::collections::HashSet;

use playsight_common::{MetricRecord, MetricShape, MetricType, SeriesValues, XValue};

use super::ChartError;

/// Maximum number of pie slices; smaller slices are dropped.
pub const PIE_MAX_SLICES: usize = 10;

/// A point of a line, bar or histogram chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianPoint {
    /// Original x value (a label, date or number).
    pub label: XValue,
    pub y: f64,
    /// Position in the source data; the zoomable axis.
    pub original_index: usize,
}

/// A pie wedge.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub unit: Option<String>,
}

/// One category of a multiline chart, with a value per series.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLineRow {
    pub category: String,
    /// Values in series order.
    pub values: Vec<f64>,
    pub original_index: usize,
}

/// Chart-type-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Cartesian(Vec<CartesianPoint>),
    Pie(Vec<PieSlice>),
    MultiLine {
        series_names: Vec<String>,
        rows: Vec<MultiLineRow>,
    },
}

impl ChartData {
    /// Number of points, slices or categories.
    pub fn len(&self) -> usize {
        match self {
            ChartData::Cartesian(points) => points.len(),
            ChartData::Pie(slices) => slices.len(),
            ChartData::MultiLine { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this data lives on an index axis that can be zoomed.
    pub fn is_zoomable(&self) -> bool {
        !self.is_empty() && !matches!(self, ChartData::Pie(_))
    }

    /// Raw x label at an index.
    pub fn label_at(&self, index: usize) -> Option<String> {
        match self {
            ChartData::Cartesian(points) => points.get(index).map(|p| p.label.to_string()),
            ChartData::Pie(slices) => slices.get(index).map(|s| s.name.clone()),
            ChartData::MultiLine { rows, .. } => rows.get(index).map(|r| r.category.clone()),
        }
    }
}

/// Axis titles and units carried over from the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisLabels {
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_unit: Option<String>,
    pub y_unit: Option<String>,
    pub value_unit: Option<String>,
}

/// A metric ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChart {
    pub id: String,
    pub kind: MetricType,
    pub title: String,
    pub labels: AxisLabels,
    pub data: ChartData,
}

/// Pick a chart type for a record that does not declare one.
pub fn infer_type(shape: &MetricShape) -> MetricType {
    match shape {
        MetricShape::MultiSeries { .. } => MetricType::MultiLine,
        shape if shape.has_date_pairs() => MetricType::Line,
        _ => MetricType::Bar,
    }
}

/// Normalize one record. `position` is the record's place in its
/// collection and seeds the generated id.
pub fn normalize(record: &MetricRecord, position: usize) -> Result<NormalizedChart, ChartError> {
    let declared = match record.declared_type() {
        Some(Ok(kind)) => Some(kind),
        Some(Err(unknown)) => return Err(ChartError::UnsupportedChartType(unknown.0)),
        None => None,
    };

    let shape = record.shape()?;
    let kind = declared.unwrap_or_else(|| infer_type(&shape));

    let data = match kind {
        MetricType::Line | MetricType::Bar | MetricType::Hist => cartesian(shape)?,
        MetricType::Pie => {
            let unit = record.value_unit.clone().or_else(|| record.y_unit.clone());
            pie(shape, unit)?
        }
        MetricType::MultiLine => multi_line(shape)?,
    };

    Ok(NormalizedChart {
        id: record.resolved_id(position),
        kind,
        title: record.name.clone(),
        labels: AxisLabels {
            x_label: record.x_label.clone(),
            y_label: record.y_label.clone(),
            x_unit: record.x_unit.clone(),
            y_unit: record.y_unit.clone(),
            value_unit: record.value_unit.clone(),
        },
        data,
    })
}

/// Normalize a collection, skipping (and logging) records that cannot be
/// charted. Duplicate ids get the record position appended, and a counter
/// when that is taken too.
pub fn normalize_all(records: &[MetricRecord]) -> Vec<NormalizedChart> {
    let mut seen = HashSet::new();
    let mut charts = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        match normalize(record, position) {
            Ok(mut chart) => {
                if !seen.insert(chart.id.clone()) {
                    chart.id = unique_id(&mut seen, &chart.id, position);
                }
                charts.push(chart);
            }
            Err(e) => {
                tracing::warn!(
                    metric = %record.resolved_id(position),
                    name = %record.name,
                    error = %e,
                    "Skipping chart"
                );
            }
        }
    }

    charts
}

/// `{id}-{position}`, with a counter appended until it is unused.
fn unique_id(seen: &mut HashSet<String>, id: &str, position: usize) -> String {
    let mut candidate = format!("{}-{}", id, position);
    let mut n = 1;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{}-{}-{}", id, position, n);
        n += 1;
    }
    candidate
}

fn cartesian(shape: MetricShape) -> Result<ChartData, ChartError> {
    let points: Vec<CartesianPoint> = match shape {
        MetricShape::Flat(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, y)| CartesianPoint {
                label: XValue::Text(i.to_string()),
                y,
                original_index: i,
            })
            .collect(),
        MetricShape::Pairs(pairs) => pairs
            .into_iter()
            .enumerate()
            .map(|(i, (label, y))| CartesianPoint {
                label,
                y,
                original_index: i,
            })
            .collect(),
        MetricShape::MultiSeries { .. } => {
            return Err(ChartError::InvalidDataShape(
                "multi-series data needs a multiline chart".to_string(),
            ));
        }
    };

    if points.is_empty() {
        return Err(ChartError::EmptyDataset);
    }
    Ok(ChartData::Cartesian(points))
}

fn pie(shape: MetricShape, unit: Option<String>) -> Result<ChartData, ChartError> {
    let entries: Vec<(String, f64)> = match shape {
        MetricShape::Flat(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        MetricShape::Pairs(pairs) => pairs.into_iter().map(|(x, v)| (x.to_string(), v)).collect(),
        MetricShape::MultiSeries { .. } => {
            return Err(ChartError::InvalidDataShape(
                "multi-series data cannot be drawn as a pie".to_string(),
            ));
        }
    };

    let mut slices: Vec<PieSlice> = entries
        .into_iter()
        .filter(|(_, value)| value.is_finite() && *value > 0.0)
        .map(|(name, value)| PieSlice {
            name,
            value,
            unit: unit.clone(),
        })
        .collect();

    if slices.is_empty() {
        return Err(ChartError::EmptyDataset);
    }

    slices.sort_by(|a, b| b.value.total_cmp(&a.value));
    slices.truncate(PIE_MAX_SLICES);

    Ok(ChartData::Pie(slices))
}

fn multi_line(shape: MetricShape) -> Result<ChartData, ChartError> {
    let MetricShape::MultiSeries { categories, series } = shape else {
        return Err(ChartError::InvalidDataShape(
            "multiline charts need categories and series".to_string(),
        ));
    };

    if categories.is_empty() || series.is_empty() {
        return Err(ChartError::EmptyDataset);
    }

    if let Some(bad) = series.iter().find(|s| s.values.len() != categories.len()) {
        return Err(ChartError::MismatchedSeriesLength {
            series: bad.name.clone(),
            expected: categories.len(),
            actual: bad.values.len(),
        });
    }

    let rows = categories
        .into_iter()
        .enumerate()
        .map(|(i, category)| MultiLineRow {
            category,
            values: series.iter().map(|s| s.values[i]).collect(),
            original_index: i,
        })
        .collect();

    let series_names = series.into_iter().map(|s: SeriesValues| s.name).collect();

    Ok(ChartData::MultiLine { series_names, rows })
}
