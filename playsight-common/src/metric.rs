use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::Result;

/// Payload returned by the analytics metrics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    /// One record per chart, in display order.
    #[serde(default)]
    pub metrics: Vec<MetricRecord>,
}

impl MetricsResponse {
    /// Create a response from a list of records.
    pub fn new(metrics: Vec<MetricRecord>) -> Self {
        Self { metrics }
    }

    /// Decode a JSON payload.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// A single metric as it arrives on the wire.
///
/// The data fields are kept as raw JSON so that one malformed record never
/// fails decoding of the whole response. Call [`MetricRecord::shape`] to
/// resolve them into a typed [`MetricShape`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Stable identifier, generated from the record position when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_id: Option<String>,

    /// Declared chart type ("line", "bar", "hist", "pie", "multiline").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,

    /// Chart title.
    #[serde(default)]
    pub name: String,

    /// Flat numbers or `[x, y]` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,

    /// Shared x-axis labels of a multi-series metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,

    /// Named series of a multi-series metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_unit: Option<String>,
}

impl MetricRecord {
    /// Create an empty record with a title.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the declared chart type.
    pub fn with_type(mut self, metric_type: MetricType) -> Self {
        self.metric_type = Some(metric_type.as_str().to_string());
        self
    }

    /// Set the metric identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.metric_id = Some(id.into());
        self
    }

    /// Set flat numeric values (the index is the implied x).
    pub fn with_values(mut self, values: &[f64]) -> Self {
        self.values = Some(Value::Array(values.iter().map(|v| Value::from(*v)).collect()));
        self
    }

    /// Set explicit `(x, y)` pairs.
    pub fn with_pairs<X: Into<XValue>>(
        mut self,
        pairs: impl IntoIterator<Item = (X, f64)>,
    ) -> Self {
        let items = pairs
            .into_iter()
            .map(|(x, y)| Value::Array(vec![x.into().to_json(), Value::from(y)]))
            .collect();
        self.values = Some(Value::Array(items));
        self
    }

    /// Set multi-series data against shared categories.
    pub fn with_series(mut self, categories: &[&str], series: Vec<SeriesValues>) -> Self {
        self.categories = Some(Value::Array(
            categories.iter().map(|c| Value::from(*c)).collect(),
        ));
        self.series = Some(Value::Array(
            series
                .into_iter()
                .map(|s| {
                    let mut object = serde_json::Map::new();
                    object.insert("name".to_string(), Value::from(s.name));
                    object.insert(
                        "values".to_string(),
                        Value::Array(s.values.into_iter().map(Value::from).collect()),
                    );
                    Value::Object(object)
                })
                .collect(),
        ));
        self
    }

    /// Set axis titles.
    pub fn with_axis_labels(
        mut self,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    /// Set axis units.
    pub fn with_units(mut self, x_unit: impl Into<String>, y_unit: impl Into<String>) -> Self {
        self.x_unit = Some(x_unit.into());
        self.y_unit = Some(y_unit.into());
        self
    }

    /// Set the unit shown next to single values (pie slices, bars).
    pub fn with_value_unit(mut self, unit: impl Into<String>) -> Self {
        self.value_unit = Some(unit.into());
        self
    }

    /// The metric identifier, or one generated from the record position.
    pub fn resolved_id(&self, position: usize) -> String {
        match &self.metric_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("metric-{}", position),
        }
    }

    /// Parse the declared type, if any.
    pub fn declared_type(&self) -> Option<std::result::Result<MetricType, UnknownMetricType>> {
        self.metric_type.as_deref().map(MetricType::from_str)
    }

    /// Resolve the raw data fields into a typed shape.
    pub fn shape(&self) -> std::result::Result<MetricShape, ShapeError> {
        if self.categories.is_some() || self.series.is_some() {
            return parse_multi_series(self.categories.as_ref(), self.series.as_ref());
        }

        match &self.values {
            Some(values) => parse_values(values),
            None => Err(ShapeError::InvalidDataShape(
                "record has neither values nor categories/series".to_string(),
            )),
        }
    }
}

/// An x coordinate as supplied by the source: a label or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Text(String),
}

impl XValue {
    fn to_json(&self) -> Value {
        match self {
            XValue::Number(n) => Value::from(*n),
            XValue::Text(s) => Value::from(s.as_str()),
        }
    }

    /// Text content, if this is a label.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XValue::Text(s) => Some(s),
            XValue::Number(_) => None,
        }
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            XValue::Number(n) => write!(f, "{}", n),
            XValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for XValue {
    fn from(v: &str) -> Self {
        XValue::Text(v.to_string())
    }
}

impl From<String> for XValue {
    fn from(v: String) -> Self {
        XValue::Text(v)
    }
}

impl From<f64> for XValue {
    fn from(v: f64) -> Self {
        XValue::Number(v)
    }
}

impl From<i64> for XValue {
    fn from(v: i64) -> Self {
        XValue::Number(v as f64)
    }
}

/// One named series of a multi-series metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesValues {
    pub name: String,
    pub values: Vec<f64>,
}

impl SeriesValues {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Metric data resolved into one of the recognized layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricShape {
    /// Plain y values; the position is the x.
    Flat(Vec<f64>),
    /// Explicit `(x, y)` pairs.
    Pairs(Vec<(XValue, f64)>),
    /// Several named series sharing category labels.
    MultiSeries {
        categories: Vec<String>,
        series: Vec<SeriesValues>,
    },
}

impl MetricShape {
    /// Whether every x is a label that parses as a date.
    pub fn has_date_pairs(&self) -> bool {
        match self {
            MetricShape::Pairs(pairs) => {
                !pairs.is_empty()
                    && pairs.iter().all(|(x, _)| {
                        x.as_text()
                            .is_some_and(|s| crate::dates::parse_date(s).is_some())
                    })
            }
            _ => false,
        }
    }
}

/// Failure to resolve a record into a [`MetricShape`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("invalid data shape: {0}")]
    InvalidDataShape(String),

    #[error("dataset is empty")]
    EmptyDataset,
}

/// Chart type declared by a metric record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    Line,
    Bar,
    Hist,
    Pie,
    MultiLine,
}

impl MetricType {
    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Line => "line",
            MetricType::Bar => "bar",
            MetricType::Hist => "hist",
            MetricType::Pie => "pie",
            MetricType::MultiLine => "multiline",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared chart type that is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported chart type '{0}'")]
pub struct UnknownMetricType(pub String);

impl FromStr for MetricType {
    type Err = UnknownMetricType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(MetricType::Line),
            "bar" => Ok(MetricType::Bar),
            "hist" | "histogram" => Ok(MetricType::Hist),
            "pie" => Ok(MetricType::Pie),
            "multiline" | "multi_line" | "multi-line" => Ok(MetricType::MultiLine),
            _ => Err(UnknownMetricType(s.to_string())),
        }
    }
}

fn parse_values(values: &Value) -> std::result::Result<MetricShape, ShapeError> {
    let Value::Array(items) = values else {
        return Err(ShapeError::InvalidDataShape("values is not an array".to_string()));
    };

    if items.is_empty() {
        return Err(ShapeError::EmptyDataset);
    }

    if items.iter().all(Value::is_number) {
        return Ok(MetricShape::Flat(items.iter().filter_map(Value::as_f64).collect()));
    }

    let mut pairs = Vec::with_capacity(items.len());
    for item in items {
        let pair = match item.as_array() {
            Some(pair) if pair.len() == 2 => pair,
            _ => {
                return Err(ShapeError::InvalidDataShape(
                    "expected numbers or [x, y] pairs".to_string(),
                ));
            }
        };

        let x = match &pair[0] {
            Value::String(s) => Some(XValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(XValue::Number),
            _ => None,
        };

        match (x, pair[1].as_f64()) {
            (Some(x), Some(y)) => pairs.push((x, y)),
            _ => {
                return Err(ShapeError::InvalidDataShape(format!(
                    "pair {} is not [string|number, number]",
                    item
                )));
            }
        }
    }

    Ok(MetricShape::Pairs(pairs))
}

fn parse_multi_series(
    categories: Option<&Value>,
    series: Option<&Value>,
) -> std::result::Result<MetricShape, ShapeError> {
    let (Some(Value::Array(categories)), Some(Value::Array(series))) = (categories, series) else {
        return Err(ShapeError::InvalidDataShape(
            "categories and series must both be arrays".to_string(),
        ));
    };

    if categories.is_empty() || series.is_empty() {
        return Err(ShapeError::EmptyDataset);
    }

    let categories = categories
        .iter()
        .map(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ShapeError::InvalidDataShape("categories must be labels".to_string()))?;

    let series = series
        .iter()
        .map(|s| serde_json::from_value::<SeriesValues>(s.clone()).ok())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            ShapeError::InvalidDataShape("series must be {name, values} objects".to_string())
        })?;

    Ok(MetricShape::MultiSeries { categories, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> MetricRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flat_shape() {
        let r = record(json!({"name": "DAU", "values": [1, 2.5, 3]}));
        assert_eq!(r.shape(), Ok(MetricShape::Flat(vec![1.0, 2.5, 3.0])));
    }

    #[test]
    fn test_pair_shape() {
        let r = record(json!({"name": "Revenue", "values": [["2024-01-01", 10], [3, 4]]}));
        assert_eq!(
            r.shape(),
            Ok(MetricShape::Pairs(vec![
                (XValue::Text("2024-01-01".to_string()), 10.0),
                (XValue::Number(3.0), 4.0),
            ]))
        );
    }

    #[test]
    fn test_multi_series_shape() {
        let r = record(json!({
            "name": "Sessions",
            "categories": ["Jan", "Feb"],
            "series": [{"name": "A", "values": [1, 2]}]
        }));
        let MetricShape::MultiSeries { categories, series } = r.shape().unwrap() else {
            panic!("expected multi-series");
        };
        assert_eq!(categories, vec!["Jan", "Feb"]);
        assert_eq!(series[0].name, "A");
    }

    #[test]
    fn test_invalid_shapes() {
        let cases = [
            json!({"name": "x"}),
            json!({"name": "x", "values": "nope"}),
            json!({"name": "x", "values": [1, "two"]}),
            json!({"name": "x", "values": [[1, 2, 3]]}),
            json!({"name": "x", "values": [[1, "y"]]}),
            json!({"name": "x", "categories": ["a"]}),
            json!({"name": "x", "categories": ["a"], "series": [{"label": "A"}]}),
        ];

        for case in cases {
            let result = record(case.clone()).shape();
            assert!(
                matches!(result, Err(ShapeError::InvalidDataShape(_))),
                "{case} -> {result:?}"
            );
        }
    }

    #[test]
    fn test_empty_shapes() {
        assert_eq!(
            record(json!({"values": []})).shape(),
            Err(ShapeError::EmptyDataset)
        );
        assert_eq!(
            record(json!({"categories": [], "series": [{"name": "A", "values": []}]})).shape(),
            Err(ShapeError::EmptyDataset)
        );
    }

    #[test]
    fn test_metric_type_parsing() {
        assert_eq!("line".parse::<MetricType>(), Ok(MetricType::Line));
        assert_eq!("Multi-Line".parse::<MetricType>(), Ok(MetricType::MultiLine));
        assert_eq!("histogram".parse::<MetricType>(), Ok(MetricType::Hist));
        assert_eq!(
            "scatter".parse::<MetricType>(),
            Err(UnknownMetricType("scatter".to_string()))
        );
    }

    #[test]
    fn test_resolved_id() {
        assert_eq!(MetricRecord::new("a").resolved_id(3), "metric-3");
        assert_eq!(MetricRecord::new("a").with_id("dau").resolved_id(3), "dau");
    }

    #[test]
    fn test_date_pair_detection() {
        let dated = MetricRecord::new("a").with_pairs([("2024-01-01", 1.0), ("2024-01-02", 2.0)]);
        assert!(dated.shape().unwrap().has_date_pairs());

        let labelled = MetricRecord::new("a").with_pairs([("Mage", 1.0), ("Rogue", 2.0)]);
        assert!(!labelled.shape().unwrap().has_date_pairs());
    }

    #[test]
    fn test_builder_matches_wire_format() {
        let built = MetricRecord::new("Sessions")
            .with_type(MetricType::MultiLine)
            .with_series(&["Jan"], vec![SeriesValues::new("A", vec![1.0])]);
        let wire = record(json!({
            "type": "multiline",
            "name": "Sessions",
            "categories": ["Jan"],
            "series": [{"name": "A", "values": [1.0]}]
        }));
        assert_eq!(built, wire);
    }

    #[test]
    fn test_x_value_display() {
        assert_eq!(XValue::Number(3.0).to_string(), "3");
        assert_eq!(XValue::Number(2.5).to_string(), "2.5");
        assert_eq!(XValue::from("Jan").to_string(), "Jan");
    }
}
