//! Value domains, index windows and tick density.

use std::ops::RangeInclusive;

use super::normalize::ChartData;

/// Padding added on both sides of a domain, as a share of its span.
pub const DOMAIN_PADDING: f64 = 0.1;

/// Upper bound on ticks along either axis.
pub const MAX_TICKS: usize = 10;

/// Lower bound on ticks once a chart is zoomed.
pub const MIN_ZOOMED_TICKS: usize = 2;

/// A closed value interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// A domain that collapsed to a single value. Drawable, not an error.
    pub fn is_degenerate(&self) -> bool {
        self.span() <= 0.0
    }

    /// Position of `value` in the domain, 0 at `min` and 1 at `max`.
    /// Every value sits in the middle of a degenerate domain.
    pub fn fraction(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.5
        } else {
            (value - self.min) / self.span()
        }
    }

    /// Inverse of [`Domain::fraction`].
    pub fn value_at(&self, fraction: f64) -> f64 {
        self.min + fraction * self.span()
    }

    /// `count` evenly spaced values from `min` to `max`.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        if self.is_degenerate() || count == 1 {
            return vec![self.min];
        }
        let step = self.span() / (count - 1) as f64;
        (0..count).map(|i| self.min + step * i as f64).collect()
    }
}

/// Padded domain of the finite values in `values`, or `None` when there are none.
pub fn calculate_domain(values: impl IntoIterator<Item = f64>) -> Option<Domain> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((min, max)) => Some((min.min(v), max.max(v))),
            None => Some((v, v)),
        })?;

    let padding = (max - min) * DOMAIN_PADDING;
    Some(Domain::new(min - padding, max + padding))
}

/// Inclusive range of visible `original_index` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexWindow {
    pub start: usize,
    pub end: usize,
}

impl IndexWindow {
    /// Window covering `len` points.
    pub fn full(len: usize) -> Self {
        Self {
            start: 0,
            end: len.saturating_sub(1),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn visible_count(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }
}

/// Number of axis ticks for `data_len` points. `visible` is the number of
/// points in the zoom window, or `None` when the chart is not zoomed.
pub fn tick_count(data_len: usize, visible: Option<usize>) -> usize {
    match visible {
        None => data_len.min(MAX_TICKS),
        Some(visible) => (visible / 3).clamp(MIN_ZOOMED_TICKS, MAX_TICKS),
    }
}

/// Padded y domain over the points inside `window`. Multiline data uses
/// the union of every series.
pub fn y_domain(data: &ChartData, window: IndexWindow) -> Option<Domain> {
    match data {
        ChartData::Cartesian(points) => calculate_domain(
            points
                .iter()
                .filter(|p| window.contains(p.original_index))
                .map(|p| p.y),
        ),
        ChartData::MultiLine { rows, .. } => calculate_domain(
            rows.iter()
                .filter(|r| window.contains(r.original_index))
                .flat_map(|r| r.values.iter().copied()),
        ),
        ChartData::Pie(slices) => calculate_domain(slices.iter().map(|s| s.value)),
    }
}
