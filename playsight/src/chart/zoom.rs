//! Per-chart zoom state machine.
//!
//! A chart is either unzoomed (every bound [`Bound::Auto`]) or zoomed to an
//! explicit index window with a y domain computed over that window. Drag
//! mode commits a window on mouse release. Wheel mode scales the window
//! around the cursor. The two modes never see each other's events.

use super::domain::{self, Domain, IndexWindow};
use super::normalize::ChartData;

/// Window growth per wheel notch when scrolling down.
pub const ZOOM_OUT_FACTOR: f64 = 1.1;

/// Window shrink per wheel notch when scrolling up.
pub const ZOOM_IN_FACTOR: f64 = 0.9;

/// Smallest visible index range a wheel zoom may produce.
pub const MIN_VISIBLE_RANGE: f64 = 2.0;

/// One edge of the visible area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Bound {
    /// Follow the data extent.
    #[default]
    Auto,
    Value(f64),
}

impl Bound {
    pub fn value(&self) -> Option<f64> {
        match self {
            Bound::Auto => None,
            Bound::Value(v) => Some(*v),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Bound::Auto)
    }
}

/// Visible area plus any drag selection in progress.
///
/// `left`/`right` are `original_index` bounds, `top`/`bottom` y values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoomState {
    pub left: Bound,
    pub right: Bound,
    pub top: Bound,
    pub bottom: Bound,
    pub ref_area_left: Option<usize>,
    pub ref_area_right: Option<usize>,
}

/// Interaction mode of a chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ZoomMode {
    /// Drag across the plot to select a window.
    #[default]
    Drag,
    /// Scroll to zoom around the cursor.
    Wheel,
}

impl ZoomMode {
    pub fn label(&self) -> &'static str {
        match self {
            ZoomMode::Drag => "Drag",
            ZoomMode::Wheel => "Wheel",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ZoomMode::Drag => ZoomMode::Wheel,
            ZoomMode::Wheel => ZoomMode::Drag,
        }
    }
}

/// What an interaction did to the zoom state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomOutcome {
    /// A new window was applied.
    Committed,
    /// A drag selection was started or extended.
    Selecting,
    /// A drag selection was dropped without zooming.
    Discarded,
    /// The event did not apply in the current mode or to this data.
    Ignored,
}

impl ZoomOutcome {
    /// Whether the chart needs to be redrawn.
    pub fn changed(&self) -> bool {
        !matches!(self, ZoomOutcome::Ignored)
    }
}

/// Zoom mode and state owned by one chart instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoomController {
    mode: ZoomMode,
    state: ZoomState,
}

impl ZoomController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ZoomMode {
        self.mode
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    /// Switch modes. Returns `true` when the mode changed. The zoom window
    /// is kept; a half-finished drag selection is dropped.
    pub fn set_mode(&mut self, mode: ZoomMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.clear_selection();
        true
    }

    pub fn is_zoomed(&self) -> bool {
        !(self.state.left.is_auto() && self.state.right.is_auto())
    }

    /// Start a drag selection at `index`.
    pub fn mouse_down(&mut self, index: usize) -> ZoomOutcome {
        if self.mode != ZoomMode::Drag {
            return ZoomOutcome::Ignored;
        }
        self.state.ref_area_left = Some(index);
        self.state.ref_area_right = None;
        ZoomOutcome::Selecting
    }

    /// Extend the drag selection to `index`.
    pub fn mouse_move(&mut self, index: usize) -> ZoomOutcome {
        if self.mode != ZoomMode::Drag || self.state.ref_area_left.is_none() {
            return ZoomOutcome::Ignored;
        }
        if self.state.ref_area_right == Some(index) {
            return ZoomOutcome::Ignored;
        }
        self.state.ref_area_right = Some(index);
        ZoomOutcome::Selecting
    }

    /// Finish the drag selection, zooming to it when it spans more than
    /// one point.
    pub fn mouse_up(&mut self, data: &ChartData) -> ZoomOutcome {
        if self.mode != ZoomMode::Drag {
            return ZoomOutcome::Ignored;
        }

        let selection = (self.state.ref_area_left, self.state.ref_area_right);
        if selection == (None, None) {
            return ZoomOutcome::Ignored;
        }
        self.clear_selection();

        let (Some(a), Some(b)) = selection else {
            return ZoomOutcome::Discarded;
        };
        if a == b || !data.is_zoomable() {
            return ZoomOutcome::Discarded;
        }

        let last = data.len() - 1;
        let window = IndexWindow {
            start: a.min(b).min(last),
            end: a.max(b).min(last),
        };
        if window.start == window.end {
            return ZoomOutcome::Discarded;
        }

        self.apply_window(window.start as f64, window.end as f64, data);
        tracing::debug!(start = window.start, end = window.end, "Drag zoom committed");
        ZoomOutcome::Committed
    }

    /// Zoom around the cursor. `delta_y > 0` widens the window,
    /// `delta_y < 0` narrows it. `x_fraction` is the cursor position across
    /// the plot, 0 at the left edge.
    pub fn wheel(&mut self, data: &ChartData, delta_y: f64, x_fraction: f64) -> ZoomOutcome {
        if self.mode != ZoomMode::Wheel
            || !data.is_zoomable()
            || data.len() < 2
            || delta_y == 0.0
            || !delta_y.is_finite()
        {
            return ZoomOutcome::Ignored;
        }

        let max_index = (data.len() - 1) as f64;
        let x_fraction = if x_fraction.is_finite() {
            x_fraction.clamp(0.0, 1.0)
        } else {
            0.5
        };

        let start = self.state.left.value().unwrap_or(0.0);
        let end = self.state.right.value().unwrap_or(max_index);
        let range = end - start;

        let factor = if delta_y > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };
        let new_range = (range * factor).max(MIN_VISIBLE_RANGE);

        if new_range >= max_index {
            let was_zoomed = self.is_zoomed();
            self.reset();
            return if was_zoomed {
                ZoomOutcome::Committed
            } else {
                ZoomOutcome::Ignored
            };
        }

        let mut new_start = start + x_fraction * range - x_fraction * new_range;
        let mut new_end = new_start + new_range;

        if new_start < 0.0 {
            new_end -= new_start;
            new_start = 0.0;
        }
        if new_end > max_index {
            new_start -= new_end - max_index;
            new_end = max_index;
        }

        self.apply_window(new_start, new_end, data);
        ZoomOutcome::Committed
    }

    /// Return to the full extent.
    pub fn reset(&mut self) {
        self.state = ZoomState::default();
    }

    /// In-progress drag selection as an ordered index pair.
    pub fn selection(&self) -> Option<(usize, usize)> {
        match (self.state.ref_area_left, self.state.ref_area_right) {
            (Some(a), Some(b)) => Some((a.min(b), a.max(b))),
            _ => None,
        }
    }

    /// Continuous x range currently shown, in index units.
    pub fn x_range(&self, len: usize) -> Domain {
        let max_index = len.saturating_sub(1) as f64;
        Domain::new(
            self.state.left.value().unwrap_or(0.0),
            self.state.right.value().unwrap_or(max_index),
        )
    }

    /// Whole indices inside the visible range.
    pub fn window(&self, len: usize) -> IndexWindow {
        let full = IndexWindow::full(len);
        if !self.is_zoomed() || len == 0 {
            return full;
        }

        let range = self.x_range(len);
        let start = (range.min.ceil().max(0.0) as usize).min(full.end);
        let end = (range.max.floor().max(0.0) as usize).clamp(start, full.end);
        IndexWindow { start, end }
    }

    /// The y domain to draw: the committed one when zoomed, otherwise the
    /// padded extent of the whole data.
    pub fn y_domain(&self, data: &ChartData) -> Option<Domain> {
        match (self.state.bottom.value(), self.state.top.value()) {
            (Some(bottom), Some(top)) => Some(Domain::new(bottom, top)),
            _ => domain::y_domain(data, IndexWindow::full(data.len())),
        }
    }

    /// Axis tick count for the current window.
    pub fn tick_count(&self, len: usize) -> usize {
        let visible = self.is_zoomed().then(|| self.window(len).visible_count());
        domain::tick_count(len, visible)
    }

    fn apply_window(&mut self, start: f64, end: f64, data: &ChartData) {
        self.state.left = Bound::Value(start);
        self.state.right = Bound::Value(end);

        let window = self.window(data.len());
        match domain::y_domain(data, window) {
            Some(y) => {
                self.state.bottom = Bound::Value(y.min);
                self.state.top = Bound::Value(y.max);
            }
            None => {
                self.state.bottom = Bound::Auto;
                self.state.top = Bound::Auto;
            }
        }
    }

    fn clear_selection(&mut self) {
        self.state.ref_area_left = None;
        self.state.ref_area_right = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::normalize::{CartesianPoint, PieSlice};
    use playsight_common::XValue;

    fn line(len: usize) -> ChartData {
        ChartData::Cartesian(
            (0..len)
                .map(|i| CartesianPoint {
                    label: XValue::Text(i.to_string()),
                    y: (i * i) as f64,
                    original_index: i,
                })
                .collect(),
        )
    }

    fn wheel_controller() -> ZoomController {
        let mut controller = ZoomController::new();
        controller.set_mode(ZoomMode::Wheel);
        controller
    }

    #[test]
    fn test_drag_commit() {
        let data = line(20);
        let mut zoom = ZoomController::new();

        assert_eq!(zoom.mouse_down(12), ZoomOutcome::Selecting);
        assert_eq!(zoom.mouse_move(4), ZoomOutcome::Selecting);
        assert_eq!(zoom.selection(), Some((4, 12)));
        assert_eq!(zoom.mouse_up(&data), ZoomOutcome::Committed);

        assert!(zoom.is_zoomed());
        assert_eq!(zoom.window(20), IndexWindow { start: 4, end: 12 });
        assert_eq!(zoom.selection(), None);

        let y = zoom.y_domain(&data).unwrap();
        let expected = domain::calculate_domain((4..=12).map(|i| (i * i) as f64));
        assert_eq!(Some(y), expected);
        assert_eq!(zoom.tick_count(20), 3);
    }

    #[test]
    fn test_drag_on_single_point_is_noop() {
        let data = line(20);
        let mut zoom = ZoomController::new();
        let before = zoom.clone();

        zoom.mouse_down(5);
        zoom.mouse_move(5);
        assert_eq!(zoom.mouse_up(&data), ZoomOutcome::Discarded);
        assert_eq!(zoom, before);

        zoom.mouse_down(5);
        assert_eq!(zoom.mouse_up(&data), ZoomOutcome::Discarded);
        assert_eq!(zoom, before);
    }

    #[test]
    fn test_drag_noop_keeps_prior_zoom() {
        let data = line(20);
        let mut zoom = ZoomController::new();
        zoom.mouse_down(2);
        zoom.mouse_move(10);
        zoom.mouse_up(&data);
        let zoomed = zoom.clone();

        zoom.mouse_down(7);
        zoom.mouse_move(7);
        assert_eq!(zoom.mouse_up(&data), ZoomOutcome::Discarded);
        assert_eq!(zoom, zoomed);
    }

    #[test]
    fn test_modes_ignore_each_other() {
        let data = line(20);

        let mut drag = ZoomController::new();
        assert_eq!(drag.wheel(&data, -1.0, 0.5), ZoomOutcome::Ignored);
        assert!(!drag.is_zoomed());

        let mut wheel = wheel_controller();
        assert_eq!(wheel.mouse_down(3), ZoomOutcome::Ignored);
        assert_eq!(wheel.mouse_move(9), ZoomOutcome::Ignored);
        assert_eq!(wheel.mouse_up(&data), ZoomOutcome::Ignored);
        assert_eq!(wheel.state(), &ZoomState::default());
    }

    #[test]
    fn test_wheel_zoom_in_keeps_focal_point() {
        let data = line(101);
        let mut zoom = wheel_controller();

        assert_eq!(zoom.wheel(&data, -1.0, 0.25), ZoomOutcome::Committed);
        let range = zoom.x_range(101);
        assert!((range.span() - 90.0).abs() < 1e-9);
        // The index under the cursor (25) stays at a quarter of the width.
        assert!((range.value_at(0.25) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_stays_in_bounds() {
        let data = line(30);
        let mut zoom = wheel_controller();

        for _ in 0..100 {
            zoom.wheel(&data, -3.0, 0.9);
            let range = zoom.x_range(30);
            assert!(range.min >= 0.0 && range.max <= 29.0);
            assert!(range.span() >= MIN_VISIBLE_RANGE - 1e-9);
        }
        assert!(zoom.window(30).visible_count() >= 2);

        for _ in 0..100 {
            zoom.wheel(&data, 3.0, 0.1);
            let range = zoom.x_range(30);
            assert!(range.min >= 0.0 && range.max <= 29.0);
        }
        assert!(!zoom.is_zoomed());
    }

    #[test]
    fn test_wheel_shifts_at_edges() {
        let data = line(11);

        // Window touching the right edge, widened around its left edge.
        let mut zoom = ZoomController::new();
        zoom.mouse_down(6);
        zoom.mouse_move(10);
        zoom.mouse_up(&data);
        zoom.set_mode(ZoomMode::Wheel);

        assert_eq!(zoom.wheel(&data, 1.0, 0.0), ZoomOutcome::Committed);
        let range = zoom.x_range(11);
        assert!((range.max - 10.0).abs() < 1e-9);
        assert!((range.min - 5.6).abs() < 1e-9);

        // Window touching the left edge, widened around its right edge.
        let mut zoom = ZoomController::new();
        zoom.mouse_down(0);
        zoom.mouse_move(4);
        zoom.mouse_up(&data);
        zoom.set_mode(ZoomMode::Wheel);

        zoom.wheel(&data, 1.0, 1.0);
        let range = zoom.x_range(11);
        assert!(range.min.abs() < 1e-9);
        assert!((range.max - 4.4).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_ignored_cases() {
        let mut zoom = wheel_controller();
        let empty = ChartData::Cartesian(Vec::new());
        assert_eq!(zoom.wheel(&empty, -1.0, 0.5), ZoomOutcome::Ignored);
        assert_eq!(zoom.wheel(&line(1), -1.0, 0.5), ZoomOutcome::Ignored);
        assert_eq!(zoom.wheel(&line(10), 0.0, 0.5), ZoomOutcome::Ignored);

        let pie = ChartData::Pie(
            [("a", 1.0), ("b", 2.0), ("c", 3.0)]
                .into_iter()
                .map(|(name, value)| PieSlice {
                    name: name.to_string(),
                    value,
                    unit: None,
                })
                .collect(),
        );
        assert_eq!(zoom.wheel(&pie, -1.0, 0.5), ZoomOutcome::Ignored);
        assert_eq!(zoom.state(), &ZoomState::default());
    }

    #[test]
    fn test_reset_restores_ticks_and_domain() {
        let data = line(40);
        let mut zoom = ZoomController::new();
        let ticks = zoom.tick_count(40);
        let y = zoom.y_domain(&data);

        zoom.mouse_down(10);
        zoom.mouse_move(16);
        zoom.mouse_up(&data);
        assert_ne!(zoom.tick_count(40), ticks);

        zoom.reset();
        assert_eq!(zoom.tick_count(40), ticks);
        assert_eq!(zoom.y_domain(&data), y);
        assert!(!zoom.is_zoomed());
    }

    #[test]
    fn test_mode_toggle_keeps_window() {
        let data = line(50);
        let mut zoom = ZoomController::new();
        zoom.mouse_down(5);
        zoom.mouse_move(25);
        zoom.mouse_up(&data);
        let window = zoom.window(50);

        assert!(zoom.set_mode(ZoomMode::Wheel));
        assert!(!zoom.set_mode(ZoomMode::Wheel));
        assert_eq!(zoom.window(50), window);
        assert!(zoom.set_mode(zoom.mode().toggled()));
        assert_eq!(zoom.mode(), ZoomMode::Drag);
        assert_eq!(zoom.window(50), window);
    }

    #[test]
    fn test_independent_controllers() {
        let data = line(20);
        let mut a = ZoomController::new();
        let b = ZoomController::new();
        a.mouse_down(1);
        a.mouse_move(8);
        a.mouse_up(&data);
        assert!(a.is_zoomed());
        assert!(!b.is_zoomed());
    }
}
