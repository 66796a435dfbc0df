//! One chart on the dashboard: its data, zoom state and geometry cache.

use iced::widget::canvas::Cache;

use super::ChartEvent;
use super::normalize::NormalizedChart;
use super::render::{self, ChartScene, Tooltip};
use super::zoom::{ZoomController, ZoomMode, ZoomOutcome};

/// A rendered chart instance. Zoom state lives and dies with it.
#[derive(Debug)]
pub struct ChartInstance {
    chart: NormalizedChart,
    zoom: ZoomController,
    cache: Cache,
}

impl ChartInstance {
    pub fn new(chart: NormalizedChart) -> Self {
        Self {
            chart,
            zoom: ZoomController::new(),
            cache: Cache::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.chart.id
    }

    pub fn chart(&self) -> &NormalizedChart {
        &self.chart
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn mode(&self) -> ZoomMode {
        self.zoom.mode()
    }

    pub(crate) fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Current scene, or `None` when the chart has nothing to draw.
    pub fn scene(&self) -> Option<ChartScene> {
        render::render(&self.chart, &self.zoom)
    }

    pub fn index_at(&self, x_fraction: f64) -> Option<usize> {
        render::index_at(&self.chart, &self.zoom, x_fraction)
    }

    pub fn tooltip(&self, x_fraction: f64) -> Option<Tooltip> {
        render::tooltip(&self.chart, &self.zoom, x_fraction)
    }

    pub fn pie_slice_at(&self, angle: f64) -> Option<usize> {
        render::pie_slice_at(&self.chart, angle)
    }

    pub fn pie_tooltip(&self, slice: usize) -> Option<Tooltip> {
        render::pie_tooltip(&self.chart, slice)
    }

    /// Apply an interaction. Cached geometry is dropped whenever the
    /// state changes.
    pub fn handle(&mut self, event: ChartEvent) -> ZoomOutcome {
        let outcome = match event {
            ChartEvent::MouseDown(index) => self.zoom.mouse_down(index),
            ChartEvent::MouseMove(index) => self.zoom.mouse_move(index),
            ChartEvent::MouseUp => self.zoom.mouse_up(&self.chart.data),
            ChartEvent::Wheel {
                delta_y,
                x_fraction,
            } => self.zoom.wheel(&self.chart.data, delta_y, x_fraction),
            ChartEvent::SetMode(mode) => {
                if self.zoom.set_mode(mode) {
                    ZoomOutcome::Committed
                } else {
                    ZoomOutcome::Ignored
                }
            }
            ChartEvent::Reset => {
                let before = *self.zoom.state();
                self.zoom.reset();
                if before == *self.zoom.state() {
                    ZoomOutcome::Ignored
                } else {
                    ZoomOutcome::Committed
                }
            }
        };

        if outcome.changed() {
            self.cache.clear();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::normalize::normalize;
    use playsight_common::{MetricRecord, MetricType};

    fn instance() -> ChartInstance {
        let values: Vec<f64> = (0..20).map(f64::from).collect();
        let record = MetricRecord::new("DAU")
            .with_id("dau")
            .with_type(MetricType::Line)
            .with_values(&values);
        ChartInstance::new(normalize(&record, 0).unwrap())
    }

    #[test]
    fn test_drag_flow() {
        let mut chart = instance();
        assert_eq!(chart.id(), "dau");

        assert_eq!(chart.handle(ChartEvent::MouseDown(3)), ZoomOutcome::Selecting);
        assert_eq!(chart.handle(ChartEvent::MouseMove(9)), ZoomOutcome::Selecting);
        assert_eq!(chart.handle(ChartEvent::MouseUp), ZoomOutcome::Committed);
        assert!(chart.zoom().is_zoomed());

        assert_eq!(chart.handle(ChartEvent::Reset), ZoomOutcome::Committed);
        assert!(!chart.zoom().is_zoomed());
        assert_eq!(chart.handle(ChartEvent::Reset), ZoomOutcome::Ignored);
    }

    #[test]
    fn test_mode_switch() {
        let mut chart = instance();
        assert_eq!(
            chart.handle(ChartEvent::SetMode(ZoomMode::Wheel)),
            ZoomOutcome::Committed
        );
        assert_eq!(
            chart.handle(ChartEvent::SetMode(ZoomMode::Wheel)),
            ZoomOutcome::Ignored
        );
        assert_eq!(chart.mode(), ZoomMode::Wheel);

        let outcome = chart.handle(ChartEvent::Wheel {
            delta_y: -1.0,
            x_fraction: 0.5,
        });
        assert_eq!(outcome, ZoomOutcome::Committed);
        assert!(chart.zoom().is_zoomed());
        assert_eq!(chart.handle(ChartEvent::MouseDown(2)), ZoomOutcome::Ignored);
    }

    #[test]
    fn test_scene_and_tooltip() {
        let chart = instance();
        assert!(chart.scene().is_some());
        assert_eq!(chart.index_at(0.0), Some(0));
        assert_eq!(chart.tooltip(0.0).map(|t| t.title), Some("0".to_string()));
        assert_eq!(chart.pie_slice_at(0.0), None);
    }
}
