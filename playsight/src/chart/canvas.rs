//! Chart widget using Iced canvas.
//!
//! Draws a [`ChartScene`] and turns mouse input into [`ChartEvent`]s. The
//! widget only exists while its chart is part of the view, so no listener
//! outlives the chart it reports for.

use std::f64::consts::TAU;

use iced::mouse;
use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use super::ChartEvent;
use super::instance::ChartInstance;
use super::normalize::ChartData;
use super::render::{ChartScene, Mark, Rgb, Tooltip};
use super::zoom::ZoomMode;
use crate::message::Message;

/// Height of a chart canvas.
pub const CHART_HEIGHT: f32 = 280.0;

const PAD_LEFT: f32 = 56.0;
const PAD_RIGHT: f32 = 16.0;
const PAD_TOP: f32 = 28.0;
const PAD_BOTTOM: f32 = 44.0;

/// Pixels per wheel "line" when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 50.0;

const BACKGROUND: Color = Color::from_rgb(0.1, 0.1, 0.12);
const PLOT_BACKGROUND: Color = Color::from_rgb(0.08, 0.08, 0.1);
const GRID: Color = Color::from_rgb(0.2, 0.2, 0.25);
const LABEL: Color = Color::from_rgb(0.5, 0.5, 0.5);

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::from_rgb8(rgb.r, rgb.g, rgb.b)
    }
}

/// Create a chart element.
pub fn chart_view(instance: &ChartInstance) -> Element<'_, Message> {
    Canvas::new(ChartCanvas { instance })
        .width(Length::Fill)
        .height(Length::Fixed(CHART_HEIGHT))
        .into()
}

/// Canvas program for one chart instance.
struct ChartCanvas<'a> {
    instance: &'a ChartInstance,
}

/// Inner plotting rectangle of a canvas of the given size.
fn plot_area(size: Size) -> Rectangle {
    Rectangle {
        x: PAD_LEFT,
        y: PAD_TOP,
        width: (size.width - PAD_LEFT - PAD_RIGHT).max(1.0),
        height: (size.height - PAD_TOP - PAD_BOTTOM).max(1.0),
    }
}

/// Center and radius of the pie inside a plot.
fn pie_geometry(plot: Rectangle) -> (Point, f32) {
    let center = Point::new(plot.x + plot.width / 2.0, plot.y + plot.height / 2.0);
    let radius = (plot.width.min(plot.height) / 2.0 - 8.0).max(4.0);
    (center, radius)
}

fn to_pixels(plot: Rectangle, x: f64, y: f64) -> Point {
    Point::new(
        plot.x + x as f32 * plot.width,
        plot.y + y as f32 * plot.height,
    )
}

impl<'a> canvas::Program<Message> for ChartCanvas<'a> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            canvas::Event::Mouse(mouse_event) => self.handle_mouse(mouse_event, bounds, cursor),
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let size = bounds.size();
        let chart = self.instance.cache().draw(renderer, size, |frame| {
            draw_background(frame, size);
            match self.instance.scene() {
                Some(scene) => draw_scene(frame, &scene, size),
                None => draw_no_data(frame, size),
            }
        });

        let mut layers = vec![chart];

        if let Some(position) = cursor.position_in(bounds)
            && let Some(tooltip) = self.hover_tooltip(position, size)
        {
            let mut frame = Frame::new(renderer, size);
            draw_tooltip(&mut frame, &tooltip, position, size);
            layers.push(frame.into_geometry());
        }

        layers
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        let zoomable = self.instance.chart().data.is_zoomable();
        match cursor.position_in(bounds) {
            Some(position) if zoomable && plot_area(bounds.size()).contains(position) => {
                match self.instance.mode() {
                    ZoomMode::Drag => mouse::Interaction::Crosshair,
                    ZoomMode::Wheel => mouse::Interaction::Pointer,
                }
            }
            _ => mouse::Interaction::default(),
        }
    }
}

impl<'a> ChartCanvas<'a> {
    fn publish(&self, event: ChartEvent) -> canvas::Action<Message> {
        canvas::Action::publish(Message::Chart(self.instance.id().to_string(), event))
    }

    fn selecting(&self) -> bool {
        self.instance.mode() == ZoomMode::Drag
            && self.instance.zoom().state().ref_area_left.is_some()
    }

    /// Handle mouse events.
    fn handle_mouse(
        &self,
        event: &mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let plot = plot_area(bounds.size());
        let x_fraction = cursor
            .position_in(bounds)
            .map(|p| ((p.x - plot.x) / plot.width) as f64);

        match event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                if self.instance.mode() != ZoomMode::Drag {
                    return None;
                }
                let index = self.instance.index_at(x_fraction?)?;
                Some(self.publish(ChartEvent::MouseDown(index)).and_capture())
            }
            mouse::Event::CursorMoved { .. } => {
                if self.selecting()
                    && let Some(index) = x_fraction
                        .and_then(|f| self.instance.index_at(f.clamp(0.0, 1.0)))
                {
                    let state = self.instance.zoom().state();
                    if state.ref_area_right != Some(index) {
                        return Some(self.publish(ChartEvent::MouseMove(index)));
                    }
                }
                // Keep the tooltip under the cursor.
                cursor
                    .is_over(bounds)
                    .then(canvas::Action::request_redraw)
            }
            mouse::Event::CursorLeft => Some(canvas::Action::request_redraw()),
            mouse::Event::ButtonReleased(mouse::Button::Left) => self
                .selecting()
                .then(|| self.publish(ChartEvent::MouseUp)),
            mouse::Event::WheelScrolled { delta } => {
                if self.instance.mode() != ZoomMode::Wheel
                    || !self.instance.chart().data.is_zoomable()
                {
                    return None;
                }
                let x_fraction = x_fraction.filter(|f| (0.0..=1.0).contains(f))?;
                let lines = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => *y / PIXELS_PER_LINE,
                };
                if lines == 0.0 {
                    return None;
                }
                // Scrolling up (positive) zooms in.
                Some(
                    self.publish(ChartEvent::Wheel {
                        delta_y: -f64::from(lines),
                        x_fraction,
                    })
                    .and_capture(),
                )
            }
            _ => None,
        }
    }

    fn hover_tooltip(&self, position: Point, size: Size) -> Option<Tooltip> {
        let plot = plot_area(size);

        if matches!(self.instance.chart().data, ChartData::Pie(_)) {
            let (center, radius) = pie_geometry(plot);
            let dx = position.x - center.x;
            let dy = position.y - center.y;
            if dx.hypot(dy) > radius {
                return None;
            }
            let slice = self.instance.pie_slice_at(f64::from(dy.atan2(dx)))?;
            return self.instance.pie_tooltip(slice);
        }

        if !plot.contains(position) || self.selecting() {
            return None;
        }
        self.instance
            .tooltip(((position.x - plot.x) / plot.width) as f64)
    }
}

fn draw_background(frame: &mut Frame, size: Size) {
    frame.fill(&Path::rectangle(Point::ORIGIN, size), BACKGROUND);
}

fn draw_no_data(frame: &mut Frame, size: Size) {
    frame.fill_text(Text {
        content: "No data".to_string(),
        position: Point::new(size.width / 2.0, size.height / 2.0),
        color: LABEL,
        size: 16.0.into(),
        align_x: iced::alignment::Horizontal::Center.into(),
        align_y: iced::alignment::Vertical::Center.into(),
        ..Text::default()
    });
}

/// Draw a scene onto the frame.
fn draw_scene(frame: &mut Frame, scene: &ChartScene, size: Size) {
    let plot = plot_area(size);

    if scene.controls.is_none() {
        draw_pie(frame, scene, plot);
        return;
    }

    frame.fill(
        &Path::rectangle(Point::new(plot.x, plot.y), plot.size()),
        PLOT_BACKGROUND,
    );
    draw_grid(frame, scene, plot);

    for mark in &scene.marks {
        match mark {
            Mark::Polyline { color, points, .. } => {
                let color = Color::from(*color);
                if points.len() >= 2 {
                    let mut builder = canvas::path::Builder::new();
                    for (i, point) in points.iter().enumerate() {
                        let p = to_pixels(plot, point.x, point.y);
                        if i == 0 {
                            builder.move_to(p);
                        } else {
                            builder.line_to(p);
                        }
                    }
                    frame.stroke(
                        &builder.build(),
                        Stroke::default().with_color(color).with_width(2.0),
                    );
                }
                for point in points {
                    frame.fill(
                        &Path::circle(to_pixels(plot, point.x, point.y), 3.0),
                        color,
                    );
                }
            }
            Mark::Bar {
                x,
                width,
                top,
                bottom,
                color,
                ..
            } => {
                let top_left = to_pixels(plot, x - width / 2.0, *top);
                let height = ((bottom - top) as f32 * plot.height).max(1.0);
                frame.fill(
                    &Path::rectangle(
                        top_left,
                        Size::new((*width as f32 * plot.width).max(1.0), height),
                    ),
                    Color::from(*color),
                );
            }
            Mark::Wedge { .. } => {}
        }
    }

    if let Some(selection) = scene.selection {
        let left = to_pixels(plot, selection.start, 0.0);
        let width = ((selection.end - selection.start) as f32 * plot.width).max(1.0);
        frame.fill(
            &Path::rectangle(left, Size::new(width, plot.height)),
            Color::from_rgba(0.6, 0.6, 0.9, 0.25),
        );
    }

    draw_legend(frame, scene, plot);
}

/// Draw grid lines, tick labels and axis titles.
fn draw_grid(frame: &mut Frame, scene: &ChartScene, plot: Rectangle) {
    let grid = Stroke::default().with_color(GRID).with_width(1.0);

    for tick in &scene.y_ticks {
        let y = plot.y + tick.position as f32 * plot.height;
        frame.stroke(
            &Path::line(Point::new(plot.x, y), Point::new(plot.x + plot.width, y)),
            grid,
        );
        frame.fill_text(Text {
            content: tick.label.clone(),
            position: Point::new(plot.x - 6.0, y),
            color: LABEL,
            size: 10.0.into(),
            align_x: iced::alignment::Horizontal::Right.into(),
            align_y: iced::alignment::Vertical::Center.into(),
            ..Text::default()
        });
    }

    for tick in &scene.x_ticks {
        let x = plot.x + tick.position as f32 * plot.width;
        frame.stroke(
            &Path::line(Point::new(x, plot.y), Point::new(x, plot.y + plot.height)),
            grid,
        );
        frame.fill_text(Text {
            content: tick.label.clone(),
            position: Point::new(x, plot.y + plot.height + 6.0),
            color: LABEL,
            size: 10.0.into(),
            align_x: iced::alignment::Horizontal::Center.into(),
            ..Text::default()
        });
    }

    frame.fill_text(Text {
        content: scene.x_title.clone(),
        position: Point::new(plot.x + plot.width / 2.0, plot.y + plot.height + 24.0),
        color: Color::from_rgb(0.7, 0.7, 0.7),
        size: 11.0.into(),
        align_x: iced::alignment::Horizontal::Center.into(),
        ..Text::default()
    });
    frame.fill_text(Text {
        content: scene.y_title.clone(),
        position: Point::new(4.0, 8.0),
        color: Color::from_rgb(0.7, 0.7, 0.7),
        size: 11.0.into(),
        ..Text::default()
    });
}

fn draw_legend(frame: &mut Frame, scene: &ChartScene, plot: Rectangle) {
    let mut x = plot.x + plot.width;
    for entry in scene.legend.iter().rev() {
        let label_width = entry.name.chars().count() as f32 * 6.5;
        x -= label_width + 22.0;
        frame.fill(
            &Path::rectangle(Point::new(x, 10.0), Size::new(10.0, 10.0)),
            Color::from(entry.color),
        );
        frame.fill_text(Text {
            content: entry.name.clone(),
            position: Point::new(x + 14.0, 15.0),
            color: Color::from_rgb(0.8, 0.8, 0.8),
            size: 11.0.into(),
            align_y: iced::alignment::Vertical::Center.into(),
            ..Text::default()
        });
    }
}

fn draw_pie(frame: &mut Frame, scene: &ChartScene, plot: Rectangle) {
    let (center, radius) = pie_geometry(plot);
    let edge = Stroke::default().with_color(BACKGROUND).with_width(1.5);

    for mark in &scene.marks {
        let Mark::Wedge {
            start_angle,
            end_angle,
            color,
            label,
            ..
        } = mark
        else {
            continue;
        };

        let sweep = end_angle - start_angle;
        let steps = ((sweep / TAU) * 96.0).ceil().max(2.0) as usize;
        let arc_point = |angle: f64| {
            Point::new(
                center.x + radius * angle.cos() as f32,
                center.y + radius * angle.sin() as f32,
            )
        };

        let mut builder = canvas::path::Builder::new();
        builder.move_to(center);
        for step in 0..=steps {
            builder.line_to(arc_point(start_angle + sweep * step as f64 / steps as f64));
        }
        builder.close();
        let wedge = builder.build();

        frame.fill(&wedge, Color::from(*color));
        frame.stroke(&wedge, edge);

        // Labels only fit on wedges of a reasonable size.
        if sweep > 0.35 {
            let middle = start_angle + sweep / 2.0;
            frame.fill_text(Text {
                content: label.clone(),
                position: Point::new(
                    center.x + radius * 0.65 * middle.cos() as f32,
                    center.y + radius * 0.65 * middle.sin() as f32,
                ),
                color: Color::from_rgb(0.05, 0.05, 0.08),
                size: 11.0.into(),
                align_x: iced::alignment::Horizontal::Center.into(),
                align_y: iced::alignment::Vertical::Center.into(),
                ..Text::default()
            });
        }
    }
}

fn draw_tooltip(frame: &mut Frame, tooltip: &Tooltip, cursor: Point, size: Size) {
    let line_height = 15.0;
    let longest = std::iter::once(&tooltip.title)
        .chain(&tooltip.lines)
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let width = longest as f32 * 6.5 + 16.0;
    let height = (tooltip.lines.len() + 1) as f32 * line_height + 10.0;

    let mut origin = Point::new(cursor.x + 12.0, cursor.y + 12.0);
    if origin.x + width > size.width {
        origin.x = (cursor.x - 12.0 - width).max(0.0);
    }
    if origin.y + height > size.height {
        origin.y = (cursor.y - 12.0 - height).max(0.0);
    }

    let panel = Path::rectangle(origin, Size::new(width, height));
    frame.fill(&panel, Color::from_rgba(0.05, 0.05, 0.07, 0.92));
    frame.stroke(
        &panel,
        Stroke::default().with_color(GRID).with_width(1.0),
    );

    for (i, line) in std::iter::once(&tooltip.title)
        .chain(&tooltip.lines)
        .enumerate()
    {
        frame.fill_text(Text {
            content: line.clone(),
            position: Point::new(origin.x + 8.0, origin.y + 5.0 + i as f32 * line_height),
            color: if i == 0 {
                Color::WHITE
            } else {
                Color::from_rgb(0.75, 0.75, 0.75)
            },
            size: 11.0.into(),
            ..Text::default()
        });
    }
}
