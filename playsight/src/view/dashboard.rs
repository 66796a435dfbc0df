use iced::widget::{Column, Row, button, column, container, row, rule, scrollable, text};
use iced::{Alignment, Element, Length, Theme};

use playsight_common::{DateRange, MetricType, MetricsResponse, current_timestamp_millis};

use crate::chart::canvas::chart_view;
use crate::chart::{ChartEvent, ChartInstance, normalize_all};
use crate::message::Message;
use crate::view::formatting::format_timestamp;

/// Charts per dashboard row.
const CHARTS_PER_ROW: usize = 2;

/// State for the dashboard view.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Active date-range filter.
    pub range: DateRange,
    /// One instance per chartable metric, in response order.
    pub charts: Vec<ChartInstance>,
    /// Whether a load is in flight.
    pub loading: bool,
    /// Error from the last load, if it failed.
    pub last_error: Option<String>,
    /// Metrics in the last response that could not be charted.
    pub skipped: usize,
    /// When the last successful load finished (epoch ms).
    pub last_updated: Option<i64>,
    /// Where metrics come from, for the header.
    pub source_label: String,
}

impl DashboardState {
    pub fn new(range: DateRange, source_label: impl Into<String>) -> Self {
        Self {
            range,
            source_label: source_label.into(),
            ..Self::default()
        }
    }

    /// Mark a load as started.
    pub fn start_loading(&mut self) {
        self.loading = true;
        self.last_error = None;
    }

    /// Replace the charts with those of a fresh response. Zoom state of
    /// the previous charts is dropped with them.
    pub fn apply_response(&mut self, response: &MetricsResponse) {
        self.charts = normalize_all(&response.metrics)
            .into_iter()
            .map(ChartInstance::new)
            .collect();
        self.skipped = response.metrics.len() - self.charts.len();
        self.loading = false;
        self.last_error = None;
        self.last_updated = Some(current_timestamp_millis());
    }

    /// Record a failed load. Charts already on screen stay.
    pub fn apply_error(&mut self, error: String) {
        self.loading = false;
        self.last_error = Some(error);
    }

    pub fn chart_mut(&mut self, id: &str) -> Option<&mut ChartInstance> {
        self.charts.iter_mut().find(|c| c.id() == id)
    }
}

/// Render the dashboard view.
pub fn dashboard_view(state: &DashboardState) -> Element<'_, Message> {
    let header = render_header(state);
    let filters = render_range_filters(state);
    let charts = render_chart_grid(state);

    let content = column![header, filters, rule::horizontal(1), charts]
        .spacing(10)
        .padding(20);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render the header with load status.
fn render_header(state: &DashboardState) -> Element<'_, Message> {
    let title = text("PlaySight Analytics").size(24);

    let chart_count = text(format!("{} charts", state.charts.len())).size(14);

    let status = if state.loading {
        text("Loading metrics...").size(14)
    } else if let Some(updated) = state.last_updated {
        text(format!("Updated {}", format_timestamp(updated))).size(14)
    } else {
        text("")
    };

    let refresh_button = button(text("Refresh").size(14))
        .on_press_maybe((!state.loading).then_some(Message::Refresh))
        .style(iced::widget::button::secondary);

    let settings_button = button(text("Settings").size(14))
        .on_press(Message::OpenSettings)
        .style(iced::widget::button::secondary);

    let header_row = row![title, chart_count, status, refresh_button, settings_button]
        .spacing(20)
        .align_y(Alignment::Center);

    let mut header_col = Column::new().push(header_row);

    if !state.source_label.is_empty() {
        header_col = header_col.push(
            text(format!("Source: {}", state.source_label))
                .size(11)
                .style(|_theme: &Theme| text::Style {
                    color: Some(iced::Color::from_rgb(0.5, 0.5, 0.5)),
                }),
        );
    }

    if let Some(ref error) = state.last_error {
        let error_text = text(format!("Error: {}", error))
            .size(12)
            .style(|_theme: &Theme| text::Style {
                color: Some(iced::Color::from_rgb(0.8, 0.2, 0.2)),
            });
        header_col = header_col.push(error_text);
    }

    if state.skipped > 0 {
        let skipped_text = text(format!(
            "{} metric{} could not be charted",
            state.skipped,
            if state.skipped == 1 { "" } else { "s" }
        ))
        .size(12)
        .style(|_theme: &Theme| text::Style {
            color: Some(iced::Color::from_rgb(1.0, 0.7, 0.0)),
        });
        header_col = header_col.push(skipped_text);
    }

    header_col.spacing(5).into()
}

/// Render date-range buttons.
fn render_range_filters(state: &DashboardState) -> Element<'_, Message> {
    let mut filter_row = row![text("Date range:").size(14)]
        .spacing(10)
        .align_y(Alignment::Center);

    for &range in DateRange::ALL {
        let btn = button(text(range.label()).size(12)).on_press(Message::SetDateRange(range));
        let btn = if range == state.range {
            btn.style(iced::widget::button::primary)
        } else {
            btn.style(iced::widget::button::secondary)
        };
        filter_row = filter_row.push(btn);
    }

    filter_row.into()
}

/// Render the chart grid.
fn render_chart_grid(state: &DashboardState) -> Element<'_, Message> {
    if state.charts.is_empty() {
        let message = if state.loading {
            "Loading metrics..."
        } else {
            "No metrics for this date range"
        };
        return container(text(message).size(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    let mut grid = Column::new().spacing(16);
    for chunk in state.charts.chunks(CHARTS_PER_ROW) {
        let mut chart_row = Row::new().spacing(16);
        for chart in chunk {
            chart_row = chart_row.push(render_chart_card(chart));
        }
        grid = grid.push(chart_row);
    }

    scrollable(grid)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render one chart with its title and zoom controls.
fn render_chart_card(chart: &ChartInstance) -> Element<'_, Message> {
    let id = chart.id().to_string();
    let title = text(&chart.chart().title).size(16);
    let kind = text(chart.chart().kind.as_str())
        .size(11)
        .style(|_theme: &Theme| text::Style {
            color: Some(iced::Color::from_rgb(0.5, 0.5, 0.5)),
        });

    let mut header = row![title, kind].spacing(10).align_y(Alignment::Center);

    if chart.chart().kind != MetricType::Pie {
        let mode = chart.mode();
        let mode_button = button(text(format!("Mode: {}", mode.label())).size(12))
            .on_press(Message::Chart(
                id.clone(),
                ChartEvent::SetMode(mode.toggled()),
            ))
            .style(iced::widget::button::secondary);

        let reset_button = button(text("Reset zoom").size(12))
            .on_press_maybe(
                chart
                    .zoom()
                    .is_zoomed()
                    .then(|| Message::Chart(id.clone(), ChartEvent::Reset)),
            )
            .style(iced::widget::button::secondary);

        header = header.push(mode_button).push(reset_button);
    }

    let card = column![header, chart_view(chart)].spacing(8).padding(10);

    container(card)
        .width(Length::FillPortion(1))
        .style(container::rounded_box)
        .into()
}
