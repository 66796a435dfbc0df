//! PlaySight Iced application.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use iced::{Element, Task, Theme};

use playsight_common::{AnalyticsClient, PlaySightConfig, ResponseCache, save_config};

use crate::chart::ChartEvent;
use crate::message::Message;
use crate::source::MetricsSource;
use crate::view::dashboard::{DashboardState, dashboard_view};
use crate::view::settings::{SettingsState, settings_view};

/// Everything the application needs at startup.
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Effective configuration.
    pub config: PlaySightConfig,
    /// Where settings are saved, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Where metrics come from.
    pub source: MetricsSource,
    /// Response cache shared with the remote source.
    pub cache: Option<ResponseCache>,
}

impl AppOptions {
    /// Options that chart generated demo data with default settings.
    pub fn demo() -> Self {
        Self {
            config: PlaySightConfig::default(),
            config_path: None,
            source: MetricsSource::Demo,
            cache: None,
        }
    }
}

/// The main PlaySight application.
pub struct PlaySight {
    config: PlaySightConfig,
    config_path: Option<PathBuf>,
    source: MetricsSource,
    cache: Option<ResponseCache>,
    dashboard: DashboardState,
    /// Settings being edited, when the settings view is open.
    settings: Option<SettingsState>,
}

impl PlaySight {
    /// Boot the application and start the first load.
    pub fn boot(options: AppOptions) -> (Self, Task<Message>) {
        let range = options.config.analytics.default_range;
        let dashboard = DashboardState::new(range, options.source.describe());

        let mut app = Self {
            config: options.config,
            config_path: options.config_path,
            source: options.source,
            cache: options.cache,
            dashboard,
            settings: None,
        };

        let task = app.load();
        (app, task)
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        let count = self.dashboard.charts.len();
        if count > 0 {
            format!("PlaySight - {} charts ({})", count, self.dashboard.range.label())
        } else {
            "PlaySight".to_string()
        }
    }

    /// Dashboard state, for inspection.
    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    /// Whether the settings view is open.
    pub fn settings(&self) -> Option<&SettingsState> {
        self.settings.as_ref()
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::MetricsLoaded(range, _) if range != self.dashboard.range => {
                tracing::debug!(
                    range = %range,
                    current = %self.dashboard.range,
                    "Dropping metrics for a stale date range"
                );
            }

            Message::MetricsLoaded(_, Ok(response)) => {
                tracing::info!(
                    range = %self.dashboard.range,
                    metrics = response.metrics.len(),
                    "Metrics loaded"
                );
                self.dashboard.apply_response(&response);
                if self.dashboard.skipped > 0 {
                    tracing::warn!(
                        skipped = self.dashboard.skipped,
                        "Some metrics were not charted"
                    );
                }
            }

            Message::MetricsLoaded(_, Err(error)) => {
                tracing::warn!(error = %error, "Failed to load metrics");
                self.dashboard.apply_error(error);
            }

            Message::Refresh => {
                return self.load();
            }

            Message::SetDateRange(range) => {
                tracing::info!(range = %range, "Date range changed");
                self.dashboard.range = range;
                return self.load();
            }

            Message::Chart(id, event) => {
                return self.handle_chart_event(id, event);
            }

            Message::ZoomModeChanged(id) => {
                if let Some(chart) = self.dashboard.charts.iter().find(|c| c.id() == id) {
                    tracing::info!(chart = %id, mode = chart.mode().label(), "Zoom mode changed");
                }
            }

            Message::OpenSettings => {
                self.settings = Some(SettingsState::from_config(
                    &self.config,
                    self.cache_dir_label(),
                ));
            }

            Message::CloseSettings => {
                self.settings = None;
            }

            Message::SetEndpoint(endpoint) => {
                if let Some(ref mut settings) = self.settings {
                    settings.set_endpoint(endpoint);
                }
            }

            Message::SetTimeout(timeout) => {
                if let Some(ref mut settings) = self.settings {
                    settings.set_timeout(timeout);
                }
            }

            Message::SetDefaultRange(range) => {
                if let Some(ref mut settings) = self.settings {
                    settings.set_default_range(range);
                }
            }

            Message::SaveSettings => {
                self.save_settings();
            }

            Message::ResetSettings => {
                let mut defaults =
                    SettingsState::from_config(&PlaySightConfig::default(), self.cache_dir_label());
                defaults.modified = true;
                self.settings = Some(defaults);
            }

            Message::ClearCache => {
                self.clear_cache();
            }
        }

        Task::none()
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        match &self.settings {
            Some(settings) => settings_view(settings),
            None => dashboard_view(&self.dashboard),
        }
    }

    /// Get the application theme.
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Start loading metrics for the current range.
    fn load(&mut self) -> Task<Message> {
        self.dashboard.start_loading();
        tracing::debug!(
            source = %self.source.describe(),
            range = %self.dashboard.range,
            "Loading metrics"
        );
        self.source.load(self.dashboard.range, today())
    }

    fn handle_chart_event(&mut self, id: String, event: ChartEvent) -> Task<Message> {
        let Some(chart) = self.dashboard.chart_mut(&id) else {
            tracing::debug!(chart = %id, "Event for unknown chart");
            return Task::none();
        };

        let mode_change = matches!(event, ChartEvent::SetMode(_));
        let outcome = chart.handle(event);
        tracing::trace!(chart = %id, outcome = ?outcome, "Chart event handled");

        if mode_change && outcome.changed() {
            return Task::done(Message::ZoomModeChanged(id));
        }
        Task::none()
    }

    fn save_settings(&mut self) {
        let Some(ref mut settings) = self.settings else {
            return;
        };

        let mut config = self.config.clone();
        if let Err(e) = settings.apply_to(&mut config) {
            settings.set_error(e);
            return;
        }

        if matches!(self.source, MetricsSource::Remote(_)) {
            match AnalyticsClient::new(&config.analytics, self.cache.clone()) {
                Ok(client) => {
                    self.source = MetricsSource::Remote(client);
                    self.dashboard.source_label = self.source.describe();
                }
                Err(e) => {
                    settings.set_error(format!("Failed to create client: {}", e));
                    return;
                }
            }
        }

        if let Some(ref path) = self.config_path {
            if let Err(e) = save_config(path, &config) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save settings");
                settings.set_error(e.to_string());
                return;
            }
            tracing::info!(path = %path.display(), "Settings saved");
            settings.mark_saved(format!("Settings saved to {}", path.display()));
        } else {
            settings.mark_saved("Settings applied for this session");
        }

        self.config = config;
    }

    fn clear_cache(&mut self) {
        let Some(ref cache) = self.cache else {
            return;
        };

        let result = cache.clear();
        let Some(ref mut settings) = self.settings else {
            return;
        };

        match result {
            Ok(removed) => {
                tracing::info!(removed, "Cleared response cache");
                settings.set_success(format!("Removed {} cached responses", removed));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear response cache");
                settings.set_error(e.to_string());
            }
        }
    }

    fn cache_dir_label(&self) -> Option<String> {
        self.cache
            .as_ref()
            .map(|cache| cache.dir().display().to_string())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
