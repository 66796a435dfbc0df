//! Settings view for application configuration.

use iced::widget::{
    Column, button, column, container, pick_list, row, rule, scrollable, text, text_input,
};
use iced::{Alignment, Element, Length, Theme};

use playsight_common::{DateRange, PlaySightConfig};

use crate::message::Message;

/// Longest accepted request timeout, in seconds.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Application settings state.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// Analytics API base URL.
    pub endpoint: String,
    /// Request timeout in seconds, as typed.
    pub timeout_secs: String,
    /// Date range selected at startup.
    pub default_range: DateRange,
    /// Cache directory, when caching is enabled.
    pub cache_dir: Option<String>,
    /// Whether settings have been modified.
    pub modified: bool,
    /// Last error message (if any).
    pub error: Option<String>,
    /// Success message (if any).
    pub success: Option<String>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::from_config(&PlaySightConfig::default(), None)
    }
}

impl SettingsState {
    /// Create settings from current app configuration.
    pub fn from_config(config: &PlaySightConfig, cache_dir: Option<String>) -> Self {
        Self {
            endpoint: config.analytics.endpoint.clone(),
            timeout_secs: config.analytics.timeout_secs.to_string(),
            default_range: config.analytics.default_range,
            cache_dir,
            modified: false,
            error: None,
            success: None,
        }
    }

    /// Update the endpoint.
    pub fn set_endpoint(&mut self, endpoint: String) {
        self.endpoint = endpoint;
        self.modified = true;
        self.clear_messages();
    }

    /// Update the timeout.
    pub fn set_timeout(&mut self, timeout: String) {
        self.timeout_secs = timeout;
        self.modified = true;
        self.clear_messages();
    }

    /// Update the default date range.
    pub fn set_default_range(&mut self, range: DateRange) {
        self.default_range = range;
        self.modified = true;
        self.clear_messages();
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), String> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err("Endpoint cannot be empty".to_string());
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(format!(
                "Endpoint must start with http:// or https://: {}",
                endpoint
            ));
        }

        let timeout: u64 = self
            .timeout_secs
            .trim()
            .parse()
            .map_err(|_| "Timeout must be a number".to_string())?;

        if timeout < 1 {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if timeout > MAX_TIMEOUT_SECS {
            return Err(format!(
                "Timeout cannot exceed {} seconds",
                MAX_TIMEOUT_SECS
            ));
        }

        Ok(())
    }

    /// Write validated settings into a configuration.
    pub fn apply_to(&self, config: &mut PlaySightConfig) -> Result<(), String> {
        self.validate()?;
        config.analytics.endpoint = self.endpoint.trim().to_string();
        config.analytics.timeout_secs = self
            .timeout_secs
            .trim()
            .parse()
            .map_err(|_| "Timeout must be a number".to_string())?;
        config.analytics.default_range = self.default_range;
        Ok(())
    }

    /// Mark settings as saved.
    pub fn mark_saved(&mut self, message: impl Into<String>) {
        self.modified = false;
        self.error = None;
        self.success = Some(message.into());
    }

    /// Show an informational message.
    pub fn set_success(&mut self, message: impl Into<String>) {
        self.error = None;
        self.success = Some(message.into());
    }

    /// Set error message.
    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
        self.success = None;
    }

    /// Clear messages.
    fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }
}

/// Render the settings view.
pub fn settings_view(state: &SettingsState) -> Element<'_, Message> {
    let header = render_header(state);
    let analytics_section = render_analytics_section(state);
    let cache_section = render_cache_section(state);
    let actions = render_actions(state);

    let content = column![
        header,
        rule::horizontal(1),
        analytics_section,
        rule::horizontal(1),
        cache_section,
        rule::horizontal(1),
        actions,
    ]
    .spacing(20)
    .padding(20);

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn help_text(content: &str) -> iced::widget::Text<'_> {
    text(content).size(11).style(|_theme: &Theme| text::Style {
        color: Some(iced::Color::from_rgb(0.5, 0.5, 0.5)),
    })
}

/// Render header with back button.
fn render_header(state: &SettingsState) -> Element<'_, Message> {
    let back_button = button(text("<- Back").size(14))
        .on_press(Message::CloseSettings)
        .style(iced::widget::button::secondary);

    let title = text("Settings").size(24);

    let modified_indicator = if state.modified {
        text("(unsaved changes)")
            .size(12)
            .style(|_theme: &Theme| text::Style {
                color: Some(iced::Color::from_rgb(1.0, 0.7, 0.0)),
            })
    } else {
        text("")
    };

    row![back_button, title, modified_indicator]
        .spacing(15)
        .align_y(Alignment::Center)
        .into()
}

/// Render analytics endpoint section.
fn render_analytics_section(state: &SettingsState) -> Element<'_, Message> {
    let section_title = text("Analytics Source").size(18);

    let endpoint_label = text("Endpoint:").size(14);
    let endpoint_input = text_input("http://localhost:8000/api", &state.endpoint)
        .on_input(Message::SetEndpoint)
        .padding(8)
        .width(Length::Fixed(400.0));

    let timeout_label = text("Request timeout (seconds):").size(14);
    let timeout_input = text_input("30", &state.timeout_secs)
        .on_input(Message::SetTimeout)
        .padding(8)
        .width(Length::Fixed(100.0));

    let timeout_row = row![timeout_label, timeout_input]
        .spacing(10)
        .align_y(Alignment::Center);

    let range_label = text("Default date range:").size(14);
    let range_picker = pick_list(
        DateRange::ALL,
        Some(state.default_range),
        Message::SetDefaultRange,
    )
    .placeholder("Select range");

    let range_row = row![range_label, range_picker]
        .spacing(10)
        .align_y(Alignment::Center);

    column![
        section_title,
        endpoint_label,
        endpoint_input,
        help_text("Base URL; metrics are fetched from <endpoint>/metrics"),
        timeout_row,
        range_row,
    ]
    .spacing(8)
    .into()
}

/// Render response cache section.
fn render_cache_section(state: &SettingsState) -> Element<'_, Message> {
    let section_title = text("Response Cache").size(18);

    let location = match &state.cache_dir {
        Some(dir) => text(format!("Location: {}", dir)).size(14),
        None => text("Caching is disabled").size(14),
    };

    let clear_button = button(text("Clear Cache").size(14))
        .on_press_maybe(state.cache_dir.is_some().then_some(Message::ClearCache))
        .style(iced::widget::button::secondary);

    column![
        section_title,
        location,
        help_text("Responses are reused for 5 minutes per date range"),
        clear_button,
    ]
    .spacing(8)
    .into()
}

/// Render action buttons and messages.
fn render_actions(state: &SettingsState) -> Element<'_, Message> {
    let mut content = Column::new().spacing(10);

    if let Some(error) = &state.error {
        let error_text = text(format!("Error: {}", error))
            .size(14)
            .style(|_theme: &Theme| text::Style {
                color: Some(iced::Color::from_rgb(1.0, 0.3, 0.3)),
            });
        content = content.push(error_text);
    }

    if let Some(success) = &state.success {
        let success_text = text(success).size(14).style(|_theme: &Theme| text::Style {
            color: Some(iced::Color::from_rgb(0.3, 1.0, 0.3)),
        });
        content = content.push(success_text);
    }

    let save_button = button(text("Save Settings").size(14))
        .on_press(Message::SaveSettings)
        .style(iced::widget::button::primary);

    let reset_button = button(text("Reset to Defaults").size(14))
        .on_press(Message::ResetSettings)
        .style(iced::widget::button::secondary);

    content = content.push(row![save_button, reset_button].spacing(10));

    content.into()
}
