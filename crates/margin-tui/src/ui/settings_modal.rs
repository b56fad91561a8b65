use crate::ui::app::{AppMode, SettingsFeedback, SettingsSelection};
use margin_core::{
    settings::Settings,
    theme::{Element, Theme},
};
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Frame, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render_settings_modal(
    frame: &mut Frame,
    area: Rect,
    settings: &Settings,
    theme: &Theme,
    selection: SettingsSelection,
    mode: AppMode,
    edit_buffer: &str,
    feedback: &SettingsFeedback,
) {
    let block = Block::new()
        .title(" Settings ")
        .borders(Borders::ALL)
        .style(theme.warning_style());

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Provider URL
            Constraint::Length(1), // Model Name
            Constraint::Length(1), // Temperature
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Action Text
        ])
        .split(inner_area);

    // Helper to create a setting line
    let create_setting_line = |label: &str, value: &str, is_selected: bool, is_editing: bool| {
        let value_style = if is_selected {
            theme.highlight_style()
        } else {
            theme.text_style()
        };

        let display_value = if is_editing {
            format!("{}_", value) // Add cursor indicator when editing
        } else {
            value.to_owned()
        };

        Line::from(vec![
            Span::styled(
                format!("{:<14}", label),
                theme.warning_style().add_modifier(Modifier::BOLD),
            ),
            Span::styled(display_value, value_style),
        ])
    };

    // Provider URL
    let provider_value = if matches!(mode, AppMode::EditingProviderUrl) {
        edit_buffer
    } else {
        &settings.provider_url
    };
    let provider_line = create_setting_line(
        "Provider URL:",
        provider_value,
        selection == SettingsSelection::ProviderUrl,
        matches!(mode, AppMode::EditingProviderUrl),
    );
    frame.render_widget(Paragraph::new(provider_line), chunks[0]);

    // Model Name
    let model_value = if matches!(mode, AppMode::EditingModelName) {
        edit_buffer.to_string()
    } else if settings.model_name.is_empty() {
        "[ENTER MODEL NAME]".to_string()
    } else {
        settings.model_name.clone()
    };
    let model_line = create_setting_line(
        "Model Name:",
        &model_value,
        selection == SettingsSelection::ModelName,
        matches!(mode, AppMode::EditingModelName),
    );
    frame.render_widget(Paragraph::new(model_line), chunks[1]);

    // Temperature slider with its live readout
    let temperature_line = create_setting_line(
        "Temperature:",
        &format!("◄ {:.1} ►", settings.temperature),
        selection == SettingsSelection::Temperature,
        false,
    );
    frame.render_widget(Paragraph::new(temperature_line), chunks[2]);

    // Feedback line: outcome of the most recent save attempt only
    let (feedback_text, feedback_style) = match feedback {
        SettingsFeedback::Idle => (String::new(), theme.text_style()),
        SettingsFeedback::Saving => ("Saving...".to_string(), theme.info_style()),
        SettingsFeedback::Success(message) => (message.clone(), theme.accent_style()),
        SettingsFeedback::Error(message) => (message.clone(), theme.error_style()),
    };
    let feedback_paragraph = Paragraph::new(feedback_text)
        .alignment(Alignment::Center)
        .style(feedback_style);
    frame.render_widget(feedback_paragraph, chunks[4]);

    // Action Text
    let action_text = match mode {
        AppMode::EditingProviderUrl | AppMode::EditingModelName => "[ENTER] Apply | [ESC] Cancel",
        _ => "[↑↓] Navigate | [←→] Temperature | [S]ave | [ESC] Close",
    };
    let action_style = if selection == SettingsSelection::Save {
        theme.highlight_style()
    } else {
        theme.ratatui_style(Element::Inactive)
    };
    let action_paragraph = Paragraph::new(action_text)
        .alignment(Alignment::Center)
        .style(action_style);
    frame.render_widget(action_paragraph, chunks[5]);
}
