use margin_core::{
    settings::{Settings, ValidationError},
    theme::Theme,
};
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Frame, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render_header(frame: &mut Frame, area: Rect, theme: &Theme, settings: &Settings) {
    let header_block = Block::new()
        .borders(Borders::ALL)
        .style(theme.border_style());

    let inner_area = header_block.inner(area);
    frame.render_widget(header_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(48)])
        .split(inner_area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" 📊 Margin ", theme.title_style()),
        Span::styled("· business metrics analyzer", theme.text_style()),
    ]));
    frame.render_widget(title, chunks[0]);

    let status = match settings.is_valid() {
        Ok(()) => Line::from(vec![
            Span::styled(settings.model_name.clone(), theme.accent_style()),
            Span::styled(format!(" @ {} ", settings.server), theme.info_style()),
        ]),
        Err(ValidationError::ProviderUrl) => Line::from(Span::styled(
            "⚠️ provider URL not set · press [S] ",
            theme.warning_style(),
        )),
        Err(ValidationError::ModelName) => Line::from(Span::styled(
            "⚠️ model not configured · press [S] ",
            theme.warning_style(),
        )),
    };
    let status_paragraph = Paragraph::new(status).alignment(Alignment::Right);
    frame.render_widget(status_paragraph, chunks[1]);
}
