use crate::ui::app::AppMode;
use margin_core::theme::{Element, Theme};
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render_footer(frame: &mut Frame, area: Rect, theme: &Theme, mode: AppMode) {
    let footer_block = Block::default()
        .borders(Borders::ALL)
        .style(theme.border_style());

    let inner_area = footer_block.inner(area);
    frame.render_widget(footer_block, area);

    let content = match mode {
        AppMode::Metrics => Line::from(vec![
            Span::raw("[Tab]"),
            Span::styled(" Next Field", theme.ratatui_style(Element::Inactive)),
            Span::raw(" | "),
            Span::raw("[Enter]"),
            Span::styled(" Analyze", theme.ratatui_style(Element::Inactive)),
            Span::raw(" | "),
            Span::raw("[S]"),
            Span::styled("ettings", theme.ratatui_style(Element::Inactive)),
            Span::raw(" | "),
            Span::raw("[T]"),
            Span::styled("heme", theme.ratatui_style(Element::Inactive)),
            Span::raw(" | "),
            Span::raw("[Q]"),
            Span::styled("uit", theme.ratatui_style(Element::Inactive)),
        ]),
        _ => Line::from(Span::styled(
            "Settings open: click outside the dialog or press [ESC] to close",
            theme.ratatui_style(Element::Inactive),
        )),
    };

    let footer_paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .style(theme.text_style());
    frame.render_widget(footer_paragraph, inner_area);
}
