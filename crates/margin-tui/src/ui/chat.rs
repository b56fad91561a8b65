use crate::ui::transcript::{ChatEntry, Transcript};
use chrono::{DateTime, Local};
use margin_core::{
    report::AnalysisReport,
    theme::{Element, Theme},
};
use ratatui::{
    prelude::{Frame, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render_chat(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    transcript: &Transcript,
    spinner_tick: usize,
) {
    let chat_block = Block::new()
        .borders(Borders::ALL)
        .title(" 💬 Business Analyst ")
        .style(theme.text_style());

    let inner_area = chat_block.inner(area);
    frame.render_widget(chat_block, area);

    let width = inner_area.width.saturating_sub(2).max(10) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for entry in transcript.entries() {
        lines.extend(entry_lines(entry, width, spinner_tick, theme));
        lines.push(Line::default());
    }

    // Newest message always visible: pin the scroll offset to the bottom.
    let offset = lines.len().saturating_sub(inner_area.height as usize) as u16;
    let paragraph = Paragraph::new(lines)
        .style(theme.text_style())
        .scroll((offset, 0));
    frame.render_widget(paragraph, inner_area);
}

fn entry_lines(
    entry: &ChatEntry,
    width: usize,
    spinner_tick: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    match entry {
        ChatEntry::User { text, at } => {
            let mut lines = vec![sender_line("You", Some(at), theme, Element::Accent)];
            lines.extend(body_lines(text, width, theme));
            lines
        }
        ChatEntry::Agent { text, at } => {
            let mut lines = vec![sender_line("Analyst", Some(at), theme, Element::Info)];
            lines.extend(body_lines(text, width, theme));
            lines
        }
        ChatEntry::Pending { text, .. } => {
            let frame_glyph = SPINNER[spinner_tick % SPINNER.len()];
            vec![
                sender_line("Analyst", None, theme, Element::Info),
                Line::from(Span::styled(
                    format!("  {} {}", text, frame_glyph),
                    theme.info_style(),
                )),
            ]
        }
        ChatEntry::Report { report, at } => {
            let mut lines = vec![sender_line("Analyst", Some(at), theme, Element::Info)];
            lines.extend(report_card_lines(report, theme));
            lines
        }
    }
}

fn sender_line(
    sender: &str,
    at: Option<&DateTime<Local>>,
    theme: &Theme,
    element: Element,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        sender.to_string(),
        theme.ratatui_style(element).add_modifier(Modifier::BOLD),
    )];
    if let Some(at) = at {
        spans.push(Span::styled(
            format!("  {}", at.format("%H:%M")),
            theme.ratatui_style(Element::Inactive),
        ));
    }
    Line::from(spans)
}

fn body_lines(text: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    wrap_text(text, width)
        .into_iter()
        .map(|l| Line::from(Span::styled(format!("  {}", l), theme.text_style())))
        .collect()
}

/// Structured rendering of an [`AnalysisReport`]: status line first, then an
/// Alerts section only when there are alerts, then Recommendations likewise.
/// Empty lists produce no header and no bullets.
pub fn report_card_lines(report: &AnalysisReport, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "  📊 Analysis Report".to_string(),
            theme.title_style(),
        )),
        Line::from(vec![
            Span::styled(
                "  Status: ".to_string(),
                theme.text_style().add_modifier(Modifier::BOLD),
            ),
            Span::styled(report.profit_loss_status.clone(), theme.text_style()),
        ]),
    ];

    if !report.alerts_or_warnings.is_empty() {
        lines.push(Line::from(Span::styled(
            "  ⚠️ Alerts".to_string(),
            theme.warning_style().add_modifier(Modifier::BOLD),
        )));
        for alert in &report.alerts_or_warnings {
            lines.push(Line::from(Span::styled(
                format!("  • {}", alert),
                theme.warning_style(),
            )));
        }
    }

    if !report.decision_making_recommendations.is_empty() {
        lines.push(Line::from(Span::styled(
            "  💡 Recommendations".to_string(),
            theme.accent_style(),
        )));
        for recommendation in &report.decision_making_recommendations {
            lines.push(Line::from(Span::styled(
                format!("  • {}", recommendation),
                theme.text_style(),
            )));
        }
    }

    lines
}

/// Word-wraps each source line separately so paragraph breaks survive.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    for source_line in text.split('\n') {
        if source_line.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        for piece in textwrap::wrap(source_line, width) {
            wrapped.push(piece.into_owned());
        }
    }
    wrapped
}
