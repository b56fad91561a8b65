use crate::ui::app::MetricsField;
use margin_core::{
    report::MetricsInput,
    theme::{Element, Theme},
};
use ratatui::{
    prelude::{Constraint, Direction, Frame, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render_metrics_form(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    form: &MetricsInput,
    focused: MetricsField,
    form_active: bool,
) {
    let block = Block::new()
        .borders(Borders::ALL)
        .title(" 📈 Daily Metrics ")
        .style(theme.text_style());

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Today header
            Constraint::Length(1), // Revenue
            Constraint::Length(1), // Cost
            Constraint::Length(1), // Customers
            Constraint::Length(1), // Gap
            Constraint::Length(1), // Previous Day header
            Constraint::Length(1), // Revenue
            Constraint::Length(1), // Cost
            Constraint::Length(1), // Customers
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Hint
        ])
        .split(inner_area);

    // Helper to create a field line with a cursor on the focused field
    let create_field_line = |label: &str, value: &str, is_focused: bool| {
        let value_style = if is_focused && form_active {
            theme.highlight_style()
        } else {
            theme.text_style()
        };
        let display_value = if is_focused && form_active {
            format!("{}_", value)
        } else {
            value.to_owned()
        };
        Line::from(vec![
            Span::styled(
                format!("{:<12}", label),
                theme.warning_style().add_modifier(Modifier::BOLD),
            ),
            Span::styled(display_value, value_style),
        ])
    };

    let section = |label: &str| {
        Line::from(Span::styled(
            label.to_string(),
            theme.ratatui_style(Element::Title),
        ))
    };

    frame.render_widget(Paragraph::new(section("Today")), chunks[0]);
    frame.render_widget(
        Paragraph::new(create_field_line(
            "Revenue $",
            &form.daily_revenue,
            focused == MetricsField::DailyRevenue,
        )),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(create_field_line(
            "Cost $",
            &form.daily_cost,
            focused == MetricsField::DailyCost,
        )),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(create_field_line(
            "Customers",
            &form.daily_customers,
            focused == MetricsField::DailyCustomers,
        )),
        chunks[3],
    );

    frame.render_widget(Paragraph::new(section("Previous Day")), chunks[5]);
    frame.render_widget(
        Paragraph::new(create_field_line(
            "Revenue $",
            &form.prev_revenue,
            focused == MetricsField::PrevRevenue,
        )),
        chunks[6],
    );
    frame.render_widget(
        Paragraph::new(create_field_line(
            "Cost $",
            &form.prev_cost,
            focused == MetricsField::PrevCost,
        )),
        chunks[7],
    );
    frame.render_widget(
        Paragraph::new(create_field_line(
            "Customers",
            &form.prev_customers,
            focused == MetricsField::PrevCustomers,
        )),
        chunks[8],
    );

    let hint = Paragraph::new("[ENTER] Analyze").style(theme.ratatui_style(Element::Inactive));
    frame.render_widget(hint, chunks[10]);
}
