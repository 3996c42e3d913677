use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ListOrder};
use crate::util::unicode::display_width;

/// Render the header row: title, active filters and list order on the
/// left, sheet count on the right
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let sep = Span::styled(" \u{2502} ", Style::default().fg(app.theme.dim).bg(bg));
    let label = Style::default().fg(app.theme.text).bg(bg);
    let value = Style::default().fg(app.theme.text_bright).bg(bg);

    let mut spans = vec![Span::styled(
        " tourpanel",
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    let criteria = app.panel.criteria();
    spans.push(sep.clone());
    spans.push(Span::styled("Estado: ", label));
    spans.push(Span::styled(criteria.status_filter.label(), value));

    if !criteria.text_query.is_empty() {
        spans.push(sep.clone());
        spans.push(Span::styled(
            format!("/{}", criteria.text_query),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    spans.push(sep.clone());
    spans.push(Span::styled("Orden: ", label));
    spans.push(Span::styled(
        match app.order {
            ListOrder::Grouped => "meses",
            ListOrder::Workbook => "libro",
        },
        value,
    ));

    if !app.panel.config().settings.auto_reorder {
        spans.push(sep);
        spans.push(Span::styled(
            "mover: bloqueado",
            Style::default().fg(app.theme.red).bg(bg),
        ));
    }

    // Right-aligned count
    let count = format!("{} hojas ", app.visible_sheets().len());
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let count_w = display_width(&count);
    if used + count_w < width {
        spans.push(Span::styled(
            " ".repeat(width - used - count_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(count, Style::default().fg(app.theme.dim).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
