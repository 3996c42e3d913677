use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, CreateField};

const POPUP_W: u16 = 52;
const LABEL_W: usize = 11;

/// Render the new-sheet form as a centered popup
pub fn render_create_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.create_form.as_ref() else {
        return;
    };

    let bg = app.theme.background;
    let label_style = Style::default().fg(app.theme.text).bg(bg);
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let focus_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let cursor = Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg));

    let field_line = |field: CreateField, label: &str, value: String| {
        let focused = form.field == field;
        let mut spans = vec![
            Span::styled(
                if focused { " \u{25B8} " } else { "   " },
                focus_style,
            ),
            Span::styled(
                format!("{:<width$}", label, width = LABEL_W),
                if focused { focus_style } else { label_style },
            ),
            Span::styled(value, value_style),
        ];
        if focused && field != CreateField::Template {
            spans.push(cursor.clone());
        }
        Line::from(spans)
    };

    let template = form.selected_template().unwrap_or("");
    let lines = vec![
        Line::from(Span::styled(" Nueva hoja", focus_style)),
        Line::from(Span::styled("", label_style)),
        field_line(CreateField::Name, "Nombre", form.name.clone()),
        field_line(
            CreateField::Template,
            "Plantilla",
            format!("\u{2039} {} \u{203A}", template),
        ),
        field_line(CreateField::Date, "Fecha", form.date.clone()),
        Line::from(Span::styled("", label_style)),
        Line::from(Span::styled(
            " Tab campo  \u{2190}/\u{2192} plantilla  Enter crear  Esc cerrar",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];

    let popup_w = POPUP_W.min(area.width.saturating_sub(2));
    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyCode;

    fn popup(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_create_form(frame, app, area);
        })
    }

    #[test]
    fn form_fields_and_focus() {
        let mut app = demo_app();
        handle_key(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "Samaná");
        let out = popup(&app);
        assert!(out.contains("Nueva hoja"));
        assert!(out.contains("▸ Nombre     Samaná▌"));
        assert!(out.contains("Plantilla  ‹ Plantilla Nacional ›"));
        assert!(out.contains("Fecha      2024-06-01"));
    }

    #[test]
    fn template_field_focus() {
        let mut app = demo_app();
        handle_key(&mut app, key(KeyCode::Char('n')));
        handle_key(&mut app, key(KeyCode::Tab));
        handle_key(&mut app, key(KeyCode::Right));
        let out = popup(&app);
        assert!(out.contains("▸ Plantilla  ‹ Plantilla Internacional ›"));
    }

    #[test]
    fn nothing_without_form() {
        let app = demo_app();
        assert_eq!(popup(&app), "");
    }
}
