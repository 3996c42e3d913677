use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

/// Append a right-aligned hint if it fits
fn push_hint(spans: &mut Vec<Span<'static>>, hint: &str, width: usize, app: &App) {
    let bg = app.theme.background;
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint.to_string(),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span<'static>> = Vec::new();
    match app.mode {
        Mode::Search => {
            // Search prompt: /query▌
            spans.push(Span::styled(
                format!("/{}", app.search_input),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
            push_hint(&mut spans, "Enter filtrar  Esc borrar", width, app);
        }
        Mode::Move => {
            spans.push(Span::styled(
                " MOVER",
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
            push_hint(&mut spans, "j/k mover  Enter soltar  Esc cancelar", width, app);
        }
        Mode::Navigate | Mode::Create => {
            let message = app.panel.status_line();
            let color = if message.starts_with("Error:") {
                app.theme.red
            } else {
                app.theme.text
            };
            spans.push(Span::styled(
                format!(" {}", message),
                Style::default().fg(color).bg(bg),
            ));
            if app.mode == Mode::Navigate {
                push_hint(&mut spans, "n nueva  m mover  / buscar  q salir", width, app);
            }
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyCode;

    fn status_row(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn navigate_shows_status_line() {
        let app = demo_app();
        let out = status_row(&app);
        assert!(out.starts_with(" Hojas cargadas."));
        assert!(out.ends_with("q salir"));
    }

    #[test]
    fn search_prompt() {
        let mut app = demo_app();
        crate::tui::input::handle_key(&mut app, key(KeyCode::Char('/')));
        type_text(&mut app, "sam");
        let out = status_row(&app);
        assert!(out.starts_with("/sam▌"));
        assert!(out.ends_with("Esc borrar"));
    }

    #[test]
    fn move_hint() {
        let mut app = demo_app();
        crate::tui::input::handle_key(&mut app, key(KeyCode::Char('m')));
        let out = status_row(&app);
        assert!(out.starts_with(" MOVER"));
        assert!(out.ends_with("Esc cancelar"));
    }
}
