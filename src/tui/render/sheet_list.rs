use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::sheet::Sheet;
use crate::tui::app::{App, CardArea, ListRow, Mode};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

/// Rows taken by one sheet card
pub const CARD_HEIGHT: usize = 2;

/// A drawable line of the list
enum ListLine {
    Text(Line<'static>),
    /// `part` 0 or 1 of the card for `sheet`
    Card { sheet: Sheet, part: usize, index: usize },
}

fn pad_to(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width);
    let w = display_width(&text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(w)))
}

fn date_text(sheet: &Sheet) -> String {
    if sheet.date.is_resolved() {
        format!("{:02}.{:02}.{}", sheet.date.day, sheet.date.month, sheet.date.year)
    } else {
        String::new()
    }
}

fn card_line(sheet: &Sheet, part: usize, width: usize, selected: bool, theme: &Theme) -> Line<'static> {
    let (bg, fg) = theme.card_colors(sheet.tab_color.as_deref());
    let marker = if selected { "▌" } else { " " };
    let body = if part == 0 {
        format!(" {}", sheet.name)
    } else {
        format!("   {}  {}", sheet.status.label(), date_text(sheet))
    };
    let mut style = Style::default().fg(fg).bg(bg);
    if part == 0 {
        style = style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(
            marker.to_string(),
            Style::default().fg(theme.highlight).bg(theme.background),
        ),
        Span::styled(pad_to(&body, width.saturating_sub(1)), style),
    ])
}

fn gap_line(width: usize, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("▸{}", "─".repeat(width.saturating_sub(1))),
        Style::default().fg(theme.highlight).bg(theme.background),
    ))
}

/// Build every line of the list, including the move gap marker
fn build_lines(app: &App, width: usize) -> Vec<ListLine> {
    let gap = match (app.mode, &app.move_state) {
        (Mode::Move, Some(state)) => Some(state.gap),
        _ => None,
    };

    let mut lines = Vec::new();
    let mut index = 0;
    for row in app.rows() {
        match row {
            ListRow::Header { key, count } => {
                lines.push(ListLine::Text(Line::from(Span::styled(
                    format!("── {} ({}) ", key, count),
                    Style::default()
                        .fg(app.theme.text_bright)
                        .bg(app.theme.background)
                        .add_modifier(Modifier::BOLD),
                ))));
            }
            ListRow::Sheet(sheet) => {
                if gap == Some(index) {
                    lines.push(ListLine::Text(gap_line(width, &app.theme)));
                }
                for part in 0..CARD_HEIGHT {
                    lines.push(ListLine::Card {
                        sheet: sheet.clone(),
                        part,
                        index,
                    });
                }
                index += 1;
            }
        }
    }
    if gap == Some(index) {
        lines.push(ListLine::Text(gap_line(width, &app.theme)));
    }
    lines
}

/// Render the sheet list and remember where each card landed
pub fn render_sheet_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let width = area.width as usize;
    let height = area.height as usize;
    let lines = build_lines(app, width);
    app.card_areas.clear();

    if lines.is_empty() {
        let empty = Paragraph::new(Span::styled(
            " Sin hojas",
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor card in view
    if let Some(first) = lines
        .iter()
        .position(|l| matches!(l, ListLine::Card { index, .. } if *index == app.cursor))
    {
        if first < app.scroll_offset {
            app.scroll_offset = first;
        } else if first + CARD_HEIGHT > app.scroll_offset + height {
            app.scroll_offset = (first + CARD_HEIGHT).saturating_sub(height);
        }
    }
    app.scroll_offset = app.scroll_offset.min(lines.len().saturating_sub(1));

    let mut rendered = Vec::with_capacity(height);
    for (offset, line) in lines.iter().skip(app.scroll_offset).take(height).enumerate() {
        let y = area.y + offset as u16;
        match line {
            ListLine::Text(l) => rendered.push(l.clone()),
            ListLine::Card { sheet, part, index } => {
                let selected = *index == app.cursor;
                rendered.push(card_line(sheet, *part, width, selected, &app.theme));
                match app.card_areas.last_mut() {
                    Some(card) if card.id == sheet.id => card.area.height += 1,
                    _ => app.card_areas.push(CardArea {
                        id: sheet.id.clone(),
                        area: Rect::new(area.x, y, area.width, 1),
                    }),
                }
            }
        }
    }

    let paragraph = Paragraph::new(rendered).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}
