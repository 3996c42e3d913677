use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::ops::reorder::Edge;
use crate::tui::app::App;

/// Press on a card picks it up; release on another card drops it there.
/// The drop edge compares the pointer row's center with the card midpoint.
pub(super) fn handle_drag(app: &mut App, event: MouseEvent) {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let picked = app.card_at(event.column, event.row).map(|c| c.id.clone());
            if let Some(id) = &picked {
                app.focus_sheet(id);
            }
            app.drag_source = picked;
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(source) = app.drag_source.take() else {
                return;
            };
            let Some(card) = app.card_at(event.column, event.row).cloned() else {
                return;
            };
            if card.id == source {
                return;
            }
            let edge = Edge::from_pointer(
                f64::from(event.row) + 0.5,
                f64::from(card.area.y),
                f64::from(card.area.height),
            );
            let _ = app.panel.reorder(&source, &card.id, edge);
            app.focus_sheet(&source);
            app.clamp_cursor();
        }
        MouseEventKind::ScrollDown => {
            app.scroll_offset = app.scroll_offset.saturating_add(1);
        }
        MouseEventKind::ScrollUp => {
            app.scroll_offset = app.scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
}
