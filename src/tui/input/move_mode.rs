use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::reorder::Edge;
use crate::tui::app::{App, ListOrder, Mode, MoveState};

/// Enter MOVE mode for the sheet under the cursor. Moves are only
/// meaningful in workbook order, so the list switches to it.
pub(super) fn enter_move_mode(app: &mut App) {
    let Some(sheet) = app.cursor_sheet() else {
        return;
    };
    if app.order != ListOrder::Workbook {
        app.order = ListOrder::Workbook;
        app.focus_sheet(&sheet.id);
    }
    app.move_state = Some(MoveState {
        source: sheet.id,
        gap: app.cursor,
    });
    app.mode = Mode::Move;
}

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    let len = app.visible_sheets().len();
    let Some(state) = app.move_state.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.gap = (state.gap + 1).min(len);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.gap = state.gap.saturating_sub(1);
        }
        KeyCode::Home => state.gap = 0,
        KeyCode::End => state.gap = len,
        KeyCode::Esc => {
            app.move_state = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => drop_at_gap(app),
        _ => {}
    }
}

/// Turn the gap into a (target, edge) drop and hand it to the panel
fn drop_at_gap(app: &mut App) {
    let Some(state) = app.move_state.take() else {
        return;
    };
    app.mode = Mode::Navigate;

    let sheets = app.visible_sheets();
    let drop = match sheets.get(state.gap) {
        Some(target) => Some((target.id.clone(), Edge::Before)),
        None => sheets.last().map(|last| (last.id.clone(), Edge::After)),
    };
    if let Some((target, edge)) = drop {
        let _ = app.panel.reorder(&state.source, &target, edge);
    }
    app.focus_sheet(&state.source);
    app.clamp_cursor();
}

#[cfg(test)]
mod tests {
    use crate::tui::app::{ListOrder, Mode};
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::{demo_app, key};
    use crossterm::event::KeyCode;

    fn order(app: &crate::tui::app::App) -> Vec<String> {
        app.panel.workbook_order().into_iter().map(|s| s.name).collect()
    }

    #[test]
    fn move_switches_to_workbook_order() {
        let mut app = demo_app();
        handle_key(&mut app, key(KeyCode::Char('m')));
        assert_eq!(app.mode, Mode::Move);
        assert_eq!(app.order, ListOrder::Workbook);
    }

    #[test]
    fn drop_to_the_top() {
        let mut app = demo_app();
        app.order = ListOrder::Workbook;
        app.cursor = 7; // Notas
        handle_key(&mut app, key(KeyCode::Char('m')));
        handle_key(&mut app, key(KeyCode::Home));
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(order(&app)[0], "Notas");
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn drop_below_the_last() {
        let mut app = demo_app();
        app.order = ListOrder::Workbook;
        app.cursor = 0;
        handle_key(&mut app, key(KeyCode::Char('m')));
        handle_key(&mut app, key(KeyCode::End));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(order(&app).last().map(String::as_str), Some("Plantilla Nacional"));
    }

    #[test]
    fn escape_leaves_order_alone() {
        let mut app = demo_app();
        app.order = ListOrder::Workbook;
        let before = order(&app);
        handle_key(&mut app, key(KeyCode::Char('m')));
        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(order(&app), before);
        assert!(app.move_state.is_none());
    }
}
