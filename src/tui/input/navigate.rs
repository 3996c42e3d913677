use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::status::Status;
use crate::tui::app::{App, CreateForm, ListOrder, Mode};

use super::move_mode::enter_move_mode;

fn status_for_key(c: char) -> Option<Status> {
    match c {
        'o' => Some(Status::Open),
        'c' => Some(Status::Cancelled),
        'x' => Some(Status::Closed),
        's' => Some(Status::System),
        'u' => Some(Status::Unclassified),
        _ => None,
    }
}

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    let len = app.visible_sheets().len();

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.should_quit = true,

        // Cursor
        (_, KeyCode::Char('j') | KeyCode::Down) => {
            if app.cursor + 1 < len {
                app.cursor += 1;
            }
        }
        (_, KeyCode::Char('k') | KeyCode::Up) => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        (_, KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::End | KeyCode::Char('G')) => app.cursor = len.saturating_sub(1),

        // Workbook actions
        (_, KeyCode::Enter) => {
            if let Some(sheet) = app.cursor_sheet() {
                let _ = app.panel.activate(&sheet.id);
            }
        }
        (_, KeyCode::Char(c)) if status_for_key(c).is_some() => {
            if let (Some(sheet), Some(status)) = (app.cursor_sheet(), status_for_key(c)) {
                let _ = app.panel.set_status(&sheet.id, status);
                // The sheet may have left the current filter or changed group
                app.focus_sheet(&sheet.id);
                app.clamp_cursor();
            }
        }
        (_, KeyCode::Char('r')) => {
            let current = app.cursor_sheet().map(|s| s.id);
            let _ = app.panel.refresh();
            if let Some(id) = current {
                app.focus_sheet(&id);
            }
            app.clamp_cursor();
        }
        (_, KeyCode::Char('H')) => {
            let _ = app.panel.toggle_headings();
        }
        (_, KeyCode::Char('a')) => {
            app.panel.toggle_auto_reorder();
        }
        (_, KeyCode::Char('m')) => enter_move_mode(app),
        (_, KeyCode::Char('n')) => {
            let form = CreateForm::new(app.template_choices(), app.panel.reference_date());
            app.create_form = Some(form);
            app.mode = Mode::Create;
        }

        // Filters
        (_, KeyCode::Char('/')) => {
            app.search_input = app.panel.criteria().text_query.clone();
            app.mode = Mode::Search;
        }
        (_, KeyCode::Tab) => {
            let next = app.panel.criteria().status_filter.next();
            let criteria = app.panel.criteria().with_status(next);
            app.panel.set_criteria(criteria);
            app.cursor = 0;
        }
        (_, KeyCode::Esc) => {
            if !app.panel.criteria().is_empty() {
                app.panel.set_criteria(Default::default());
                app.cursor = 0;
            }
        }
        (_, KeyCode::Char('g')) => {
            let current = app.cursor_sheet().map(|s| s.id);
            app.order = match app.order {
                ListOrder::Grouped => ListOrder::Workbook,
                ListOrder::Workbook => ListOrder::Grouped,
            };
            if let Some(id) = current {
                app.focus_sheet(&id);
            }
        }
        _ => {}
    }
}
