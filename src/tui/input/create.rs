use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::create::CreateRequest;
use crate::tui::app::{App, CreateField, Mode};
use crate::util::unicode::pop_grapheme;

pub(super) fn handle_create(app: &mut App, key: KeyEvent) {
    let Some(form) = app.create_form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.create_form = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
        KeyCode::Enter => submit(app),

        // Template picker
        KeyCode::Left if form.field == CreateField::Template => {
            let n = form.templates.len().max(1);
            form.template_idx = (form.template_idx + n - 1) % n;
        }
        KeyCode::Right if form.field == CreateField::Template => {
            let n = form.templates.len().max(1);
            form.template_idx = (form.template_idx + 1) % n;
        }

        // Text fields
        KeyCode::Backspace => match form.field {
            CreateField::Name => pop_grapheme(&mut form.name),
            CreateField::Date => pop_grapheme(&mut form.date),
            CreateField::Template => {}
        },
        KeyCode::Char(c) => match form.field {
            CreateField::Name => form.name.push(c),
            CreateField::Date => form.date.push(c),
            CreateField::Template => {}
        },
        _ => {}
    }
}

/// Send the form to the panel. Validation errors keep the form open so the
/// user can fix the input; the message is in the status row.
fn submit(app: &mut App) {
    let Some(form) = app.create_form.as_ref() else {
        return;
    };
    let request = CreateRequest {
        base_name: form.name.clone(),
        template: form.selected_template().map(str::to_string),
        date: form.date.clone(),
    };

    match app.panel.create_sheet(&request) {
        Ok(sheet) => {
            app.create_form = None;
            app.mode = Mode::Navigate;
            app.focus_sheet(&sheet.id);
        }
        Err(e) if e.is_validation() => {}
        Err(_) => {
            app.create_form = None;
            app.mode = Mode::Navigate;
            app.clamp_cursor();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::status::Status;
    use crate::tui::app::{BLANK_TEMPLATE, Mode};
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::{demo_app, key, type_text};
    use crossterm::event::KeyCode;

    #[test]
    fn creates_from_template_and_focuses_it() {
        let mut app = demo_app();
        handle_key(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "Las Terrenas");
        // Date field: replace the prefilled date
        handle_key(&mut app, key(KeyCode::Tab));
        handle_key(&mut app, key(KeyCode::Tab));
        for _ in 0..10 {
            handle_key(&mut app, key(KeyCode::Backspace));
        }
        type_text(&mut app, "2024-08-09");
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Navigate);
        let sheet = app.cursor_sheet().unwrap();
        assert_eq!(sheet.name, "Las Terrenas 09.08");
        assert_eq!(sheet.status, Status::Open);
    }

    #[test]
    fn blank_template_choice() {
        let mut app = demo_app();
        handle_key(&mut app, key(KeyCode::Char('n')));
        handle_key(&mut app, key(KeyCode::Tab));
        handle_key(&mut app, key(KeyCode::Left));
        let form = app.create_form.as_ref().unwrap();
        assert_eq!(form.selected_template(), Some(BLANK_TEMPLATE));
    }

    #[test]
    fn validation_error_keeps_form_open() {
        let mut app = demo_app();
        handle_key(&mut app, key(KeyCode::Char('n')));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Create);
        assert!(app.panel.status_line().starts_with("Error: "));
    }
}
