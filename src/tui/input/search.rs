use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};
use crate::util::unicode::pop_grapheme;

/// Push the typed text into the panel's criteria
fn apply_query(app: &mut App) {
    let criteria = app.panel.criteria().with_query(app.search_input.clone());
    app.panel.set_criteria(criteria);
    app.cursor = 0;
}

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        // Cancel: drop the text filter entirely
        KeyCode::Esc => {
            app.search_input.clear();
            apply_query(app);
            app.mode = Mode::Navigate;
        }
        // Keep the filter and go back to the list
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            pop_grapheme(&mut app.search_input);
            apply_query(app);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            apply_query(app);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::tui::app::Mode;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::{demo_app, key, type_text};
    use crossterm::event::KeyCode;

    #[test]
    fn filter_follows_typing() {
        let mut app = demo_app();
        handle_key(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.mode, Mode::Search);
        type_text(&mut app, "samana");
        let names: Vec<String> = app.visible_sheets().into_iter().map(|s| s.name).collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("Samaná"));

        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.panel.criteria().text_query, "samana");
    }

    #[test]
    fn backspace_and_escape() {
        let mut app = demo_app();
        handle_key(&mut app, key(KeyCode::Char('/')));
        type_text(&mut app, "plantillaX");
        assert!(app.visible_sheets().is_empty());
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.visible_sheets().len(), 2);
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.panel.criteria().text_query, "");
        assert_eq!(app.visible_sheets().len(), 8);
    }
}
