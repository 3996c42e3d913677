mod create;
mod mouse;
mod move_mode;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};

use super::app::{App, Mode};

use create::handle_create;
use move_mode::handle_move;
use navigate::handle_navigate;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Move => handle_move(app, key),
        Mode::Create => handle_create(app, key),
    }
}

/// Handle a mouse event. Dragging only works while navigating.
pub fn handle_mouse(app: &mut App, event: MouseEvent) {
    if app.mode == Mode::Navigate {
        mouse::handle_drag(app, event);
    }
}
