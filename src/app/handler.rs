//! Input handling — maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use super::state::DemoState;

/// Rows moved per key press.
const KEY_SCROLL_ROWS: f64 = 2.0;
/// Rows moved per wheel notch.
const WHEEL_SCROLL_ROWS: f64 = 3.0;
/// Progress meter step for `+` / `-`.
const PROGRESS_STEP: f64 = 0.1;

/// Key help shown in the `?` popup: (keys, description).
pub const KEY_HELP: &[(&str, &str)] = &[
    ("j / k / ↑ / ↓", "scroll the page"),
    ("PgUp / PgDn", "scroll by a screen"),
    ("g / G", "jump to top / bottom"),
    ("r", "replay the number ticker"),
    ("+ / -", "nudge the progress meter"),
    ("l", "cycle tilt-card leave mode"),
    ("mouse", "tilt the card, wheel scrolls"),
    ("?", "toggle this help"),
    ("q / Esc", "quit"),
];

/// Process a key event.
pub fn handle_key(state: &mut DemoState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits, even with the help popup open.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            state.show_help = false;
        }
        return;
    }

    state.status_message = None;
    let screen = f64::from(state.page.viewport);

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => state.scroll_by(KEY_SCROLL_ROWS),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_by(-KEY_SCROLL_ROWS),
        KeyCode::PageDown | KeyCode::Char(' ') => state.scroll_by(screen),
        KeyCode::PageUp => state.scroll_by(-screen),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_to_bottom(),
        KeyCode::Char('r') => state.restart_ticker(),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let next = state.progress + PROGRESS_STEP;
            state.set_progress(next);
        }
        KeyCode::Char('-') => {
            let next = state.progress - PROGRESS_STEP;
            state.set_progress(next);
        }
        KeyCode::Char('l') => state.cycle_leave_mode(),
        KeyCode::Char('?') => state.show_help = true,
        _ => {}
    }
}

/// Process a mouse event.
pub fn handle_mouse(state: &mut DemoState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => state.pointer(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => state.scroll_by(WHEEL_SCROLL_ROWS),
        MouseEventKind::ScrollUp => state.scroll_by(-WHEEL_SCROLL_ROWS),
        _ => {}
    }
}
