//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`]; remember to update the help
//! text in [`crate::ui`] as well.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::sample_batch;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn q_and_esc_quit() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);

        let mut app = App::new();
        press(&mut app, KeyCode::Esc);
        assert!(app.quit);
    }

    #[test]
    fn r_requests_refresh() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.take_refresh_request());
    }

    #[test]
    fn vim_keys_navigate() {
        let mut app = App::new();
        app.show_batch(sample_batch());

        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.list_state.selected(), Some(2));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.list_state.selected(), Some(1));
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.list_state.selected(), Some(0));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = App::new();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }
}
