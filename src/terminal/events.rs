use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::client::Endpoint;
use crate::fetcher::FetchRequest;
use crate::terminal::clipboard::Clipboard;
use crate::terminal::state::{AppState, Focus};

#[derive(Debug)]
pub enum KeyAction {
    None,
    Quit,
    Fetch(FetchRequest),
}

pub fn handle_key(key: KeyEvent, state: &mut AppState, clipboard: &mut dyn Clipboard) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    // An open notice swallows the next key.
    if state.notice.is_some() {
        state.dismiss_notice();
        return KeyAction::None;
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('l') => fetch(state, Endpoint::Latest),
            KeyCode::Char('a') => fetch(state, Endpoint::All),
            KeyCode::Char('y') => {
                state.copy_code(clipboard);
                KeyAction::None
            }
            KeyCode::Char('u') => {
                state.clear_field();
                KeyAction::None
            }
            _ => KeyAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Enter => return fetch(state, Endpoint::Latest),
        KeyCode::Tab => {
            state.focus_next();
            return KeyAction::None;
        }
        KeyCode::BackTab => {
            state.focus_prev();
            return KeyAction::None;
        }
        _ => {}
    }

    match state.focus {
        Focus::Url | Focus::Key => handle_field_keys(key, state),
        Focus::History => handle_history_keys(key, state),
    }
    KeyAction::None
}

fn fetch(state: &mut AppState, kind: Endpoint) -> KeyAction {
    match state.begin_fetch(kind) {
        Some(req) => KeyAction::Fetch(req),
        None => KeyAction::None,
    }
}

fn handle_field_keys(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char(c) => state.input_char(c),
        KeyCode::Backspace => state.backspace(),
        _ => {}
    }
}

fn handle_history_keys(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.scroll_history(1),
        KeyCode::Up | KeyCode::Char('k') => state.scroll_history(-1),
        KeyCode::PageDown => state.scroll_history(10),
        KeyCode::PageUp => state.scroll_history(-10),
        KeyCode::End => state.history_back = 0,
        KeyCode::Home => state.history_back = state.history.len(),
        _ => {}
    }
}
