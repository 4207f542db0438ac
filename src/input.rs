/// Event-source adapter: turns crossterm key events into `KeyInput`s so the
/// simulation never sees raw key codes.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::{InputAction, KeyInput};

pub fn action_for_key(code: KeyCode, modifiers: KeyModifiers) -> InputAction {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => InputAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => InputAction::MoveRight,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => InputAction::Fire,
        KeyCode::Char('q') | KeyCode::Char('Q') => InputAction::Quit,
        _ => InputAction::Unknown,
    }
}

fn glyph_for_key(code: KeyCode) -> Option<char> {
    match code {
        KeyCode::Char(c) => Some(c),
        KeyCode::Left => Some('←'),
        KeyCode::Right => Some('→'),
        KeyCode::Up => Some('↑'),
        KeyCode::Down => Some('↓'),
        _ => None,
    }
}

/// `None` for anything that is not a key press (resize, mouse, key release).
pub fn key_input(event: &Event) -> Option<KeyInput> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) if *kind != KeyEventKind::Release => Some(KeyInput {
            action: action_for_key(*code, *modifiers),
            glyph: glyph_for_key(*code),
        }),
        _ => None,
    }
}
