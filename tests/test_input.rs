use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

use bubble_trouble::entities::InputAction;
use bubble_trouble::input::*;

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

#[test]
fn letter_keys() {
    assert_eq!(action_for_key(KeyCode::Char('a'), KeyModifiers::NONE), InputAction::MoveLeft);
    assert_eq!(action_for_key(KeyCode::Char('d'), KeyModifiers::NONE), InputAction::MoveRight);
    assert_eq!(action_for_key(KeyCode::Char('w'), KeyModifiers::NONE), InputAction::Fire);
    assert_eq!(action_for_key(KeyCode::Char('q'), KeyModifiers::NONE), InputAction::Quit);
}

#[test]
fn arrow_keys_match_letters() {
    assert_eq!(action_for_key(KeyCode::Left, KeyModifiers::NONE), InputAction::MoveLeft);
    assert_eq!(action_for_key(KeyCode::Right, KeyModifiers::NONE), InputAction::MoveRight);
    assert_eq!(action_for_key(KeyCode::Up, KeyModifiers::NONE), InputAction::Fire);
}

#[test]
fn shifted_letters_behave_the_same() {
    assert_eq!(action_for_key(KeyCode::Char('A'), KeyModifiers::SHIFT), InputAction::MoveLeft);
    assert_eq!(action_for_key(KeyCode::Char('W'), KeyModifiers::SHIFT), InputAction::Fire);
}

#[test]
fn ctrl_c_quits() {
    assert_eq!(action_for_key(KeyCode::Char('c'), KeyModifiers::CONTROL), InputAction::Quit);
    assert_eq!(action_for_key(KeyCode::Char('c'), KeyModifiers::NONE), InputAction::Unknown);
}

#[test]
fn other_keys_are_unknown() {
    assert_eq!(action_for_key(KeyCode::Char('x'), KeyModifiers::NONE), InputAction::Unknown);
    assert_eq!(action_for_key(KeyCode::Down, KeyModifiers::NONE), InputAction::Unknown);
    assert_eq!(action_for_key(KeyCode::Enter, KeyModifiers::NONE), InputAction::Unknown);
}

#[test]
fn key_input_carries_glyph() {
    let k = key_input(&press(KeyCode::Char('a'))).unwrap();
    assert_eq!(k.action, InputAction::MoveLeft);
    assert_eq!(k.glyph, Some('a'));

    let k = key_input(&press(KeyCode::Left)).unwrap();
    assert_eq!(k.glyph, Some('←'));

    let k = key_input(&press(KeyCode::Enter)).unwrap();
    assert_eq!(k.action, InputAction::Unknown);
    assert_eq!(k.glyph, None);
}

#[test]
fn key_release_is_ignored() {
    let release = Event::Key(KeyEvent {
        code: KeyCode::Char('w'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    });
    assert!(key_input(&release).is_none());
}

#[test]
fn non_key_events_are_ignored() {
    assert!(key_input(&Event::Resize(80, 24)).is_none());
    assert!(key_input(&Event::FocusGained).is_none());
}
