//! Keyboard mapping for the terminal client.
//!
//! Arrow keys, WASD and HJKL slide the board; `r` restarts; `q` or Esc quits.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tile_core::Direction;

/// High-level outcome of processing a keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Move(Direction),
    Restart,
    None,
}

/// Converts a raw key event into a client command.
pub fn handle_key(key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Char(ch) => handle_char(ch),
        KeyCode::Left => KeyAction::Move(Direction::Left),
        KeyCode::Right => KeyAction::Move(Direction::Right),
        KeyCode::Up => KeyAction::Move(Direction::Up),
        KeyCode::Down => KeyAction::Move(Direction::Down),
        KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

fn handle_char(raw: char) -> KeyAction {
    match raw.to_ascii_lowercase() {
        'q' => KeyAction::Quit,
        'r' => KeyAction::Restart,
        'h' | 'a' => KeyAction::Move(Direction::Left),
        'j' | 's' => KeyAction::Move(Direction::Down),
        'k' | 'w' => KeyAction::Move(Direction::Up),
        'l' | 'd' => KeyAction::Move(Direction::Right),
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn maps_movement_keys() {
        assert_eq!(
            handle_key(key(KeyCode::Char('h'))),
            KeyAction::Move(Direction::Left)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('W'))),
            KeyAction::Move(Direction::Up)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('j'))),
            KeyAction::Move(Direction::Down)
        );
        assert_eq!(
            handle_key(key(KeyCode::Right)),
            KeyAction::Move(Direction::Right)
        );
    }

    #[test]
    fn maps_restart_and_quit() {
        assert_eq!(handle_key(key(KeyCode::Char('r'))), KeyAction::Restart);
        assert_eq!(handle_key(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handle_key(key(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        };
        assert_eq!(handle_key(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn ignores_unknown_keys() {
        assert_eq!(handle_key(key(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(handle_key(key(KeyCode::Tab)), KeyAction::None);
    }
}
