//! Key mapping for the pager. Pure logic, no I/O.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions produced by key input processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    JumpToTop,
    JumpToBottom,
    LineDown,
    LineUp,
    PageDown,
    PageUp,
    HalfPageDown,
    HalfPageUp,
}

/// Map a key event to an `Action`. Returns `None` for unbound keys.
pub fn map_key_event(key: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = key;

    match (code, modifiers) {
        // 終了 (always immediate)
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(Action::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),

        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(Action::JumpToTop),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Action::JumpToBottom),

        // 半画面
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Some(Action::HalfPageDown),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(Action::HalfPageUp),
        (KeyCode::Char('d'), _) => Some(Action::HalfPageDown),
        (KeyCode::Char('u'), _) => Some(Action::HalfPageUp),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(Action::LineDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(Action::LineUp),

        (KeyCode::Char('f'), _) | (KeyCode::Char(' '), _) | (KeyCode::PageDown, _) => {
            Some(Action::PageDown)
        }
        (KeyCode::Char('b'), _) | (KeyCode::PageUp, _) => Some(Action::PageUp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn simple_key(code: KeyCode) -> KeyEvent {
        key(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key_event(simple_key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_key_event(simple_key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            map_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_plain_c_is_unbound() {
        assert_eq!(map_key_event(simple_key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_g_and_big_g() {
        assert_eq!(
            map_key_event(simple_key(KeyCode::Char('g'))),
            Some(Action::JumpToTop)
        );
        assert_eq!(
            map_key_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(Action::JumpToBottom)
        );
    }

    #[test]
    fn test_half_page_with_and_without_ctrl() {
        assert_eq!(
            map_key_event(key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(Action::HalfPageDown)
        );
        assert_eq!(
            map_key_event(simple_key(KeyCode::Char('u'))),
            Some(Action::HalfPageUp)
        );
    }

    #[test]
    fn test_page_keys() {
        assert_eq!(
            map_key_event(simple_key(KeyCode::Char(' '))),
            Some(Action::PageDown)
        );
        assert_eq!(map_key_event(simple_key(KeyCode::PageUp)), Some(Action::PageUp));
    }

    #[test]
    fn test_unknown_key_returns_none() {
        assert!(map_key_event(simple_key(KeyCode::Char('x'))).is_none());
        assert!(map_key_event(simple_key(KeyCode::F(1))).is_none());
    }
}
