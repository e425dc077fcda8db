//! Key mapping for the finder prompt. Pure logic, no I/O.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderAction {
    Type(char),
    Backspace,
    ClearQuery,
    DeleteWord,
    SelectPrev,
    SelectNext,
    /// Toggle the highlighted candidate and move down.
    Toggle,
    Accept,
    Abort,
}

pub fn map_key_event(key: KeyEvent) -> Option<FinderAction> {
    let KeyEvent {
        code, modifiers, ..
    } = key;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(FinderAction::Abort),
            KeyCode::Char('u') => Some(FinderAction::ClearQuery),
            KeyCode::Char('w') | KeyCode::Backspace => Some(FinderAction::DeleteWord),
            KeyCode::Char('k') | KeyCode::Char('p') | KeyCode::Up => Some(FinderAction::SelectPrev),
            KeyCode::Char('j') | KeyCode::Char('n') | KeyCode::Down => {
                Some(FinderAction::SelectNext)
            }
            _ => None,
        };
    }

    match code {
        KeyCode::Esc => Some(FinderAction::Abort),
        KeyCode::Enter => Some(FinderAction::Accept),
        KeyCode::Tab => Some(FinderAction::Toggle),
        KeyCode::Backspace => Some(FinderAction::Backspace),
        KeyCode::Up => Some(FinderAction::SelectPrev),
        KeyCode::Down => Some(FinderAction::SelectNext),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::ALT) => Some(FinderAction::Type(c)),
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

    fn ctrl(c: char) -> KeyEvent {
        key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_printable_chars_type() {
        assert_eq!(
            map_key_event(simple_key(KeyCode::Char('q'))),
            Some(FinderAction::Type('q'))
        );
        assert_eq!(
            map_key_event(key(KeyCode::Char('B'), KeyModifiers::SHIFT)),
            Some(FinderAction::Type('B'))
        );
        assert_eq!(
            map_key_event(simple_key(KeyCode::Char('語'))),
            Some(FinderAction::Type('語'))
        );
    }

    #[test]
    fn test_abort_keys() {
        assert_eq!(map_key_event(simple_key(KeyCode::Esc)), Some(FinderAction::Abort));
        assert_eq!(map_key_event(ctrl('c')), Some(FinderAction::Abort));
        assert_eq!(map_key_event(ctrl('d')), Some(FinderAction::Abort));
    }

    #[test]
    fn test_navigation() {
        assert_eq!(map_key_event(ctrl('k')), Some(FinderAction::SelectPrev));
        assert_eq!(map_key_event(ctrl('p')), Some(FinderAction::SelectPrev));
        assert_eq!(map_key_event(ctrl('j')), Some(FinderAction::SelectNext));
        assert_eq!(map_key_event(ctrl('n')), Some(FinderAction::SelectNext));
        assert_eq!(
            map_key_event(simple_key(KeyCode::Down)),
            Some(FinderAction::SelectNext)
        );
    }

    #[test]
    fn test_query_editing() {
        assert_eq!(
            map_key_event(simple_key(KeyCode::Backspace)),
            Some(FinderAction::Backspace)
        );
        assert_eq!(map_key_event(ctrl('u')), Some(FinderAction::ClearQuery));
        assert_eq!(map_key_event(ctrl('w')), Some(FinderAction::DeleteWord));
    }

    #[test]
    fn test_accept_and_toggle() {
        assert_eq!(
            map_key_event(simple_key(KeyCode::Enter)),
            Some(FinderAction::Accept)
        );
        assert_eq!(map_key_event(simple_key(KeyCode::Tab)), Some(FinderAction::Toggle));
    }

    #[test]
    fn test_unknown_key_returns_none() {
        assert!(map_key_event(ctrl('z')).is_none());
        assert!(map_key_event(key(KeyCode::Char('x'), KeyModifiers::ALT)).is_none());
        assert!(map_key_event(simple_key(KeyCode::F(2))).is_none());
    }
}
