use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;

/// Map a crossterm terminal event to a TUI action.
///
/// While `editing` the search box, printable keys are text, not commands.
pub fn map_event(event: &Event, editing: bool) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if editing {
                map_editing_key(key)
            } else {
                map_key(key)
            }
        }
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

fn map_editing_key(key: &KeyEvent) -> Action {
    if is_ctrl(key, 'c') {
        return Action::Quit;
    }
    if is_ctrl(key, 'u') {
        return Action::ClearInput;
    }

    match key.code {
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Backspace => Action::DeleteChar,
        KeyCode::Char(c) => Action::InsertChar(c),
        _ => Action::None,
    }
}

fn map_key(key: &KeyEvent) -> Action {
    // Ctrl+C always quits
    if is_ctrl(key, 'c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('/') | KeyCode::Char('i') => Action::FocusSearch,
        KeyCode::Char('x') => Action::CancelSearch,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Char('g') => Action::GoTop,
        KeyCode::Char('G') => Action::GoBottom,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Home => Action::GoTop,
        KeyCode::End => Action::GoBottom,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn letters_are_text_while_editing() {
        assert_eq!(map_event(&press(KeyCode::Char('q')), true), Action::InsertChar('q'));
        assert_eq!(map_event(&press(KeyCode::Char('x')), true), Action::InsertChar('x'));
        assert_eq!(map_event(&press(KeyCode::Enter), true), Action::Submit);
        assert_eq!(map_event(&press(KeyCode::Backspace), true), Action::DeleteChar);
        assert_eq!(map_event(&ctrl('u'), true), Action::ClearInput);
    }

    #[test]
    fn letters_are_commands_otherwise() {
        assert_eq!(map_event(&press(KeyCode::Char('q')), false), Action::Quit);
        assert_eq!(map_event(&press(KeyCode::Char('x')), false), Action::CancelSearch);
        assert_eq!(map_event(&press(KeyCode::Char('/')), false), Action::FocusSearch);
        assert_eq!(map_event(&press(KeyCode::Enter), false), Action::DrillIn);
        assert_eq!(map_event(&ctrl('u'), false), Action::PageUp);
    }

    #[test]
    fn ctrl_c_quits_in_both_modes() {
        assert_eq!(map_event(&ctrl('c'), true), Action::Quit);
        assert_eq!(map_event(&ctrl('c'), false), Action::Quit);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_event(&Event::Key(key), false), Action::None);
    }
}
