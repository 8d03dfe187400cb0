use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::KindFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    OpenEntry,
    CloseEntry,
    ScrollDetailDown,
    ScrollDetailUp,
    Reload,
    CycleFilter,
    SetFilter(KindFilter),
    ShowHelp,
    HideHelp,
    // Search input actions
    StartSearch,
    ClearSearch,
    SearchChar(char),
    SearchBackspace,
    SearchConfirm,
    SearchCancel,
}

/// What the keyboard is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMode {
    pub show_help: bool,
    pub search_active: bool,
    pub detail_open: bool,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode) -> Option<AppAction> {
    // If help is showing, any key closes it
    if mode.show_help {
        return Some(AppAction::HideHelp);
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    // Search input mode: every keystroke re-filters the list
    if mode.search_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::SearchConfirm),
            KeyCode::Esc => Some(AppAction::SearchCancel),
            KeyCode::Backspace => Some(AppAction::SearchBackspace),
            KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Up => Some(AppAction::MoveUp),
            KeyCode::Char(c) => Some(AppAction::SearchChar(c)),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Char('<'), _) | (KeyCode::Home, _) => Some(AppAction::MoveToTop),
        (KeyCode::Char('>'), _) | (KeyCode::End, _) => Some(AppAction::MoveToBottom),

        (KeyCode::Enter, _) => Some(AppAction::OpenEntry),
        (KeyCode::Esc, _) if mode.detail_open => Some(AppAction::CloseEntry),
        (KeyCode::Char('x'), _) => Some(AppAction::CloseEntry),
        (KeyCode::PageDown, _) | (KeyCode::Char(' '), _) => Some(AppAction::ScrollDetailDown),
        (KeyCode::PageUp, _) => Some(AppAction::ScrollDetailUp),

        (KeyCode::Char('r'), _) => Some(AppAction::Reload),
        (KeyCode::Char('f'), _) => Some(AppAction::CycleFilter),
        (KeyCode::Char('1'), _) => Some(AppAction::SetFilter(KindFilter::All)),
        (KeyCode::Char('2'), _) => Some(AppAction::SetFilter(KindFilter::Summary)),
        (KeyCode::Char('3'), _) => Some(AppAction::SetFilter(KindFilter::Novel)),

        (KeyCode::Char('/'), _) => Some(AppAction::StartSearch),
        (KeyCode::Char('c'), _) => Some(AppAction::ClearSearch),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORMAL: InputMode = InputMode {
        show_help: false,
        search_active: false,
        detail_open: false,
    };

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn help_swallows_any_key() {
        let mode = InputMode {
            show_help: true,
            ..NORMAL
        };
        assert_eq!(
            handle_key_event(press(KeyCode::Char('q')), mode),
            Some(AppAction::HideHelp)
        );
    }

    #[test]
    fn search_mode_types_letters() {
        let mode = InputMode {
            search_active: true,
            ..NORMAL
        };
        assert_eq!(
            handle_key_event(press(KeyCode::Char('q')), mode),
            Some(AppAction::SearchChar('q'))
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Esc), mode),
            Some(AppAction::SearchCancel)
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), mode),
            Some(AppAction::Quit)
        );
    }

    #[test]
    fn escape_closes_detail_only_when_open() {
        assert_eq!(handle_key_event(press(KeyCode::Esc), NORMAL), None);

        let mode = InputMode {
            detail_open: true,
            ..NORMAL
        };
        assert_eq!(
            handle_key_event(press(KeyCode::Esc), mode),
            Some(AppAction::CloseEntry)
        );
    }

    #[test]
    fn normal_mode_bindings() {
        assert_eq!(
            handle_key_event(press(KeyCode::Char('r')), NORMAL),
            Some(AppAction::Reload)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('3')), NORMAL),
            Some(AppAction::SetFilter(KindFilter::Novel))
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Enter), NORMAL),
            Some(AppAction::OpenEntry)
        );
    }
}
