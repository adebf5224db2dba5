//! Key press → [`Action`] decoding, per mode.

use crate::model::types::Scope;
use crate::ui::data::Mode;
use crate::ui::session::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn action_for_key(mode: &Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        Mode::Browse { filtering: true } => filtering_action(key, ctrl),
        Mode::Browse { filtering: false } => browse_action(key, ctrl),
        Mode::AddForm { .. } | Mode::EditForm { .. } => form_action(key, ctrl),
    }
}

fn filtering_action(key: KeyEvent, ctrl: bool) -> Option<Action> {
    match key.code {
        KeyCode::Char(c) if !ctrl => Some(Action::FilterInput(c)),
        KeyCode::Backspace => Some(Action::FilterBackspace),
        KeyCode::Enter => Some(Action::CommitFilter),
        KeyCode::Esc => Some(Action::ClearFilter),
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        _ => None,
    }
}

fn browse_action(key: KeyEvent, ctrl: bool) -> Option<Action> {
    if ctrl {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::Help,
        KeyCode::Char('/') => Action::StartFilter,
        KeyCode::Esc => Action::ClearFilter,
        KeyCode::Char('a') => Action::Add,
        KeyCode::Char('e') => Action::Edit,
        KeyCode::Delete | KeyCode::Backspace => Action::Delete,
        KeyCode::Char('g') => Action::Apply(Scope::Global),
        KeyCode::Char('l') | KeyCode::Enter => Action::Apply(Scope::Local),
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Home => Action::MoveFirst,
        KeyCode::End => Action::MoveLast,
        _ => return None,
    };
    Some(action)
}

fn form_action(key: KeyEvent, ctrl: bool) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PrevField),
        KeyCode::Backspace => Some(Action::FormBackspace),
        KeyCode::Char(c) if !ctrl => Some(Action::FormInput(c)),
        _ => None,
    }
}
