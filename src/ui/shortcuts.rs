//! Keyboard shortcut constants for consistent documentation.

use crate::ui::data::Mode;

pub const MOVE: &str = "↑/↓";
pub const JUMP: &str = "Home/End";
pub const APPLY_LOCAL: &str = "enter/l";
pub const APPLY_GLOBAL: &str = "g";
pub const ADD: &str = "a";
pub const EDIT: &str = "e";
pub const DELETE: &str = "del";
pub const FILTER: &str = "/";
pub const CLEAR: &str = "esc";
pub const HELP: &str = "?";
pub const QUIT: &str = "q";

// Forms
pub const NEXT_OR_SAVE: &str = "enter";
pub const SWITCH_FIELD: &str = "tab";
pub const CANCEL: &str = "esc";
pub const FORCE_QUIT: &str = "ctrl+c";

/// Status line shown for `?`.
pub fn help_status() -> String {
    format!(
        "keys: {ADD} add • {APPLY_GLOBAL} set global • l set local • {FILTER} filter • {DELETE} delete • {EDIT} edit • enter=set local"
    )
}

/// Context-sensitive key legend for the footer.
pub fn footer_legend(mode: &Mode) -> String {
    match mode {
        Mode::Browse { filtering: true } => format!(
            "type to filter • {MOVE} move • enter apply filter • {CLEAR} clear • {FORCE_QUIT} quit"
        ),
        Mode::Browse { filtering: false } => format!(
            "keys: {MOVE} move • {APPLY_LOCAL}: set local • {APPLY_GLOBAL}: set global • {ADD}: add • {EDIT}: edit • {DELETE}: delete • {FILTER}: filter • {CLEAR}: clear • {JUMP} • {HELP}: help • {QUIT}: quit"
        ),
        Mode::AddForm { .. } | Mode::EditForm { .. } => format!(
            "{NEXT_OR_SAVE}: next/save • {SWITCH_FIELD}: switch field • {CANCEL}: cancel • {FORCE_QUIT}: quit"
        ),
    }
}
