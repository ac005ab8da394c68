//! Key bindings.
//!
//! | Key | Input |
//! |-----|-------|
//! | `Up` / `k` | [`Input::Up`] |
//! | `Down` / `j` | [`Input::Down`] |
//! | `Enter` | [`Input::Confirm`] |
//! | `q` / `Ctrl+C` | [`Input::Quit`] |

use crate::ui::app::Input;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Decode a key event. Releases, repeats and unbound keys map to `None`.
pub fn map_key(key: &KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let has_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if has_ctrl => Some(Input::Quit),
        KeyCode::Char('q') if !has_ctrl => Some(Input::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Input::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Input::Down),
        KeyCode::Enter => Some(Input::Confirm),
        _ => None,
    }
}
