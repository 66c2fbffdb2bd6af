//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while applying `[keybindings]` overrides.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyBindingError {
    /// The `[keybindings]` value is not a table.
    #[error("[keybindings] must be a table of action = \"key\" pairs")]
    NotATable,

    /// The action name is not recognised.
    #[error("Unknown key action: {0}")]
    UnknownAction(String),

    /// The key description could not be parsed.
    #[error("Invalid key for {action}: {key:?}")]
    InvalidKey {
        /// Action the key was meant for.
        action: String,
        /// Raw key description.
        key: String,
    },
}

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings with option to override via configuration.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(key, action);
    }

    /// Defaults plus the overrides from a `[keybindings]` TOML table.
    ///
    /// Each entry is `action_name = "key"`, for example `toggle_sync = "ctrl+s"`.
    /// Overrides add bindings; defaults for the same action stay active.
    ///
    /// # Errors
    ///
    /// Returns an error for non-table input, unknown actions or unparseable keys.
    pub fn with_overrides(overrides: &toml::Value) -> Result<Self, KeyBindingError> {
        let table = overrides.as_table().ok_or(KeyBindingError::NotATable)?;
        let mut bindings = Self::default();

        for (name, value) in table {
            let action = parse_action(name)
                .ok_or_else(|| KeyBindingError::UnknownAction(name.clone()))?;
            let raw = value.as_str().unwrap_or_default();
            let key = parse_key(raw).ok_or_else(|| KeyBindingError::InvalidKey {
                action: name.clone(),
                key: raw.to_string(),
            })?;
            bindings.bind(key, action);
        }

        Ok(bindings)
    }
}

fn parse_action(name: &str) -> Option<KeyAction> {
    let action = match name {
        "scroll_up" => KeyAction::ScrollUp,
        "scroll_down" => KeyAction::ScrollDown,
        "page_up" => KeyAction::PageUp,
        "page_down" => KeyAction::PageDown,
        "scroll_to_top" => KeyAction::ScrollToTop,
        "scroll_to_bottom" => KeyAction::ScrollToBottom,
        "cursor_up" => KeyAction::CursorUp,
        "cursor_down" => KeyAction::CursorDown,
        "cursor_left" => KeyAction::CursorLeft,
        "cursor_right" => KeyAction::CursorRight,
        "toggle_selection" => KeyAction::ToggleSelection,
        "focus_next" => KeyAction::FocusNext,
        "focus_prev" => KeyAction::FocusPrev,
        "close_pane" => KeyAction::ClosePane,
        "toggle_sync" => KeyAction::ToggleSync,
        "pick_mode" => KeyAction::PickMode,
        "jump_to_corresponding" => KeyAction::JumpToCorresponding,
        "copy_to_corresponding" => KeyAction::CopyToCorresponding,
        "toggle_help" => KeyAction::ToggleHelp,
        "quit" => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Parse `"ctrl+s"`, `"shift+tab"`, `"pagedown"`, `"x"` and similar.
fn parse_key(raw: &str) -> Option<KeyEvent> {
    let mut modifiers = KeyModifiers::NONE;
    let mut parts: Vec<&str> = raw.split('+').map(str::trim).collect();
    let key = parts.pop().filter(|k| !k.is_empty())?;

    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match key.to_ascii_lowercase().as_str() {
        "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
        "tab" => KeyCode::Tab,
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            let mut chars = key.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if c.is_ascii_uppercase() {
                modifiers |= KeyModifiers::SHIFT;
            }
            KeyCode::Char(c)
        }
    };

    Some(KeyEvent::new(code, modifiers))
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        // Vim-style scrolling
        bindings.insert(
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE),
            KeyAction::ScrollDown,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE),
            KeyAction::ScrollUp,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL),
            KeyAction::ScrollDown,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL),
            KeyAction::ScrollUp,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE),
            KeyAction::ScrollToTop,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Home, KeyModifiers::NONE),
            KeyAction::ScrollToTop,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT),
            KeyAction::ScrollToBottom,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::End, KeyModifiers::NONE),
            KeyAction::ScrollToBottom,
        );

        // Page navigation
        bindings.insert(
            KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL),
            KeyAction::PageDown,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            KeyAction::PageUp,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE),
            KeyAction::PageDown,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE),
            KeyAction::PageUp,
        );

        // Cursor
        bindings.insert(
            KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
            KeyAction::CursorUp,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            KeyAction::CursorDown,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Left, KeyModifiers::NONE),
            KeyAction::CursorLeft,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Right, KeyModifiers::NONE),
            KeyAction::CursorRight,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('v'), KeyModifiers::NONE),
            KeyAction::ToggleSelection,
        );

        // Panes
        bindings.insert(
            KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE),
            KeyAction::FocusNext,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            KeyAction::FocusPrev,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE),
            KeyAction::ClosePane,
        );

        // Sync
        bindings.insert(
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE),
            KeyAction::ToggleSync,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE),
            KeyAction::PickMode,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE),
            KeyAction::JumpToCorresponding,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE),
            KeyAction::CopyToCorresponding,
        );

        // Application controls
        bindings.insert(
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyAction::Quit,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyAction::Quit,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE),
            KeyAction::ToggleHelp,
        );

        Self { bindings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_map_s_to_toggle_sync() {
        let bindings = KeyBindings::default();
        let key_event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);

        assert_eq!(
            bindings.get(key_event),
            Some(KeyAction::ToggleSync),
            "Lowercase 's' should map to ToggleSync"
        );
    }

    #[test]
    fn default_bindings_distinguish_c_and_ctrl_c() {
        let bindings = KeyBindings::default();

        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(KeyAction::CopyToCorresponding)
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn overrides_add_bindings_without_dropping_defaults() {
        let overrides: toml::Value = toml::from_str(
            r#"
toggle_sync = "ctrl+t"
jump_to_corresponding = "J"
"#,
        )
        .unwrap();

        let bindings = KeyBindings::with_overrides(&overrides).unwrap();

        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL)),
            Some(KeyAction::ToggleSync)
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT)),
            Some(KeyAction::JumpToCorresponding)
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)),
            Some(KeyAction::ToggleSync),
            "default binding should survive an override"
        );
    }

    #[test]
    fn overrides_parse_named_keys() {
        let overrides: toml::Value =
            toml::from_str("focus_prev = \"shift+tab\"\npage_down = \"pagedown\"").unwrap();

        let bindings = KeyBindings::with_overrides(&overrides).unwrap();
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(KeyAction::FocusPrev)
        );
    }

    #[test]
    fn overrides_reject_unknown_action() {
        let overrides: toml::Value = toml::from_str("teleport = \"t\"").unwrap();

        assert_eq!(
            KeyBindings::with_overrides(&overrides).unwrap_err(),
            KeyBindingError::UnknownAction("teleport".to_string())
        );
    }

    #[test]
    fn overrides_reject_bad_key() {
        let overrides: toml::Value = toml::from_str("quit = \"hyper+q\"").unwrap();

        assert!(matches!(
            KeyBindings::with_overrides(&overrides),
            Err(KeyBindingError::InvalidKey { .. })
        ));
    }

    #[test]
    fn overrides_require_a_table() {
        assert_eq!(
            KeyBindings::with_overrides(&toml::Value::Integer(3)).unwrap_err(),
            KeyBindingError::NotATable
        );
    }
}
