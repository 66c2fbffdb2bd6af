//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Viewport scrolling (moves the view, not the cursor)
    /// Scroll the focused pane up one line. Default: k / Ctrl+y
    ScrollUp,
    /// Scroll the focused pane down one line. Default: j / Ctrl+e
    ScrollDown,
    /// Scroll up by one page height. Default: Ctrl+u / Page Up
    PageUp,
    /// Scroll down by one page height. Default: Ctrl+d / Page Down
    PageDown,
    /// Jump to the top of the document. Default: g / Home
    ScrollToTop,
    /// Jump to the bottom of the document. Default: G / End
    ScrollToBottom,

    // Cursor movement
    /// Move cursor up. Default: ↑
    CursorUp,
    /// Move cursor down. Default: ↓
    CursorDown,
    /// Move cursor left. Default: ←
    CursorLeft,
    /// Move cursor right. Default: →
    CursorRight,
    /// Start or clear a selection anchored at the cursor. Default: v
    ToggleSelection,

    // Panes
    /// Focus the next pane. Default: Tab
    FocusNext,
    /// Focus the previous pane. Default: Shift+Tab
    FocusPrev,
    /// Close the focused pane. Default: x
    ClosePane,

    // Sync commands
    /// Turn synchronization on or off. Default: s
    ToggleSync,
    /// Open the mode picker. Default: m
    PickMode,
    /// Move focus to the corresponding position in the next pane. Default: Space
    JumpToCorresponding,
    /// Copy the selection (or line) into every other pane. Default: c
    CopyToCorresponding,

    // Application
    /// Toggle the help overlay. Default: ?
    ToggleHelp,
    /// Quit. Default: q / Ctrl+c
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn actions_are_hashable() {
        let mut set = HashSet::new();
        set.insert(KeyAction::ToggleSync);
        set.insert(KeyAction::ToggleSync);
        set.insert(KeyAction::PickMode);
        assert_eq!(set.len(), 2);
    }
}
