//! Presentation registry for the sync indicators.
//!
//! Built once at startup and owned by the coordinator. Front-ends read the
//! items to draw a status bar; nothing registers itself implicitly.

use super::mode::ModeState;

/// Which indicator an item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusItemKind {
    /// On/off indicator; activating it toggles sync.
    Toggle,
    /// Mode indicator; activating it opens the mode picker.
    Mode,
}

/// A single indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    /// Indicator kind.
    pub kind: StatusItemKind,
    /// Current label text.
    pub text: String,
    /// Tooltip naming the command the item triggers.
    pub tooltip: &'static str,
    /// Higher priority items sit further left.
    pub priority: u16,
}

/// All sync indicators, shown and hidden together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItems {
    items: Vec<StatusItem>,
    visible: bool,
}

impl Default for StatusItems {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusItems {
    /// Registry with the toggle and mode indicators, initially hidden.
    pub fn new() -> Self {
        Self {
            items: vec![
                StatusItem {
                    kind: StatusItemKind::Toggle,
                    text: String::new(),
                    tooltip: "Toggle Sync Scroll",
                    priority: 201,
                },
                StatusItem {
                    kind: StatusItemKind::Mode,
                    text: String::new(),
                    tooltip: "Change Sync Scroll Mode",
                    priority: 200,
                },
            ],
            visible: false,
        }
    }

    /// Re-derive every label from the mode state.
    pub fn refresh(&mut self, mode: &ModeState) {
        for item in &mut self.items {
            item.text = match item.kind {
                StatusItemKind::Toggle => mode.toggle_label(),
                StatusItemKind::Mode => mode.mode_label(),
            };
        }
    }

    /// Show or hide all indicators at once.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether the indicators are shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Look up an item by kind.
    pub fn get(&self, kind: StatusItemKind) -> Option<&StatusItem> {
        self.items.iter().find(|item| item.kind == kind)
    }

    /// Items to draw, highest priority first. Empty while hidden.
    pub fn shown(&self) -> Vec<&StatusItem> {
        if !self.visible {
            return Vec::new();
        }
        let mut items: Vec<&StatusItem> = self.items.iter().collect();
        items.sort_by(|a, b| b.priority.cmp(&a.priority));
        items
    }
}
