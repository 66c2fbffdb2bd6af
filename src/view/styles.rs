//! Pane and overlay styling.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ===== PaneStyles =====

/// Styles for pane chrome and text decorations.
///
/// Without colors, decorations fall back to modifiers so selections and
/// mirrored highlights stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneStyles {
    /// Border of the focused pane.
    pub focused_border: Style,
    /// Border of every other pane.
    pub border: Style,
    /// Title marker for the current leader.
    pub leader_marker: Style,
    /// Line-number gutter.
    pub gutter: Style,
    /// The pane's own selection.
    pub selection: Style,
    /// Selections mirrored from the leader.
    pub mirrored: Style,
    /// Cursor cell in the focused pane.
    pub cursor: Style,
    /// Status bar background.
    pub status_bar: Style,
    /// Transient command feedback in the status bar.
    pub message: Style,
}

impl PaneStyles {
    /// Styles honouring the color configuration.
    pub fn new(colors: ColorConfig) -> Self {
        if colors.colors_enabled() {
            Self {
                focused_border: Style::default().fg(Color::Cyan),
                border: Style::default().fg(Color::DarkGray),
                leader_marker: Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                gutter: Style::default().fg(Color::DarkGray),
                selection: Style::default().bg(Color::Blue).fg(Color::White),
                mirrored: Style::default().bg(Color::Rgb(90, 80, 20)),
                cursor: Style::default().add_modifier(Modifier::REVERSED),
                status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
                message: Style::default().fg(Color::Yellow),
            }
        } else {
            Self {
                focused_border: Style::default().add_modifier(Modifier::BOLD),
                border: Style::default(),
                leader_marker: Style::default().add_modifier(Modifier::BOLD),
                gutter: Style::default().add_modifier(Modifier::DIM),
                selection: Style::default().add_modifier(Modifier::REVERSED),
                mirrored: Style::default().add_modifier(Modifier::UNDERLINED),
                cursor: Style::default().add_modifier(Modifier::REVERSED),
                status_bar: Style::default().add_modifier(Modifier::REVERSED),
                message: Style::default().add_modifier(Modifier::BOLD),
            }
        }
    }
}

impl Default for PaneStyles {
    fn default() -> Self {
        Self::new(ColorConfig::default())
    }
}

/// Section header in overlays.
pub const SECTION_HEADER: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Muted hint text.
pub const MUTED_TEXT: Style = Style::new().fg(Color::DarkGray);
