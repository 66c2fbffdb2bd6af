//! Layout dimension constants for TUI rendering.

use std::time::Duration;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Lines taken by a pane's top and bottom border.
pub const PANE_BORDER_HEIGHT: u16 = 2;

/// Width percentage for help overlay popup.
pub const HELP_POPUP_WIDTH_PERCENT: u16 = 70;

/// Height percentage for help overlay popup.
pub const HELP_POPUP_HEIGHT_PERCENT: u16 = 80;

/// Width of the mode picker in columns.
pub const MODE_PICKER_WIDTH: u16 = 60;

/// How long the event loop blocks when no sync pass is pending.
///
/// A pending pass shortens the wait to its deadline.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Separator between status bar segments.
pub const STATUS_SEPARATOR: &str = " │ ";
