//! Mode, presentation, and visibility state (pure).
//!
//! All state transitions are plain functions testable without a host.

pub mod mode;
pub mod status;
pub mod visibility;

// Re-export for convenience
pub use mode::{ModeState, ModeTransition, KEY_IS_ON, KEY_MODE, KEY_REMEMBER_TOGGLE_STATE};
pub use status::{StatusItem, StatusItemKind, StatusItems};
pub use visibility::{has_multiple_views, VisibilityChange, VisibilityTracker};
