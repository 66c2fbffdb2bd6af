//! Domain model types (pure).
//!
//! All types in this module are plain data shared by the engine and hosts.

pub mod identifiers;
pub mod key_action;
pub mod mode;
pub mod position;

// Re-export for convenience
pub use identifiers::{DecorationId, ViewId};
pub use key_action::KeyAction;
pub use mode::{AlignmentMode, InvalidMode};
pub use position::{Position, Selection, TextRange};
