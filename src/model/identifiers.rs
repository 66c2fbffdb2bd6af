//! Identifier newtypes handed out by the host-binding layer.
//!
//! Views are never compared by reference. Every map or set the engine keeps
//! is keyed by the integer id the host assigned when the view was opened.

use std::fmt;

/// Stable identity of a visible view (pane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(u64);

impl ViewId {
    /// Wrap a raw host-assigned id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Handle of a cross-view highlight decoration.
///
/// The coordinator allocates these; the host only stores and disposes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationId(u64);

impl DecorationId {
    /// Wrap a raw decoration id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id following this one.
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for DecorationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decoration#{}", self.0)
    }
}
