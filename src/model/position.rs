//! Text coordinates shared by the engine and its hosts.
//!
//! All coordinates are zero-based. `character` counts chars, not bytes or
//! display columns.

/// A point in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based character index within the line.
    pub character: usize,
}

impl Position {
    /// Create a position.
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// Start of the given line.
    pub fn line_start(line: usize) -> Self {
        Self { line, character: 0 }
    }
}

/// A half-open span between two positions.
///
/// # Invariants
/// - `start <= end` for ranges built with [`TextRange::new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl TextRange {
    /// Create a range, swapping the endpoints if they arrive reversed.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Zero-width range at `pos`.
    pub fn empty(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// True when start and end coincide.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `pos` lies within `[start, end)`.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// A selection: `anchor` is where it started, `active` is the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    /// Fixed end of the selection.
    pub anchor: Position,
    /// Moving end of the selection (the cursor).
    pub active: Position,
}

impl Selection {
    /// Create a selection from anchor to cursor.
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// A bare cursor with nothing selected.
    pub fn cursor(pos: Position) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    /// True when anchor and cursor coincide.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Normalised range, `start <= end`.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor, self.active)
    }
}
