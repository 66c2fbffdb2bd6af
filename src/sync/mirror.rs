//! Selection mirroring and cross-view copy targets.
//!
//! Thin layer over the position mapper. The coordinator owns the only
//! stateful piece (the live highlight handle).

use crate::mapping::{map_exact_range, map_position, offset_line, LineOffset};
use crate::model::{Position, Selection, TextRange, ViewId};

/// Ranges to highlight in a follower for the leader's selections.
pub fn mirror_selections<S, T>(
    selections: &[Selection],
    offset: LineOffset,
    source_len: S,
    target_len: T,
) -> Vec<TextRange>
where
    S: Fn(usize) -> usize,
    T: Fn(usize) -> usize,
{
    selections
        .iter()
        .map(|selection| map_exact_range(selection.range(), offset, &source_len, &target_len))
        .collect()
}

/// Where a jump lands in the target view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpLocation {
    /// Single cursor: move it here.
    Position(Position),
    /// Non-empty selection: select this range.
    Range(TextRange),
}

/// Result of a jump-to-corresponding-position command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTarget {
    /// View to focus.
    pub view: ViewId,
    /// Where to put the cursor or selection.
    pub location: JumpLocation,
}

/// Map the primary selection for a jump.
pub fn jump_location<S, T>(
    selection: Selection,
    offset: LineOffset,
    source_len: S,
    target_len: T,
) -> JumpLocation
where
    S: Fn(usize) -> usize,
    T: Fn(usize) -> usize,
{
    if selection.is_empty() {
        JumpLocation::Position(map_position(selection.active, offset, source_len, target_len))
    } else {
        JumpLocation::Range(map_exact_range(
            selection.range(),
            offset,
            source_len,
            target_len,
        ))
    }
}

/// One insertion the host should perform for a copy command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEdit {
    /// View to edit.
    pub view: ViewId,
    /// Range to replace. Empty for pure insertions.
    pub range: TextRange,
    /// Literal text to insert.
    pub text: String,
}

/// Target range for copying an empty selection: the whole source line is
/// inserted above the corresponding line.
pub fn whole_line_target(line: usize, offset: LineOffset) -> TextRange {
    TextRange::empty(Position::line_start(offset_line(line, offset)))
}
