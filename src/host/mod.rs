//! Host collaborator seam.
//!
//! The engine never owns views. It reads view geometry through [`SyncHost`]
//! and asks the host to scroll or decorate. Events flow the other way as
//! [`HostEvent`] values delivered serially to the coordinator.

mod buffer;

pub use buffer::{Buffer, BufferHost, FILE_SCHEME};

use crate::model::{DecorationId, Selection, TextRange, ViewId};

/// Where a revealed range should land in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealAlignment {
    /// Put the range's first line at the top of the view.
    Top,
    /// Center the range's first line vertically.
    Center,
}

/// Notifications a host delivers to the engine, one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Views were opened, closed, or rearranged.
    VisibleViewsChanged,
    /// A view scrolled. `range` is its new visible range.
    ViewportChanged {
        /// View that scrolled.
        view: ViewId,
        /// New visible range.
        range: TextRange,
    },
    /// A view's selections changed.
    SelectionChanged {
        /// View whose selection changed.
        view: ViewId,
        /// All current selections; the first is the primary one.
        selections: Vec<Selection>,
    },
    /// The persisted mode was changed outside the engine.
    ModeConfigChanged,
}

/// Read/act interface the engine needs from whatever displays the views.
///
/// Per-view data is read-only from the engine's side; the only mutations
/// are `reveal` and the decoration calls.
pub trait SyncHost {
    /// Visible views in display order.
    fn visible_views(&self) -> Vec<ViewId>;

    /// Kind of content a view shows (e.g. `file`, `output`). `None` for unknown views.
    fn view_scheme(&self, view: ViewId) -> Option<&str>;

    /// Current visible range of a view.
    fn visible_range(&self, view: ViewId) -> Option<TextRange>;

    /// Character length of `line`. Lines past the end of the document are empty.
    fn line_length(&self, view: ViewId, line: usize) -> usize;

    /// Text of `line` without its terminator.
    fn line_text(&self, view: ViewId, line: usize) -> Option<&str>;

    /// Current selections; the first is the primary one.
    fn selections(&self, view: ViewId) -> Vec<Selection>;

    /// Scroll `view` so `range` sits at `alignment`.
    fn reveal(&mut self, view: ViewId, range: TextRange, alignment: RevealAlignment);

    /// Attach (or replace) the ranges of `decoration` in `view`.
    fn set_highlight(&mut self, view: ViewId, decoration: DecorationId, ranges: &[TextRange]);

    /// Remove `decoration` from every view.
    fn dispose_decoration(&mut self, decoration: DecorationId);

    /// Literal text covered by `range`, with `\n` between lines.
    fn text_in_range(&self, view: ViewId, range: TextRange) -> String {
        let mut text = String::new();
        for line in range.start.line..=range.end.line {
            let Some(content) = self.line_text(view, line) else {
                break;
            };
            let from = if line == range.start.line {
                range.start.character
            } else {
                0
            };
            let to = if line == range.end.line {
                range.end.character
            } else {
                usize::MAX
            };
            text.extend(content.chars().skip(from).take(to.saturating_sub(from)));
            if line != range.end.line {
                text.push('\n');
            }
        }
        text
    }
}
