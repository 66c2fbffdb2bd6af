//! In-memory host: text buffers with scroll, cursor, and highlight state.
//!
//! User-facing operations (`scroll_by`, `move_cursor`, `open`, ...) queue the
//! same events a real editor would emit. `reveal` is the engine's own scroll
//! and also queues a viewport event, which is the feedback the coordinator
//! has to suppress.

use super::{HostEvent, RevealAlignment, SyncHost};
use crate::model::{DecorationId, Position, Selection, TextRange, ViewId};
use std::collections::{BTreeMap, VecDeque};

/// Scheme assigned to buffers opened from files.
pub const FILE_SCHEME: &str = "file";

/// One visible pane of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    id: ViewId,
    name: String,
    scheme: String,
    lines: Vec<String>,
    top: usize,
    height: usize,
    cursor: Position,
    anchor: Option<Position>,
    highlights: BTreeMap<DecorationId, Vec<TextRange>>,
    last_reveal: Option<TextRange>,
}

impl Buffer {
    fn new(id: ViewId, name: String, scheme: String, text: &str, height: usize) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            id,
            name,
            scheme,
            lines,
            top: 0,
            height: height.max(1),
            cursor: Position::default(),
            anchor: None,
            highlights: BTreeMap::new(),
            last_reveal: None,
        }
    }

    /// Host-assigned id.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Display name (usually the file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content kind.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// All lines. Never empty.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Char length of `line`, 0 past the end.
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    /// First visible line.
    pub fn top(&self) -> usize {
        self.top
    }

    /// Viewport height in lines.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Last visible line (inclusive).
    pub fn bottom(&self) -> usize {
        (self.top + self.height - 1).min(self.line_count() - 1).max(self.top)
    }

    /// Current visible range: start of the top line to end of the bottom line.
    pub fn visible_range(&self) -> TextRange {
        let bottom = self.bottom();
        TextRange::new(
            Position::line_start(self.top),
            Position::new(bottom, self.line_len(bottom)),
        )
    }

    /// Cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Primary selection.
    pub fn selection(&self) -> Selection {
        match self.anchor {
            Some(anchor) => Selection::new(anchor, self.cursor),
            None => Selection::cursor(self.cursor),
        }
    }

    /// Whether a selection anchor is set.
    pub fn has_anchor(&self) -> bool {
        self.anchor.is_some()
    }

    /// Live highlight ranges, across all decorations.
    pub fn highlights(&self) -> impl Iterator<Item = &TextRange> {
        self.highlights.values().flatten()
    }

    /// The last range the engine revealed here.
    pub fn last_reveal(&self) -> Option<TextRange> {
        self.last_reveal
    }

    fn max_top(&self) -> usize {
        self.line_count() - 1
    }

    fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count() - 1);
        Position::new(line, pos.character.min(self.line_len(line)))
    }

    fn set_top(&mut self, top: usize) -> bool {
        let top = top.min(self.max_top());
        let changed = top != self.top;
        self.top = top;
        changed
    }

    /// Scroll just enough to bring the cursor into view.
    fn follow_cursor(&mut self) -> bool {
        let line = self.cursor.line;
        if line < self.top {
            self.set_top(line)
        } else if line >= self.top + self.height {
            self.set_top(line + 1 - self.height)
        } else {
            false
        }
    }

    fn replace(&mut self, range: TextRange, text: &str) {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);

        let head: String = self.lines[start.line].chars().take(start.character).collect();
        let tail: String = self.lines[end.line].chars().skip(end.character).collect();
        let joined = format!("{head}{text}{tail}");
        let replacement: Vec<String> = joined.split('\n').map(str::to_string).collect();

        self.lines.splice(start.line..=end.line, replacement);
        self.cursor = self.clamp(self.cursor);
        self.anchor = self.anchor.map(|anchor| self.clamp(anchor));
        self.top = self.top.min(self.max_top());
    }
}

/// Host holding every visible buffer plus the queue of pending events.
#[derive(Debug, Clone, Default)]
pub struct BufferHost {
    buffers: Vec<Buffer>,
    next_id: u64,
    events: VecDeque<HostEvent>,
    default_height: usize,
}

impl BufferHost {
    /// Host whose new buffers show `viewport_height` lines.
    pub fn new(viewport_height: usize) -> Self {
        Self {
            buffers: Vec::new(),
            next_id: 1,
            events: VecDeque::new(),
            default_height: viewport_height.max(1),
        }
    }

    /// Open a file buffer at the end of the layout.
    pub fn open(&mut self, name: impl Into<String>, text: &str) -> ViewId {
        self.open_with_scheme(name, FILE_SCHEME, text)
    }

    /// Open a buffer with an explicit scheme (e.g. `output`).
    pub fn open_with_scheme(
        &mut self,
        name: impl Into<String>,
        scheme: impl Into<String>,
        text: &str,
    ) -> ViewId {
        let id = ViewId::new(self.next_id);
        self.next_id += 1;
        self.buffers.push(Buffer::new(
            id,
            name.into(),
            scheme.into(),
            text,
            self.default_height,
        ));
        self.events.push_back(HostEvent::VisibleViewsChanged);
        id
    }

    /// Close a buffer. Returns false if it was not open.
    pub fn close(&mut self, view: ViewId) -> bool {
        let before = self.buffers.len();
        self.buffers.retain(|buffer| buffer.id != view);
        let closed = self.buffers.len() != before;
        if closed {
            self.events.push_back(HostEvent::VisibleViewsChanged);
        }
        closed
    }

    /// Look up a buffer.
    pub fn buffer(&self, view: ViewId) -> Option<&Buffer> {
        self.buffers.iter().find(|buffer| buffer.id == view)
    }

    fn buffer_mut(&mut self, view: ViewId) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|buffer| buffer.id == view)
    }

    /// All buffers in display order.
    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    /// Resize every viewport. Does not emit events.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.default_height = height.max(1);
        for buffer in &mut self.buffers {
            buffer.height = self.default_height;
        }
    }

    /// User scroll by `delta` lines. Emits a viewport event if the view moved.
    pub fn scroll_by(&mut self, view: ViewId, delta: isize) -> bool {
        let Some(buffer) = self.buffer_mut(view) else {
            return false;
        };
        let target = buffer.top.saturating_add_signed(delta);
        self.scroll_to(view, target)
    }

    /// User scroll to put `line` at the top. Emits a viewport event if the view moved.
    pub fn scroll_to(&mut self, view: ViewId, line: usize) -> bool {
        let Some(buffer) = self.buffer_mut(view) else {
            return false;
        };
        if !buffer.set_top(line) {
            return false;
        }
        let range = buffer.visible_range();
        self.events
            .push_back(HostEvent::ViewportChanged { view, range });
        true
    }

    /// Move the cursor, keeping or clearing the anchor.
    ///
    /// Emits a selection event, plus a viewport event when the view had to
    /// scroll to keep the cursor visible.
    pub fn move_cursor(&mut self, view: ViewId, pos: Position) {
        let Some(buffer) = self.buffer_mut(view) else {
            return;
        };
        buffer.cursor = buffer.clamp(pos);
        let scrolled = buffer.follow_cursor();
        let range = buffer.visible_range();
        let selections = vec![buffer.selection()];

        self.events
            .push_back(HostEvent::SelectionChanged { view, selections });
        if scrolled {
            self.events
                .push_back(HostEvent::ViewportChanged { view, range });
        }
    }

    /// Replace the selection outright.
    pub fn set_selection(&mut self, view: ViewId, selection: Selection) {
        let Some(buffer) = self.buffer_mut(view) else {
            return;
        };
        let anchor = buffer.clamp(selection.anchor);
        let active = buffer.clamp(selection.active);
        buffer.anchor = (anchor != active).then_some(anchor);
        self.move_cursor(view, active);
    }

    /// Start a selection at the cursor, or drop the current one.
    pub fn toggle_anchor(&mut self, view: ViewId) {
        let Some(buffer) = self.buffer_mut(view) else {
            return;
        };
        buffer.anchor = match buffer.anchor {
            Some(_) => None,
            None => Some(buffer.cursor),
        };
        let selections = vec![buffer.selection()];
        self.events
            .push_back(HostEvent::SelectionChanged { view, selections });
    }

    /// Replace `range` in `view` with `text`.
    pub fn apply_edit(&mut self, view: ViewId, range: TextRange, text: &str) -> bool {
        match self.buffer_mut(view) {
            Some(buffer) => {
                buffer.replace(range, text);
                true
            }
            None => false,
        }
    }

    /// Queue an arbitrary event.
    pub fn push_event(&mut self, event: HostEvent) {
        self.events.push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        self.events.drain(..).collect()
    }

    /// Number of queued events.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl SyncHost for BufferHost {
    fn visible_views(&self) -> Vec<ViewId> {
        self.buffers.iter().map(Buffer::id).collect()
    }

    fn view_scheme(&self, view: ViewId) -> Option<&str> {
        self.buffer(view).map(Buffer::scheme)
    }

    fn visible_range(&self, view: ViewId) -> Option<TextRange> {
        self.buffer(view).map(Buffer::visible_range)
    }

    fn line_length(&self, view: ViewId, line: usize) -> usize {
        self.buffer(view).map_or(0, |buffer| buffer.line_len(line))
    }

    fn line_text(&self, view: ViewId, line: usize) -> Option<&str> {
        self.buffer(view)
            .and_then(|buffer| buffer.lines.get(line))
            .map(String::as_str)
    }

    fn selections(&self, view: ViewId) -> Vec<Selection> {
        self.buffer(view)
            .map(|buffer| vec![buffer.selection()])
            .unwrap_or_default()
    }

    fn reveal(&mut self, view: ViewId, range: TextRange, alignment: RevealAlignment) {
        let Some(buffer) = self.buffer_mut(view) else {
            return;
        };
        let line = range.start.line;
        let top = match alignment {
            RevealAlignment::Top => line,
            RevealAlignment::Center => line.saturating_sub(buffer.height / 2),
        };
        buffer.set_top(top);
        buffer.last_reveal = Some(range);
        let range = buffer.visible_range();
        // Reported even when the top line did not move.
        self.events
            .push_back(HostEvent::ViewportChanged { view, range });
    }

    fn set_highlight(&mut self, view: ViewId, decoration: DecorationId, ranges: &[TextRange]) {
        if let Some(buffer) = self.buffer_mut(view) {
            buffer.highlights.insert(decoration, ranges.to_vec());
        }
    }

    fn dispose_decoration(&mut self, decoration: DecorationId) {
        for buffer in &mut self.buffers {
            buffer.highlights.remove(&decoration);
        }
    }
}
