//! Live leader/follower bookkeeping.

use crate::mapping::LineOffset;
use crate::model::ViewId;
use std::collections::{HashMap, HashSet};

/// Per-activation synchronization state.
///
/// # Invariants
/// - `leader` is a currently visible view or `None`
/// - `follower_offsets` is only populated in OFFSET mode
/// - the session is only ever cleared as a whole
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSession {
    leader: Option<ViewId>,
    follower_offsets: HashMap<ViewId, LineOffset>,
    suppressed: HashSet<ViewId>,
}

impl SyncSession {
    /// Idle session with no leader.
    pub fn new() -> Self {
        Self::default()
    }

    /// View currently driving the others.
    pub fn leader(&self) -> Option<ViewId> {
        self.leader
    }

    /// Make `view` the leader, discarding offsets captured for the old one.
    pub fn promote(&mut self, view: ViewId) {
        self.leader = Some(view);
        self.follower_offsets.clear();
    }

    /// Record a follower's line delta relative to the leader.
    pub fn set_offset(&mut self, follower: ViewId, offset: LineOffset) {
        self.follower_offsets.insert(follower, offset);
    }

    /// Captured delta for `follower`, if any.
    pub fn offset(&self, follower: ViewId) -> Option<LineOffset> {
        self.follower_offsets.get(&follower).copied()
    }

    /// All captured deltas.
    pub fn offsets(&self) -> &HashMap<ViewId, LineOffset> {
        &self.follower_offsets
    }

    /// Mark `view` as about to be scrolled by the engine.
    pub fn suppress(&mut self, view: ViewId) {
        self.suppressed.insert(view);
    }

    /// Consume the suppression flag. Returns true if `view` was suppressed.
    pub fn take_suppressed(&mut self, view: ViewId) -> bool {
        self.suppressed.remove(&view)
    }

    /// Whether `view` is waiting for its self-caused event.
    pub fn is_suppressed(&self, view: ViewId) -> bool {
        self.suppressed.contains(&view)
    }

    /// Number of views waiting for a self-caused event.
    pub fn suppressed_len(&self) -> usize {
        self.suppressed.len()
    }

    /// True when nothing is recorded.
    pub fn is_idle(&self) -> bool {
        self.leader.is_none() && self.follower_offsets.is_empty() && self.suppressed.is_empty()
    }

    /// Clear every field.
    pub fn clear(&mut self) {
        self.leader = None;
        self.follower_offsets.clear();
        self.suppressed.clear();
    }
}
