//! The synchronization engine.
//!
//! Event flow: a viewport change in an eligible view either consumes a
//! pending self-feedback flag, or (re)establishes the leader and schedules a
//! debounced corrective pass. The pass fires from [`SyncCoordinator::tick`]
//! and is the only place followers get scrolled.

use super::debounce::Debouncer;
use super::mirror::{
    jump_location, mirror_selections, whole_line_target, CopyEdit, JumpTarget,
};
use super::session::SyncSession;
use crate::host::{HostEvent, RevealAlignment, SyncHost};
use crate::mapping::{map_exact_range, map_range, LineOffset};
use crate::model::{AlignmentMode, DecorationId, Selection, TextRange, ViewId};
use crate::state::{ModeState, ModeTransition, StatusItems, VisibilityTracker};
use crate::store::StateStore;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Decides which views take part in synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityPolicy {
    excluded_schemes: Vec<String>,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self::new(["output", "debug"])
    }
}

impl EligibilityPolicy {
    /// Exclude views whose scheme is in `excluded_schemes`.
    pub fn new<I, S>(excluded_schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_schemes: excluded_schemes.into_iter().map(Into::into).collect(),
        }
    }

    /// Unknown views (no scheme) are never eligible.
    pub fn allows(&self, scheme: Option<&str>) -> bool {
        scheme.is_some_and(|scheme| !self.excluded_schemes.iter().any(|s| s == scheme))
    }
}

/// Engine tuning, normally derived from the resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Mode used when no persisted state applies.
    pub default_mode: AlignmentMode,
    /// Restore the persisted on/off state at startup.
    pub remember_toggle_state: bool,
    /// Coalescing window for viewport bursts.
    pub debounce: Duration,
    /// Mirror the leader's selections into followers.
    pub highlight_selections: bool,
    /// Which views participate.
    pub eligibility: EligibilityPolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            default_mode: AlignmentMode::Normal,
            remember_toggle_state: true,
            debounce: Duration::ZERO,
            highlight_selections: true,
            eligibility: EligibilityPolicy::default(),
        }
    }
}

/// Corrective pass waiting for the debounce window to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSync {
    /// Leader whose scroll triggered the pass.
    pub source: ViewId,
    /// Leader's visible range from the newest event in the burst.
    pub range: TextRange,
}

/// Owns all live synchronization state.
#[derive(Debug)]
pub struct SyncCoordinator {
    session: SyncSession,
    pending: Debouncer<PendingSync>,
    mode: ModeState,
    visibility: VisibilityTracker,
    status: StatusItems,
    eligibility: EligibilityPolicy,
    highlight_selections: bool,
    highlight: Option<DecorationId>,
    next_decoration: DecorationId,
}

impl SyncCoordinator {
    /// Build a coordinator and restore persisted mode state from `store`.
    pub fn new(store: Box<dyn StateStore>, options: SyncOptions) -> Self {
        let mut mode = ModeState::new(store);
        let transition = mode.init(options.default_mode, options.remember_toggle_state);
        debug!(mode = %transition.to, "Sync coordinator initialised");

        let mut status = StatusItems::new();
        status.refresh(&mode);

        Self {
            session: SyncSession::new(),
            pending: Debouncer::new(options.debounce),
            mode,
            visibility: VisibilityTracker::new(),
            status,
            eligibility: options.eligibility,
            highlight_selections: options.highlight_selections,
            highlight: None,
            next_decoration: DecorationId::new(1),
        }
    }

    // ===== Queries =====

    /// Live session state.
    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    /// Current leader, if any.
    pub fn leader(&self) -> Option<ViewId> {
        self.session.leader()
    }

    /// Pending corrective pass, if any.
    pub fn pending(&self) -> Option<&PendingSync> {
        self.pending.pending()
    }

    /// When the pending pass becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Mode state (read-only).
    pub fn mode_state(&self) -> &ModeState {
        &self.mode
    }

    /// Presentation registry for status bars.
    pub fn status_items(&self) -> &StatusItems {
        &self.status
    }

    /// Live highlight handle.
    pub fn highlight(&self) -> Option<DecorationId> {
        self.highlight
    }

    /// At least two views are visible.
    pub fn has_multiple_views(&self) -> bool {
        self.visibility.has_multiple_views()
    }

    /// Effective mode.
    pub fn mode(&self) -> AlignmentMode {
        self.mode.mode()
    }

    /// Engine disabled.
    pub fn is_off(&self) -> bool {
        self.mode.is_off()
    }

    /// NORMAL alignment active.
    pub fn is_normal_mode(&self) -> bool {
        self.mode.is_normal_mode()
    }

    /// OFFSET alignment active.
    pub fn is_offset_mode(&self) -> bool {
        self.mode.is_offset_mode()
    }

    /// Label such as `Sync Scroll: NORMAL`.
    pub fn current_presentation_label(&self) -> String {
        self.mode.label()
    }

    /// Sync is structurally possible and switched on.
    pub fn is_active(&self) -> bool {
        self.visibility.has_multiple_views() && !self.mode.is_off()
    }

    /// Whether `view` is visible and not excluded.
    pub fn is_eligible<H: SyncHost + ?Sized>(&self, host: &H, view: ViewId) -> bool {
        self.visibility.contains(view) && self.eligibility.allows(host.view_scheme(view))
    }

    // ===== Host events =====

    /// Dispatch one host event.
    pub fn handle_event<H: SyncHost + ?Sized>(&mut self, host: &mut H, event: HostEvent, now: Instant) {
        match event {
            HostEvent::VisibleViewsChanged => self.on_visible_views_changed(host),
            HostEvent::ViewportChanged { view, range } => {
                self.on_viewport_changed(host, view, range, now)
            }
            HostEvent::SelectionChanged { view, selections } => {
                self.on_selection_changed(host, view, &selections)
            }
            HostEvent::ModeConfigChanged => self.on_mode_config_changed(host),
        }
    }

    /// Re-read the visible views. Any change to the set resets the session.
    pub fn on_visible_views_changed<H: SyncHost + ?Sized>(&mut self, host: &mut H) {
        let change = self.visibility.update(host.visible_views());
        self.status.set_visible(self.visibility.has_multiple_views());
        if change.flipped {
            debug!(
                multiple = self.visibility.has_multiple_views(),
                "Sync availability changed"
            );
        }
        if change.views_changed {
            self.reset(host);
        }
    }

    /// A view scrolled.
    pub fn on_viewport_changed<H: SyncHost + ?Sized>(
        &mut self,
        host: &mut H,
        source: ViewId,
        range: TextRange,
        now: Instant,
    ) {
        if !self.is_active() || !self.is_eligible(host, source) {
            return;
        }

        if self.session.take_suppressed(source) {
            trace!(view = %source, "Ignoring self-caused viewport change");
            return;
        }

        if self.session.leader() != Some(source) {
            self.promote(host, source, range);
        }

        if self.pending.schedule(now, PendingSync { source, range }) {
            trace!(view = %source, "Coalesced viewport change into pending sync");
        }
    }

    /// A view's selections changed: re-mirror them into every follower.
    pub fn on_selection_changed<H: SyncHost + ?Sized>(
        &mut self,
        host: &mut H,
        source: ViewId,
        selections: &[Selection],
    ) {
        if !self.is_active() || !self.highlight_selections || !self.is_eligible(host, source) {
            return;
        }

        self.clear_highlight(host);
        if selections.is_empty() {
            return;
        }

        let decoration = self.next_decoration;
        self.next_decoration = decoration.next();

        for follower in self.followers(host, source) {
            let offset = self.offset_between(source, follower);
            let ranges = mirror_selections(
                selections,
                offset,
                |line| host.line_length(source, line),
                |line| host.line_length(follower, line),
            );
            host.set_highlight(follower, decoration, &ranges);
        }
        self.highlight = Some(decoration);
    }

    /// The persisted mode changed outside the engine.
    pub fn on_mode_config_changed<H: SyncHost + ?Sized>(&mut self, host: &mut H) {
        self.status.refresh(&self.mode);
        self.reset(host);
    }

    /// Fire the pending pass if it is due. Returns the number of followers revealed.
    pub fn tick<H: SyncHost + ?Sized>(&mut self, host: &mut H, now: Instant) -> usize {
        let Some(pending) = self.pending.take_due(now) else {
            return 0;
        };
        if !self.is_active() {
            return 0;
        }
        self.apply(host, pending)
    }

    // ===== Commands =====

    /// Switch sync on or off.
    pub fn toggle<H: SyncHost + ?Sized>(&mut self, host: &mut H) -> ModeTransition {
        let transition = self.mode.toggle();
        self.after_transition(host, transition)
    }

    /// Set the alignment mode.
    pub fn set_mode<H: SyncHost + ?Sized>(&mut self, host: &mut H, mode: AlignmentMode) -> ModeTransition {
        let transition = self.mode.set_mode(mode);
        self.after_transition(host, transition)
    }

    /// Apply an interactive mode pick. `None` (dismissed) changes nothing.
    pub fn pick_mode<H: SyncHost + ?Sized>(
        &mut self,
        host: &mut H,
        picked: Option<AlignmentMode>,
    ) -> Option<ModeTransition> {
        let transition = self.mode.pick_mode(picked)?;
        Some(self.after_transition(host, transition))
    }

    /// Map `source`'s primary selection into the next eligible view.
    pub fn jump_to_next_corresponding_position<H: SyncHost + ?Sized>(
        &self,
        host: &H,
        source: ViewId,
    ) -> Option<JumpTarget> {
        if !self.has_multiple_views() {
            return None;
        }
        let target = self.next_view(host, source)?;
        let selection = host.selections(source).into_iter().next()?;
        let offset = self.offset_between(source, target);
        let location = jump_location(
            selection,
            offset,
            |line| host.line_length(source, line),
            |line| host.line_length(target, line),
        );
        Some(JumpTarget {
            view: target,
            location,
        })
    }

    /// Edits that copy each of `source`'s selections into every other eligible view.
    ///
    /// Empty selections copy their whole line, inserted above the corresponding line.
    pub fn copy_to_all_corresponding_positions<H: SyncHost + ?Sized>(
        &self,
        host: &H,
        source: ViewId,
    ) -> Vec<CopyEdit> {
        if !self.has_multiple_views() || !self.is_eligible(host, source) {
            return Vec::new();
        }

        let followers = self.followers(host, source);
        let mut edits = Vec::new();
        for selection in host.selections(source) {
            let text = if selection.is_empty() {
                let line = selection.active.line;
                format!("{}\n", host.line_text(source, line).unwrap_or_default())
            } else {
                host.text_in_range(source, selection.range())
            };

            for &follower in &followers {
                let offset = self.offset_between(source, follower);
                let range = if selection.is_empty() {
                    whole_line_target(selection.active.line, offset)
                } else {
                    map_exact_range(
                        selection.range(),
                        offset,
                        |line| host.line_length(source, line),
                        |line| host.line_length(follower, line),
                    )
                };
                edits.push(CopyEdit {
                    view: follower,
                    range,
                    text: text.clone(),
                });
            }
        }
        edits
    }

    /// Clear all session state, cancel the pending pass, and drop the highlight.
    pub fn reset<H: SyncHost + ?Sized>(&mut self, host: &mut H) {
        if self.pending.cancel().is_some() {
            debug!("Cancelled pending sync");
        }
        self.session.clear();
        self.clear_highlight(host);
        trace!("Sync session reset");
    }

    // ===== Internals =====

    fn after_transition<H: SyncHost + ?Sized>(
        &mut self,
        host: &mut H,
        transition: ModeTransition,
    ) -> ModeTransition {
        self.status.refresh(&self.mode);
        self.reset(host);
        transition
    }

    fn promote<H: SyncHost + ?Sized>(&mut self, host: &H, source: ViewId, range: TextRange) {
        self.session.promote(source);
        debug!(leader = %source, "New scroll leader");

        if !self.mode.is_offset_mode() {
            return;
        }
        for follower in self.followers(host, source) {
            let Some(follower_range) = host.visible_range(follower) else {
                continue;
            };
            let offset =
                follower_range.start.line as LineOffset - range.start.line as LineOffset;
            self.session.set_offset(follower, offset);
            trace!(follower = %follower, offset, "Captured follower offset");
        }
    }

    fn apply<H: SyncHost + ?Sized>(&mut self, host: &mut H, pending: PendingSync) -> usize {
        let PendingSync { source, range } = pending;
        let mut revealed = 0;

        for follower in self.followers(host, source) {
            if host.visible_range(follower).is_none() {
                continue;
            }
            let offset = self.offset_between(source, follower);
            let target = map_range(
                range,
                offset,
                |line| host.line_length(source, line),
                |line| host.line_length(follower, line),
            );
            self.session.suppress(follower);
            host.reveal(follower, target, RevealAlignment::Top);
            revealed += 1;
        }

        debug!(leader = %source, revealed, "Applied sync");
        revealed
    }

    fn clear_highlight<H: SyncHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(decoration) = self.highlight.take() {
            host.dispose_decoration(decoration);
        }
    }

    /// Eligible visible views other than `source`, in host order.
    fn followers<H: SyncHost + ?Sized>(&self, host: &H, source: ViewId) -> Vec<ViewId> {
        host.visible_views()
            .into_iter()
            .filter(|&view| view != source && self.is_eligible(host, view))
            .collect()
    }

    /// Next eligible view after `source`, wrapping around.
    fn next_view<H: SyncHost + ?Sized>(&self, host: &H, source: ViewId) -> Option<ViewId> {
        let views: Vec<ViewId> = host
            .visible_views()
            .into_iter()
            .filter(|&view| self.is_eligible(host, view))
            .collect();
        let position = views.iter().position(|&view| view == source);
        let start = position.map_or(0, |index| index + 1);
        (0..views.len())
            .map(|step| views[(start + step) % views.len()])
            .find(|&view| view != source)
    }

    /// Line delta from `source` to `target`.
    ///
    /// In OFFSET mode both views are measured against the leader (whose own
    /// delta is 0); a view with no captured delta falls back to 0.
    fn offset_between(&self, source: ViewId, target: ViewId) -> LineOffset {
        if !self.mode.is_offset_mode() {
            return 0;
        }
        let relative = |view: ViewId| {
            if self.session.leader() == Some(view) {
                Some(0)
            } else {
                self.session.offset(view)
            }
        };
        match (relative(source), relative(target)) {
            (Some(from), Some(to)) => to - from,
            _ => 0,
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
