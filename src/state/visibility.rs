//! Tracks whether synchronization is structurally possible.

use crate::model::ViewId;

/// Sync needs at least two visible views.
pub fn has_multiple_views(views: &[ViewId]) -> bool {
    views.len() > 1
}

/// Outcome of feeding a new visible-view list to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChange {
    /// The set of visible views differs from the previous one.
    pub views_changed: bool,
    /// `has_multiple_views` flipped.
    pub flipped: bool,
}

/// Last known visible views and the derived multi-view flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityTracker {
    views: Vec<ViewId>,
    multiple: bool,
}

impl VisibilityTracker {
    /// Tracker that has seen no views yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the host's current visible views, in host order.
    pub fn update(&mut self, views: Vec<ViewId>) -> VisibilityChange {
        let multiple = has_multiple_views(&views);
        let change = VisibilityChange {
            views_changed: views != self.views,
            flipped: multiple != self.multiple,
        };
        self.views = views;
        self.multiple = multiple;
        change
    }

    /// At least two views are visible.
    pub fn has_multiple_views(&self) -> bool {
        self.multiple
    }

    /// Whether `view` is currently visible.
    pub fn contains(&self, view: ViewId) -> bool {
        self.views.contains(&view)
    }
}
