//! Alignment mode state machine backed by the workspace store.
//!
//! There is no cached copy of the mode: every query reads the store. The
//! stored `mode` key remembers the last active alignment mode even while the
//! engine is toggled off, which is what lets a toggle restore it.

use crate::model::AlignmentMode;
use crate::store::{get_typed, StateStore};
use serde_json::Value;
use tracing::{debug, warn};

/// Store key: whether synchronization is switched on.
pub const KEY_IS_ON: &str = "syncScroll.isOn";
/// Store key: last chosen alignment mode.
pub const KEY_MODE: &str = "syncScroll.mode";
/// Store key: whether the on/off state survives restarts.
pub const KEY_REMEMBER_TOGGLE_STATE: &str = "syncScroll.rememberToggleState";

/// A completed mode transition.
///
/// Callers must reset any per-session state after every transition.
#[must_use = "session state must be reset after a mode transition"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    /// Effective mode before the transition.
    pub from: AlignmentMode,
    /// Effective mode after the transition.
    pub to: AlignmentMode,
}

impl ModeTransition {
    /// True when the effective mode actually changed.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Owns the workspace store and answers mode queries from it.
pub struct ModeState {
    store: Box<dyn StateStore>,
}

impl std::fmt::Debug for ModeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeState")
            .field("mode", &self.mode())
            .field("remembered", &self.remembered_mode())
            .finish()
    }
}

impl ModeState {
    /// Wrap a store. Call [`ModeState::init`] before use.
    pub fn new(store: Box<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Restore or seed the persisted state at startup.
    ///
    /// With `remember_toggle_state` set and a stored on/off flag present, the
    /// stored state wins. Otherwise the state is seeded from `default_mode`;
    /// an `OFF` default keeps any remembered alignment mode for the next toggle.
    pub fn init(&mut self, default_mode: AlignmentMode, remember_toggle_state: bool) -> ModeTransition {
        let from = self.mode();
        self.persist(KEY_REMEMBER_TOGGLE_STATE, Value::Bool(remember_toggle_state));

        let has_stored_toggle = get_typed::<bool>(self.store.as_ref(), KEY_IS_ON).is_some();
        if remember_toggle_state && has_stored_toggle {
            debug!(mode = %self.mode(), "Restored persisted sync state");
        } else {
            self.write_mode(default_mode);
            debug!(mode = %default_mode, "Seeded sync state from defaults");
        }

        ModeTransition {
            from,
            to: self.mode(),
        }
    }

    /// Effective mode: `OFF` whenever the engine is switched off.
    pub fn mode(&self) -> AlignmentMode {
        if self.is_on() {
            self.remembered_mode()
        } else {
            AlignmentMode::Off
        }
    }

    /// Alignment mode restored by the next toggle-on.
    ///
    /// Falls back to `NORMAL` if nothing usable is stored.
    pub fn remembered_mode(&self) -> AlignmentMode {
        match get_typed::<AlignmentMode>(self.store.as_ref(), KEY_MODE) {
            Some(mode) if mode.is_active() => mode,
            _ => AlignmentMode::Normal,
        }
    }

    /// Whether synchronization is switched on.
    pub fn is_on(&self) -> bool {
        get_typed::<bool>(self.store.as_ref(), KEY_IS_ON).unwrap_or(false)
    }

    /// Whether the on/off state is restored across restarts.
    pub fn remembers_toggle_state(&self) -> bool {
        get_typed::<bool>(self.store.as_ref(), KEY_REMEMBER_TOGGLE_STATE).unwrap_or(true)
    }

    /// Engine is disabled.
    pub fn is_off(&self) -> bool {
        self.mode() == AlignmentMode::Off
    }

    /// Proportional same-line alignment is active.
    pub fn is_normal_mode(&self) -> bool {
        self.mode() == AlignmentMode::Normal
    }

    /// Fixed line-delta alignment is active.
    pub fn is_offset_mode(&self) -> bool {
        self.mode() == AlignmentMode::Offset
    }

    /// Switch on or off, keeping the remembered alignment mode.
    pub fn toggle(&mut self) -> ModeTransition {
        let from = self.mode();
        if self.is_on() {
            self.persist(KEY_IS_ON, Value::Bool(false));
        } else {
            let restored = self.remembered_mode();
            self.write_mode(restored);
        }
        let to = self.mode();
        debug!(%from, %to, "Toggled sync");
        ModeTransition { from, to }
    }

    /// Set the mode explicitly. `OFF` switches off but keeps the remembered mode.
    pub fn set_mode(&mut self, mode: AlignmentMode) -> ModeTransition {
        let from = self.mode();
        self.write_mode(mode);
        let to = self.mode();
        debug!(%from, %to, "Set sync mode");
        ModeTransition { from, to }
    }

    /// Apply the result of an interactive pick. A dismissed pick changes nothing.
    pub fn pick_mode(&mut self, picked: Option<AlignmentMode>) -> Option<ModeTransition> {
        picked.map(|mode| self.set_mode(mode))
    }

    /// Label summarising the effective mode, e.g. `Sync Scroll: OFFSET`.
    pub fn label(&self) -> String {
        format!("Sync Scroll: {}", self.mode())
    }

    /// Label for the on/off indicator.
    pub fn toggle_label(&self) -> String {
        if self.is_on() {
            "Sync Scroll: ON".to_string()
        } else {
            "Sync Scroll: OFF".to_string()
        }
    }

    /// Label for the mode indicator.
    pub fn mode_label(&self) -> String {
        format!("Sync Scroll Mode: {}", self.remembered_mode())
    }

    fn write_mode(&mut self, mode: AlignmentMode) {
        if mode.is_active() {
            self.persist(KEY_MODE, Value::String(mode.as_str().to_string()));
            self.persist(KEY_IS_ON, Value::Bool(true));
        } else {
            self.persist(KEY_IS_ON, Value::Bool(false));
        }
    }

    fn persist(&mut self, key: &str, value: Value) {
        if let Err(err) = self.store.set(key, value) {
            warn!(key, error = %err, "Failed to persist sync state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use serde_json::json;

    fn fresh(default_mode: AlignmentMode) -> ModeState {
        let mut state = ModeState::new(Box::new(MemoryStore::new()));
        let _ = state.init(default_mode, true);
        state
    }

    fn with_stored(values: &[(&str, Value)]) -> ModeState {
        let mut store = MemoryStore::new();
        for (k, v) in values {
            store.set(k, v.clone()).unwrap();
        }
        ModeState::new(Box::new(store))
    }

    /// Store whose writes fail after updating memory.
    #[derive(Default)]
    struct FlakyStore(MemoryStore);

    impl StateStore for FlakyStore {
        fn get(&self, key: &str) -> Option<Value> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
            self.0.set(key, value)?;
            Err(StoreError::Write {
                path: "/dev/full".into(),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn first_init_with_normal_default_turns_on() {
        let state = fresh(AlignmentMode::Normal);
        assert!(state.is_on());
        assert!(state.is_normal_mode());
    }

    #[test]
    fn first_init_with_off_default_stays_off() {
        let state = fresh(AlignmentMode::Off);
        assert!(state.is_off());
        assert_eq!(state.remembered_mode(), AlignmentMode::Normal);
    }

    #[test]
    fn init_restores_stored_state_when_remembering() {
        let mut state = with_stored(&[(KEY_IS_ON, json!(true)), (KEY_MODE, json!("OFFSET"))]);
        let transition = state.init(AlignmentMode::Normal, true);
        assert!(state.is_offset_mode());
        assert_eq!(transition.to, AlignmentMode::Offset);
    }

    #[test]
    fn init_ignores_stored_toggle_when_not_remembering() {
        let mut state = with_stored(&[(KEY_IS_ON, json!(false)), (KEY_MODE, json!("OFFSET"))]);
        let _ = state.init(AlignmentMode::Normal, false);
        assert!(state.is_normal_mode());
        assert!(!state.remembers_toggle_state());
    }

    #[test]
    fn toggle_off_then_on_restores_offset_mode() {
        let mut state = fresh(AlignmentMode::Offset);

        let off = state.toggle();
        assert_eq!(off.from, AlignmentMode::Offset);
        assert_eq!(off.to, AlignmentMode::Off);
        assert!(state.is_off());

        let on = state.toggle();
        assert_eq!(on.to, AlignmentMode::Offset);
        assert!(state.is_offset_mode());
    }

    #[test]
    fn toggle_on_without_remembered_mode_falls_back_to_normal() {
        let mut state = with_stored(&[]);
        assert!(state.is_off());
        let _ = state.toggle();
        assert!(state.is_normal_mode());
    }

    #[test]
    fn set_mode_off_keeps_remembered_mode() {
        let mut state = fresh(AlignmentMode::Offset);
        let _ = state.set_mode(AlignmentMode::Off);
        assert!(state.is_off());
        assert_eq!(state.remembered_mode(), AlignmentMode::Offset);
        let _ = state.toggle();
        assert!(state.is_offset_mode());
    }

    #[test]
    fn set_mode_from_off_turns_on() {
        let mut state = fresh(AlignmentMode::Off);
        let transition = state.set_mode(AlignmentMode::Offset);
        assert!(transition.changed());
        assert!(state.is_offset_mode());
    }

    #[test]
    fn set_same_mode_reports_unchanged_transition() {
        let mut state = fresh(AlignmentMode::Normal);
        let transition = state.set_mode(AlignmentMode::Normal);
        assert!(!transition.changed());
    }

    #[test]
    fn cancelled_pick_is_a_no_op() {
        let mut state = fresh(AlignmentMode::Offset);
        assert_eq!(state.pick_mode(None), None);
        assert!(state.is_offset_mode());
    }

    #[test]
    fn queries_read_the_store_every_time() {
        let state = with_stored(&[(KEY_IS_ON, json!(true)), (KEY_MODE, json!("NORMAL"))]);
        assert!(state.is_normal_mode());
        let state = with_stored(&[(KEY_IS_ON, json!(true)), (KEY_MODE, json!("garbage"))]);
        assert!(state.is_normal_mode(), "unreadable mode falls back to NORMAL");
    }

    #[test]
    fn persist_failure_still_transitions() {
        let mut state = ModeState::new(Box::<FlakyStore>::default());
        let _ = state.init(AlignmentMode::Normal, true);
        let _ = state.set_mode(AlignmentMode::Offset);
        assert!(state.is_offset_mode());
    }

    #[test]
    fn labels_follow_state() {
        let mut state = fresh(AlignmentMode::Offset);
        insta::assert_snapshot!(state.label(), @"Sync Scroll: OFFSET");
        insta::assert_snapshot!(state.toggle_label(), @"Sync Scroll: ON");
        insta::assert_snapshot!(state.mode_label(), @"Sync Scroll Mode: OFFSET");

        let _ = state.toggle();
        insta::assert_snapshot!(state.label(), @"Sync Scroll: OFF");
        insta::assert_snapshot!(state.toggle_label(), @"Sync Scroll: OFF");
        insta::assert_snapshot!(state.mode_label(), @"Sync Scroll Mode: OFFSET");
    }
}
