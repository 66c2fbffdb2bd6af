//! TUI rendering and terminal management (impure shell)
//!
//! Panes are [`BufferHost`] buffers shown side by side. Every key press
//! mutates the host, and the host's queued events are then pumped through the
//! [`SyncCoordinator`]. The loop wakes for the debounce deadline so a
//! pending sync pass fires even when no input arrives.

pub mod constants;
mod help;
mod layout;
pub mod mode_picker;
mod pane;
mod styles;

pub use help::render_help_overlay;
pub use layout::{pane_areas, pane_text_height, render_layout, Screen};
pub use mode_picker::{render_mode_picker, ModePicker, PickerOutcome};
pub use pane::{render_pane, visible_lines, PaneFlags};
pub use styles::{ColorConfig, PaneStyles};

use crate::config::KeyBindings;
use crate::host::{BufferHost, RevealAlignment, SyncHost};
use crate::model::{KeyAction, Position, Selection, TextRange, ViewId};
use crate::sync::{JumpLocation, SyncCoordinator};
use constants::IDLE_POLL_INTERVAL;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::BTreeSet;
use std::io::{self, Stdout};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    host: BufferHost,
    coordinator: SyncCoordinator,
    key_bindings: KeyBindings,
    styles: PaneStyles,
    focus: usize,
    picker: ModePicker,
    help_visible: bool,
    message: Option<String>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        host: BufferHost,
        coordinator: SyncCoordinator,
        key_bindings: KeyBindings,
        styles: PaneStyles,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Self::with_terminal(terminal, host, coordinator, key_bindings, styles)
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Blocks on input until the next sync
    /// deadline, or for [`IDLE_POLL_INTERVAL`] when nothing is pending.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let now = Instant::now();
            let timeout = self
                .coordinator
                .next_deadline()
                .map_or(IDLE_POLL_INTERVAL, |deadline| {
                    deadline.saturating_duration_since(now)
                });

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key, Instant::now()) {
                            info!("Quit requested");
                            return Ok(());
                        }
                    }
                    Event::Resize(_, height) => self.handle_resize(height),
                    _ => {}
                }
            }

            self.pump(Instant::now());
            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Wrap an existing terminal. Sizes the panes and delivers the host's
    /// startup events.
    pub fn with_terminal(
        terminal: Terminal<B>,
        host: BufferHost,
        coordinator: SyncCoordinator,
        key_bindings: KeyBindings,
        styles: PaneStyles,
    ) -> Result<Self, TuiError> {
        let mut app = Self {
            terminal,
            host,
            coordinator,
            key_bindings,
            styles,
            focus: 0,
            picker: ModePicker::default(),
            help_visible: false,
            message: None,
        };
        let height = app.terminal.size()?.height;
        app.handle_resize(height);
        app.pump(Instant::now());
        Ok(app)
    }

    // ===== Accessors =====

    /// Panes and their text.
    pub fn host(&self) -> &BufferHost {
        &self.host
    }

    /// Sync engine state.
    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }

    /// View with keyboard focus.
    pub fn focused_view(&self) -> Option<ViewId> {
        self.host.buffers().get(self.focus).map(|buffer| buffer.id())
    }

    /// Feedback from the last command, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether the help overlay is open.
    pub fn is_help_visible(&self) -> bool {
        self.help_visible
    }

    /// Mode picker state.
    pub fn picker(&self) -> &ModePicker {
        &self.picker
    }

    /// Backing terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    // ===== Frame =====

    /// Render one frame.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let screen = Screen {
            host: &self.host,
            coordinator: &self.coordinator,
            focus: self.focus,
            picker: &self.picker,
            help_visible: self.help_visible,
            message: self.message.as_deref(),
            styles: &self.styles,
        };
        self.terminal.draw(|frame| render_layout(frame, &screen))?;
        Ok(())
    }

    /// Terminal resized: every pane gets the new text height.
    pub fn handle_resize(&mut self, height: u16) {
        let rows = pane_text_height(height);
        debug!(rows, "Resizing panes");
        self.host.set_viewport_height(rows);
    }

    /// Deliver queued host events, then fire the pending sync pass if due.
    ///
    /// Reveals made by the pass queue their own viewport events, which are
    /// delivered right away so the feedback is swallowed before the next input.
    pub fn pump(&mut self, now: Instant) {
        self.dispatch_events(now);
        if self.coordinator.tick(&mut self.host, now) > 0 {
            self.dispatch_events(now);
        }
    }

    fn dispatch_events(&mut self, now: Instant) {
        for event in self.host.drain_events() {
            self.coordinator.handle_event(&mut self.host, event, now);
        }
    }

    // ===== Input =====

    /// Handle a single keyboard event, then pump the resulting host events.
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if self.picker.is_visible() {
            if let PickerOutcome::Closed(picked) = self.picker.handle_key(key) {
                if let Some(transition) = self.coordinator.pick_mode(&mut self.host, picked) {
                    self.message = Some(format!("Sync Scroll Mode: {}", transition.to));
                }
            }
            self.pump(now);
            return false;
        }

        if self.help_visible {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.help_visible = false;
            }
            return false;
        }

        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        self.message = None;

        if action == KeyAction::Quit {
            return true;
        }
        self.apply_action(action);
        self.pump(now);
        false
    }

    fn apply_action(&mut self, action: KeyAction) {
        if action == KeyAction::ToggleHelp {
            self.help_visible = !self.help_visible;
            return;
        }
        if action == KeyAction::ToggleSync {
            let transition = self.coordinator.toggle(&mut self.host);
            self.message = Some(self.coordinator.mode_state().toggle_label());
            debug!(from = %transition.from, to = %transition.to, "Toggled sync");
            return;
        }
        if action == KeyAction::PickMode {
            self.picker.open(self.coordinator.mode());
            return;
        }

        let Some(view) = self.focused_view() else {
            return;
        };
        let Some(buffer) = self.host.buffer(view) else {
            return;
        };
        let page = buffer.height() as isize;
        let cursor = buffer.cursor();
        let last_top = buffer.line_count().saturating_sub(buffer.height());

        match action {
            KeyAction::ScrollUp => {
                self.host.scroll_by(view, -1);
            }
            KeyAction::ScrollDown => {
                self.host.scroll_by(view, 1);
            }
            KeyAction::PageUp => {
                self.host.scroll_by(view, -page);
            }
            KeyAction::PageDown => {
                self.host.scroll_by(view, page);
            }
            KeyAction::ScrollToTop => {
                self.host.scroll_to(view, 0);
            }
            KeyAction::ScrollToBottom => {
                self.host.scroll_to(view, last_top);
            }
            KeyAction::CursorUp => self
                .host
                .move_cursor(view, Position::new(cursor.line.saturating_sub(1), cursor.character)),
            KeyAction::CursorDown => self
                .host
                .move_cursor(view, Position::new(cursor.line + 1, cursor.character)),
            KeyAction::CursorLeft => self
                .host
                .move_cursor(view, Position::new(cursor.line, cursor.character.saturating_sub(1))),
            KeyAction::CursorRight => self
                .host
                .move_cursor(view, Position::new(cursor.line, cursor.character + 1)),
            KeyAction::ToggleSelection => self.host.toggle_anchor(view),
            KeyAction::FocusNext => self.cycle_focus(1),
            KeyAction::FocusPrev => self.cycle_focus(-1),
            KeyAction::ClosePane => self.close_focused(view),
            KeyAction::JumpToCorresponding => self.jump_from(view),
            KeyAction::CopyToCorresponding => self.copy_from(view),
            KeyAction::ToggleHelp | KeyAction::ToggleSync | KeyAction::PickMode | KeyAction::Quit => {}
        }
    }

    fn cycle_focus(&mut self, step: isize) {
        let panes = self.host.buffers().len();
        if panes > 0 {
            self.focus = (self.focus as isize + step).rem_euclid(panes as isize) as usize;
        }
    }

    fn focus_view(&mut self, view: ViewId) {
        if let Some(index) = self.host.buffers().iter().position(|b| b.id() == view) {
            self.focus = index;
        }
    }

    fn close_focused(&mut self, view: ViewId) {
        if self.host.close(view) {
            info!(%view, "Closed pane");
            self.focus = self.focus.min(self.host.buffers().len().saturating_sub(1));
        }
    }

    /// Move focus to the corresponding place in the next pane and select it there.
    fn jump_from(&mut self, view: ViewId) {
        let Some(target) = self
            .coordinator
            .jump_to_next_corresponding_position(&self.host, view)
        else {
            self.message = Some("Nothing to jump to".to_string());
            return;
        };

        let range = match target.location {
            JumpLocation::Position(pos) => {
                self.host.move_cursor(target.view, pos);
                TextRange::empty(pos)
            }
            JumpLocation::Range(range) => {
                self.host
                    .set_selection(target.view, Selection::new(range.start, range.end));
                range
            }
        };
        self.host.reveal(target.view, range, RevealAlignment::Center);
        self.focus_view(target.view);
    }

    /// Paste the focused pane's selections into every other pane.
    fn copy_from(&mut self, view: ViewId) {
        let mut edits = self
            .coordinator
            .copy_to_all_corresponding_positions(&self.host, view);
        // Bottom-up within each view so pending targets keep their positions.
        edits.sort_by(|a, b| (b.view, b.range.start).cmp(&(a.view, a.range.start)));
        let mut touched = BTreeSet::new();
        for edit in &edits {
            if self.host.apply_edit(edit.view, edit.range, &edit.text) {
                touched.insert(edit.view);
            }
        }
        self.message = Some(match touched.len() {
            0 => "Nothing to copy into".to_string(),
            1 => "Copied into 1 pane".to_string(),
            n => format!("Copied into {n} panes"),
        });
    }
}

/// Open a terminal, run the app until quit, and restore the terminal.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(
    host: BufferHost,
    coordinator: SyncCoordinator,
    key_bindings: KeyBindings,
    styles: PaneStyles,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(host, coordinator, key_bindings, styles)?;

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
