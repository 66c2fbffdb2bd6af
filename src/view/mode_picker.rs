//! Mode picker modal.
//!
//! Lists every alignment mode with its description. Enter confirms,
//! Esc dismisses without a choice.

use super::constants::MODE_PICKER_WIDTH;
use super::styles::MUTED_TEXT;
use crate::model::AlignmentMode;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Outcome of a key press while the picker is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Picker stays open.
    Pending,
    /// Picker closed; `None` means it was dismissed.
    Closed(Option<AlignmentMode>),
}

/// Selection state of the mode picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModePicker {
    visible: bool,
    selected: usize,
}

impl ModePicker {
    /// Open the picker with `current` preselected.
    pub fn open(&mut self, current: AlignmentMode) {
        self.visible = true;
        self.selected = AlignmentMode::ALL
            .iter()
            .position(|mode| *mode == current)
            .unwrap_or(0);
    }

    /// Whether the picker is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Highlighted mode.
    pub fn selected_mode(&self) -> AlignmentMode {
        AlignmentMode::ALL[self.selected]
    }

    /// Handle a key press. Keys other than navigation, Enter and Esc are ignored.
    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        let count = AlignmentMode::ALL.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + count - 1) % count;
                PickerOutcome::Pending
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % count;
                PickerOutcome::Pending
            }
            KeyCode::Enter => {
                self.visible = false;
                PickerOutcome::Closed(Some(self.selected_mode()))
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.visible = false;
                PickerOutcome::Closed(None)
            }
            _ => PickerOutcome::Pending,
        }
    }
}

/// Render the picker centered over `frame`. No-op while hidden.
pub fn render_mode_picker(frame: &mut Frame, picker: &ModePicker, current: AlignmentMode) {
    if !picker.is_visible() {
        return;
    }

    let area = centered_rect(MODE_PICKER_WIDTH, AlignmentMode::ALL.len() as u16 + 3, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = AlignmentMode::ALL
        .iter()
        .map(|mode| {
            let marker = if *mode == current { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:<7}", mode.as_str()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(mode.description(), MUTED_TEXT),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Sync Scroll Mode ")
                .title_bottom(Line::from(" Enter select · Esc cancel ").centered())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(picker.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
