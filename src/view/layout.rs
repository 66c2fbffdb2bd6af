//! Screen layout: side-by-side panes over a one-line status bar.

use super::constants::{PANE_BORDER_HEIGHT, STATUS_BAR_HEIGHT, STATUS_SEPARATOR};
use super::help::render_help_overlay;
use super::mode_picker::{render_mode_picker, ModePicker};
use super::pane::{render_pane, PaneFlags};
use super::styles::PaneStyles;
use crate::host::BufferHost;
use crate::sync::SyncCoordinator;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything one frame needs, borrowed from the app.
pub struct Screen<'a> {
    /// Buffers to draw.
    pub host: &'a BufferHost,
    /// Engine state for the leader marker and status items.
    pub coordinator: &'a SyncCoordinator,
    /// Index of the focused pane.
    pub focus: usize,
    /// Mode picker state.
    pub picker: &'a ModePicker,
    /// Whether the help overlay is open.
    pub help_visible: bool,
    /// Feedback from the last command.
    pub message: Option<&'a str>,
    /// Colors.
    pub styles: &'a PaneStyles,
}

/// Text rows available inside a pane for a terminal of `terminal_height` rows.
pub fn pane_text_height(terminal_height: u16) -> usize {
    terminal_height
        .saturating_sub(STATUS_BAR_HEIGHT + PANE_BORDER_HEIGHT)
        .max(1) as usize
}

/// Split `area` into equal-width columns, one per pane.
pub fn pane_areas(area: Rect, panes: usize) -> Vec<Rect> {
    if panes == 0 {
        return Vec::new();
    }
    let constraints = vec![Constraint::Ratio(1, panes as u32); panes];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Render the whole screen.
pub fn render_layout(frame: &mut Frame, screen: &Screen<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame.area());
    let (content_area, status_area) = (chunks[0], chunks[1]);

    let buffers = screen.host.buffers();
    if buffers.is_empty() {
        frame.render_widget(
            Paragraph::new("No open panes. Press q to quit.").style(screen.styles.gutter),
            content_area,
        );
    }

    let leader = screen.coordinator.leader();
    for (index, (buffer, area)) in buffers
        .iter()
        .zip(pane_areas(content_area, buffers.len()))
        .enumerate()
    {
        let flags = PaneFlags {
            focused: index == screen.focus,
            leader: leader == Some(buffer.id()),
        };
        render_pane(frame, area, buffer, flags, screen.styles);
    }

    render_status_bar(frame, status_area, screen);
    render_mode_picker(frame, screen.picker, screen.coordinator.mode());
    if screen.help_visible {
        render_help_overlay(frame);
    }
}

/// Status bar: sync indicators on the left, feedback or hints on the right.
fn render_status_bar(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let mut spans = vec![Span::raw(" ")];
    for (index, item) in screen.coordinator.status_items().shown().into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(STATUS_SEPARATOR));
        }
        spans.push(Span::raw(item.text.clone()));
    }

    let right = match screen.message {
        Some(message) => Span::styled(format!("{message} "), screen.styles.message),
        None => Span::raw("? help  q quit "),
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right.width() as u16)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(screen.styles.status_bar),
        halves[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(right)).style(screen.styles.status_bar),
        halves[1],
    );
}
