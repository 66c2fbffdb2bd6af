//! Rendering of a single text pane.
//!
//! Each visible line is split into runs of equal style so the cursor, the
//! pane's own selection and mirrored highlights can overlap freely.

use super::styles::PaneStyles;
use crate::host::Buffer;
use crate::model::{Position, TextRange};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Per-pane flags the renderer cannot read from the buffer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneFlags {
    /// Keyboard focus is on this pane.
    pub focused: bool,
    /// This pane currently drives sync.
    pub leader: bool,
}

/// Draw `buffer` into `area` with a titled border.
pub fn render_pane(
    frame: &mut Frame,
    area: Rect,
    buffer: &Buffer,
    flags: PaneFlags,
    styles: &PaneStyles,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if flags.focused {
            styles.focused_border
        } else {
            styles.border
        })
        .title(pane_title(buffer, flags, styles));

    let inner_width = area.width.saturating_sub(2) as usize;
    let lines = visible_lines(buffer, flags.focused, inner_width, styles);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn pane_title<'a>(buffer: &'a Buffer, flags: PaneFlags, styles: &PaneStyles) -> Line<'a> {
    let mut spans = vec![Span::raw(" "), Span::raw(buffer.name())];
    if buffer.scheme() != crate::host::FILE_SCHEME {
        spans.push(Span::raw(format!(" ({})", buffer.scheme())));
    }
    if flags.leader {
        spans.push(Span::styled(" ◆", styles.leader_marker));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

/// Lines in the viewport, each prefixed with a line-number gutter.
pub fn visible_lines(
    buffer: &Buffer,
    show_cursor: bool,
    width: usize,
    styles: &PaneStyles,
) -> Vec<Line<'static>> {
    let gutter_width = buffer.line_count().to_string().len();
    let text_width = width.saturating_sub(gutter_width + 1);
    let selection = buffer.selection();
    let own = (!selection.is_empty()).then(|| selection.range());
    let mirrored: Vec<TextRange> = buffer.highlights().copied().collect();
    let cursor = show_cursor.then(|| buffer.cursor());

    (buffer.top()..=buffer.bottom())
        .map(|line| {
            let gutter = Span::styled(
                format!("{:>gutter_width$} ", line + 1),
                styles.gutter,
            );
            let mut spans = vec![gutter];
            let decor = Decorations {
                own,
                mirrored: &mirrored,
                cursor,
                styles,
            };
            spans.extend(styled_runs(
                line,
                buffer.lines().get(line).map(String::as_str).unwrap_or(""),
                text_width,
                &decor,
            ));
            Line::from(spans)
        })
        .collect()
}

struct Decorations<'a> {
    own: Option<TextRange>,
    mirrored: &'a [TextRange],
    cursor: Option<Position>,
    styles: &'a PaneStyles,
}

impl Decorations<'_> {
    fn style_at(&self, pos: Position) -> Style {
        if self.cursor == Some(pos) {
            return self.styles.cursor;
        }
        if self.own.is_some_and(|range| range.contains(pos)) {
            return self.styles.selection;
        }
        if self.mirrored.iter().any(|range| range.contains(pos)) {
            return self.styles.mirrored;
        }
        Style::default()
    }
}

/// Split one line into spans of equal style, truncated to `width` columns.
fn styled_runs(line: usize, text: &str, width: usize, decor: &Decorations<'_>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut used = 0;
    let mut column = 0;

    for (character, ch) in text.chars().enumerate() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        let style = decor.style_at(Position::new(line, character));
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
        used += ch_width;
        column = character + 1;
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }

    // The cursor may sit one past the last character.
    let end = Position::new(line, column);
    if used < width && column == text.chars().count() && decor.cursor == Some(end) {
        spans.push(Span::styled(" ", decor.styles.cursor));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::BufferHost;
    use crate::model::Selection;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn lines_carry_right_aligned_gutter() {
        let mut host = BufferHost::new(3);
        let text: String = (1..=12).map(|i| format!("line {i}\n")).collect();
        let view = host.open("a.txt", &text);
        host.scroll_to(view, 8);

        let lines = visible_lines(host.buffer(view).unwrap(), false, 40, &PaneStyles::default());

        assert_eq!(lines.len(), 3);
        assert_eq!(text_of(&lines[0]), " 9 line 9");
        assert_eq!(text_of(&lines[2]), "11 line 11");
    }

    #[test]
    fn long_lines_are_truncated_to_width() {
        let mut host = BufferHost::new(1);
        let view = host.open("a.txt", "abcdefghijklmnopqrstuvwxyz");

        let lines = visible_lines(host.buffer(view).unwrap(), false, 10, &PaneStyles::default());

        assert_eq!(text_of(&lines[0]), "1 abcdefgh");
    }

    #[test]
    fn wide_characters_count_double() {
        let mut host = BufferHost::new(1);
        let view = host.open("a.txt", "日本語テキスト");

        let lines = visible_lines(host.buffer(view).unwrap(), false, 8, &PaneStyles::default());

        assert_eq!(text_of(&lines[0]), "1 日本語");
    }

    #[test]
    fn selection_splits_line_into_styled_runs() {
        let styles = PaneStyles::default();
        let mut host = BufferHost::new(1);
        let view = host.open("a.txt", "hello world");
        host.set_selection(
            view,
            Selection::new(Position::new(0, 0), Position::new(0, 5)),
        );

        let lines = visible_lines(host.buffer(view).unwrap(), false, 40, &styles);
        let spans = &lines[0].spans;

        assert_eq!(spans[1].content, "hello");
        assert_eq!(spans[1].style, styles.selection);
        assert_eq!(spans[2].content, " world");
        assert_eq!(spans[2].style, Style::default());
    }

    #[test]
    fn cursor_at_line_end_draws_a_block() {
        let styles = PaneStyles::default();
        let mut host = BufferHost::new(1);
        let view = host.open("a.txt", "abc");
        host.move_cursor(view, Position::new(0, 3));

        let lines = visible_lines(host.buffer(view).unwrap(), true, 40, &styles);
        let last = lines[0].spans.last().unwrap();

        assert_eq!(last.content, " ");
        assert_eq!(last.style, styles.cursor);
    }

    #[test]
    fn mirrored_highlight_uses_its_own_style() {
        use crate::host::SyncHost;
        use crate::model::DecorationId;

        let styles = PaneStyles::default();
        let mut host = BufferHost::new(1);
        let view = host.open("a.txt", "abcdef");
        host.set_highlight(
            view,
            DecorationId::new(1),
            &[TextRange::new(Position::new(0, 2), Position::new(0, 4))],
        );

        let lines = visible_lines(host.buffer(view).unwrap(), false, 40, &styles);
        let spans = &lines[0].spans;

        assert_eq!(spans[2].content, "cd");
        assert_eq!(spans[2].style, styles.mirrored);
    }
}
