//! Position mapping between two views' coordinate spaces.
//!
//! Pure functions only. Line lengths are supplied as closures so the same
//! code serves the coordinator, benches, and property tests without a host.

use crate::model::{Position, TextRange};

/// Signed line delta between a follower and the leader.
pub type LineOffset = isize;

/// Shift `line` by `offset`, clamping at line 0.
pub fn offset_line(line: usize, offset: LineOffset) -> usize {
    line.saturating_add_signed(offset)
}

/// Map a position from the source view onto the target view.
///
/// The target line is `pos.line + offset` (clamped at 0). The character keeps
/// its fractional position along the line:
/// `floor(character / source_len * target_len)`. A zero-length source line
/// maps to character 0.
pub fn map_position<S, T>(pos: Position, offset: LineOffset, source_len: S, target_len: T) -> Position
where
    S: Fn(usize) -> usize,
    T: Fn(usize) -> usize,
{
    let target_line = offset_line(pos.line, offset);
    let source_length = source_len(pos.line);
    if source_length == 0 {
        return Position::line_start(target_line);
    }

    let target_length = target_len(target_line);
    // Integer form of floor(c / s * t); u128 keeps the product from overflowing.
    let character = (pos.character as u128 * target_length as u128 / source_length as u128) as usize;

    Position::new(target_line, character)
}

/// Map a range for revealing in the target view.
///
/// Only the start is mapped. The end is always the start of the line after
/// the mapped start line, so a reveal shows exactly one whole line.
pub fn map_range<S, T>(range: TextRange, offset: LineOffset, source_len: S, target_len: T) -> TextRange
where
    S: Fn(usize) -> usize,
    T: Fn(usize) -> usize,
{
    let start = map_position(range.start, offset, source_len, target_len);
    TextRange {
        start,
        end: Position::line_start(start.line + 1),
    }
}

/// Map a range with character precision at both ends.
///
/// Used for selection highlights, jumps, and copy targets.
pub fn map_exact_range<S, T>(
    range: TextRange,
    offset: LineOffset,
    source_len: S,
    target_len: T,
) -> TextRange
where
    S: Fn(usize) -> usize,
    T: Fn(usize) -> usize,
{
    let start = map_position(range.start, offset, &source_len, &target_len);
    let end = map_position(range.end, offset, &source_len, &target_len);
    TextRange::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(len: usize) -> impl Fn(usize) -> usize {
        move |_| len
    }

    #[test]
    fn same_view_zero_offset_is_identity() {
        let pos = Position::new(12, 7);
        assert_eq!(map_position(pos, 0, uniform(40), uniform(40)), pos);
    }

    #[test]
    fn character_scales_with_line_length_ratio() {
        let mapped = map_position(Position::new(3, 5), 0, uniform(10), uniform(20));
        assert_eq!(mapped, Position::new(3, 10));
    }

    #[test]
    fn character_is_floored() {
        // 3 / 10 * 5 = 1.5 -> 1
        let mapped = map_position(Position::new(0, 3), 0, uniform(10), uniform(5));
        assert_eq!(mapped.character, 1);
    }

    #[test]
    fn zero_length_source_line_maps_to_column_zero() {
        for character in [0, 1, 99] {
            let mapped = map_position(Position::new(2, character), 0, uniform(0), uniform(80));
            assert_eq!(mapped, Position::new(2, 0));
        }
    }

    #[test]
    fn zero_length_target_line_maps_to_column_zero() {
        let mapped = map_position(Position::new(2, 9), 0, uniform(10), uniform(0));
        assert_eq!(mapped, Position::new(2, 0));
    }

    #[test]
    fn offset_shifts_target_line() {
        let mapped = map_position(Position::new(150, 0), -20, uniform(10), uniform(10));
        assert_eq!(mapped.line, 130);
    }

    #[test]
    fn negative_offset_clamps_at_first_line() {
        let mapped = map_position(Position::new(5, 0), -20, uniform(10), uniform(10));
        assert_eq!(mapped.line, 0);
    }

    #[test]
    fn target_length_is_read_at_the_shifted_line() {
        let target = |line: usize| if line == 12 { 30 } else { 1 };
        let mapped = map_position(Position::new(10, 5), 2, uniform(10), target);
        assert_eq!(mapped, Position::new(12, 15));
    }

    #[test]
    fn map_range_reveals_one_line() {
        let source = TextRange::new(Position::new(30, 25), Position::new(70, 4));
        let mapped = map_range(source, 0, uniform(50), uniform(100));
        assert_eq!(mapped.start, Position::new(30, 50));
        assert_eq!(mapped.end, Position::new(31, 0));
    }

    #[test]
    fn map_exact_range_maps_both_ends() {
        let source = TextRange::new(Position::new(4, 2), Position::new(6, 8));
        let mapped = map_exact_range(source, 1, uniform(10), uniform(20));
        assert_eq!(mapped.start, Position::new(5, 4));
        assert_eq!(mapped.end, Position::new(7, 16));
    }

    #[test]
    fn huge_lengths_do_not_overflow() {
        let mapped = map_position(
            Position::new(0, usize::MAX / 2),
            0,
            uniform(usize::MAX),
            uniform(usize::MAX),
        );
        assert_eq!(mapped.character, usize::MAX / 2);
    }
}
