//! Property-based tests for position mapping.

use proptest::prelude::*;
use syncscroll::mapping::{map_exact_range, map_position, map_range, offset_line};
use syncscroll::model::{Position, TextRange};

fn uniform(len: usize) -> impl Fn(usize) -> usize {
    move |_| len
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Equal line lengths and no offset map every position onto itself.
    #[test]
    fn identity_when_lengths_match(line in 0usize..10_000, len in 1usize..500, c in 0usize..500) {
        let character = c.min(len);
        let pos = Position::new(line, character);

        prop_assert_eq!(map_position(pos, 0, uniform(len), uniform(len)), pos);
    }

    /// The mapped character never passes the end of the target line.
    #[test]
    fn character_stays_within_target_line(
        line in 0usize..1_000,
        source_len in 1usize..1_000,
        target_len in 0usize..1_000,
        c in 0usize..1_000,
    ) {
        let pos = Position::new(line, c.min(source_len));
        let mapped = map_position(pos, 0, uniform(source_len), uniform(target_len));

        prop_assert!(mapped.character <= target_len);
    }

    /// Moving right in the source never moves left in the target.
    #[test]
    fn mapping_is_monotonic_along_a_line(
        source_len in 1usize..400,
        target_len in 0usize..400,
        a in 0usize..400,
        b in 0usize..400,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = lo.min(source_len);
        let hi = hi.min(source_len);

        let left = map_position(Position::new(0, lo), 0, uniform(source_len), uniform(target_len));
        let right = map_position(Position::new(0, hi), 0, uniform(source_len), uniform(target_len));

        prop_assert!(left.character <= right.character);
    }

    /// A zero-length source line always maps to column 0.
    #[test]
    fn empty_source_line_maps_to_column_zero(
        line in 0usize..1_000,
        offset in -500isize..500,
        c in 0usize..100,
        target_len in 0usize..100,
    ) {
        let mapped = map_position(Position::new(line, c), offset, uniform(0), uniform(target_len));

        prop_assert_eq!(mapped, Position::line_start(offset_line(line, offset)));
    }

    /// The target line is the source line plus the offset, never below zero.
    #[test]
    fn offset_shifts_line_and_clamps(line in 0usize..10_000, offset in -20_000isize..20_000) {
        let mapped = map_position(Position::new(line, 0), offset, uniform(10), uniform(10));
        let expected = (line as i64 + offset as i64).max(0) as usize;

        prop_assert_eq!(mapped.line, expected);
    }

    /// Reveal ranges cover exactly the mapped start line.
    #[test]
    fn reveal_range_spans_one_line(
        line in 0usize..5_000,
        offset in -100isize..100,
        c in 0usize..80,
    ) {
        let range = TextRange::new(Position::new(line, c), Position::new(line + 3, 0));
        let mapped = map_range(range, offset, uniform(80), uniform(40));

        prop_assert_eq!(mapped.end, Position::line_start(mapped.start.line + 1));
    }

    /// Exact ranges stay ordered after mapping.
    #[test]
    fn exact_range_keeps_start_before_end(
        a_line in 0usize..200,
        a_c in 0usize..60,
        b_line in 0usize..200,
        b_c in 0usize..60,
        offset in -50isize..50,
    ) {
        let range = TextRange::new(Position::new(a_line, a_c), Position::new(b_line, b_c));
        let mapped = map_exact_range(range, offset, uniform(60), uniform(90));

        prop_assert!(mapped.start <= mapped.end);
    }
}

#[test]
fn fifty_to_hundred_character_scenario() {
    let mapped = map_position(Position::new(10, 25), 0, uniform(50), uniform(100));
    assert_eq!(mapped, Position::new(10, 50));
}
