//! End-to-end sync scenarios through the in-memory host.
//!
//! Each test drives `BufferHost` the way a user would and pumps the queued
//! events through `SyncCoordinator`, the same loop the terminal front-end runs.

use std::time::{Duration, Instant};
use syncscroll::host::{BufferHost, HostEvent, SyncHost, FILE_SCHEME};
use syncscroll::model::{AlignmentMode, Position, Selection, TextRange, ViewId};
use syncscroll::store::MemoryStore;
use syncscroll::sync::{EligibilityPolicy, JumpLocation, SyncCoordinator, SyncOptions};

// ===== Test Helpers =====

struct Harness {
    host: BufferHost,
    engine: SyncCoordinator,
}

impl Harness {
    fn new(options: SyncOptions) -> Self {
        Self {
            host: BufferHost::new(20),
            engine: SyncCoordinator::new(Box::new(MemoryStore::new()), options),
        }
    }

    fn with_mode(mode: AlignmentMode) -> Self {
        Self::new(SyncOptions {
            default_mode: mode,
            ..SyncOptions::default()
        })
    }

    /// Deliver events, fire due passes, and deliver the reveals' feedback.
    fn pump(&mut self, now: Instant) {
        loop {
            let events = self.host.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.engine.handle_event(&mut self.host, event, now);
            }
            self.engine.tick(&mut self.host, now);
        }
        self.engine.tick(&mut self.host, now);
        for event in self.host.drain_events() {
            self.engine.handle_event(&mut self.host, event, now);
        }
    }

    fn top(&self, view: ViewId) -> usize {
        self.host.buffer(view).unwrap().top()
    }
}

fn lines_of(width: usize, count: usize) -> String {
    (0..count).map(|_| format!("{}\n", "x".repeat(width))).collect()
}

// ===== Scenarios =====

#[test]
fn normal_mode_follows_with_proportional_character() {
    let mut h = Harness::with_mode(AlignmentMode::Normal);
    let a = h.host.open("a", &lines_of(50, 200));
    let b = h.host.open("b", &lines_of(100, 200));
    let now = Instant::now();
    h.pump(now);

    // Leader reports a viewport starting mid-line.
    h.host.push_event(HostEvent::ViewportChanged {
        view: a,
        range: TextRange::new(Position::new(10, 25), Position::new(30, 0)),
    });
    h.pump(now);

    let revealed = h.host.buffer(b).unwrap().last_reveal().unwrap();
    assert_eq!(revealed.start, Position::new(10, 50));
    assert_eq!(revealed.end, Position::new(11, 0));
    assert_eq!(h.top(b), 10);
}

#[test]
fn offset_mode_keeps_captured_distance() {
    let mut h = Harness::with_mode(AlignmentMode::Offset);
    let a = h.host.open("a", &lines_of(10, 500));
    let b = h.host.open("b", &lines_of(10, 500));
    let now = Instant::now();
    h.pump(now);

    // B scrolls first: it leads and A is captured at 0 - 20 = -20.
    h.host.scroll_to(b, 20);
    h.pump(now);
    assert_eq!(h.top(a), 0, "offset capture does not move followers on the first pass");

    // A takes the lead at 5 while B sits at 20: B's offset is +15.
    h.host.scroll_to(a, 5);
    h.pump(now);
    assert_eq!(h.engine.leader(), Some(a));
    assert_eq!(h.engine.session().offset(b), Some(15));
    assert_eq!(h.top(b), 20);

    h.host.scroll_to(a, 150);
    h.pump(now);
    assert_eq!(h.top(b), 165);
}

#[test]
fn burst_of_scrolls_is_coalesced_to_the_last_range() {
    let mut h = Harness::new(SyncOptions {
        debounce: Duration::from_millis(20),
        ..SyncOptions::default()
    });
    let a = h.host.open("a", &lines_of(10, 300));
    let b = h.host.open("b", &lines_of(10, 300));
    let start = Instant::now();
    h.pump(start);

    for step in 1..=10 {
        h.host.scroll_by(a, 3);
        h.pump(start + Duration::from_millis(step));
    }
    assert_eq!(h.top(b), 0, "window still open");

    h.pump(start + Duration::from_millis(100));
    assert_eq!(h.top(b), 30);
}

#[test]
fn three_views_follow_one_leader() {
    let mut h = Harness::with_mode(AlignmentMode::Normal);
    let a = h.host.open("a", &lines_of(10, 300));
    let b = h.host.open("b", &lines_of(10, 300));
    let c = h.host.open("c", &lines_of(10, 300));
    let now = Instant::now();
    h.pump(now);

    h.host.scroll_to(b, 42);
    h.pump(now);

    assert_eq!(h.top(a), 42);
    assert_eq!(h.top(c), 42);
    assert_eq!(h.engine.leader(), Some(b));
}

#[test]
fn short_follower_clamps_to_its_last_line() {
    let mut h = Harness::with_mode(AlignmentMode::Normal);
    let a = h.host.open("long", &lines_of(10, 400));
    let b = h.host.open("short", &lines_of(10, 50));
    let now = Instant::now();
    h.pump(now);

    h.host.scroll_to(a, 300);
    h.pump(now);

    assert_eq!(h.top(b), 49);
}

#[test]
fn output_views_neither_lead_nor_follow() {
    let mut h = Harness::with_mode(AlignmentMode::Normal);
    let a = h.host.open("a", &lines_of(10, 300));
    let out = h.host.open_with_scheme("log", "output", &lines_of(10, 300));
    let b = h.host.open("b", &lines_of(10, 300));
    let now = Instant::now();
    h.pump(now);

    h.host.scroll_to(a, 60);
    h.pump(now);
    assert_eq!(h.top(b), 60);
    assert_eq!(h.top(out), 0);

    h.host.scroll_to(out, 10);
    h.pump(now);
    assert_eq!(h.engine.leader(), Some(a), "output view must not take the lead");
}

#[test]
fn opened_files_use_the_public_file_scheme() {
    let mut host = BufferHost::new(5);
    let view = host.open("a", "x\n");
    assert_eq!(host.view_scheme(view), Some(FILE_SCHEME));
    assert!(EligibilityPolicy::default().allows(Some(FILE_SCHEME)));
}

#[test]
fn custom_excluded_scheme_is_honoured() {
    let mut h = Harness::new(SyncOptions {
        eligibility: EligibilityPolicy::new(["scratch"]),
        ..SyncOptions::default()
    });
    let a = h.host.open("a", &lines_of(10, 100));
    let scratch = h.host.open_with_scheme("s", "scratch", &lines_of(10, 100));
    let now = Instant::now();
    h.pump(now);

    h.host.scroll_to(a, 30);
    h.pump(now);

    assert_eq!(h.top(scratch), 0);
}

#[test]
fn opening_a_view_resets_the_session() {
    let mut h = Harness::with_mode(AlignmentMode::Offset);
    let a = h.host.open("a", &lines_of(10, 100));
    h.host.open("b", &lines_of(10, 100));
    let now = Instant::now();
    h.pump(now);

    h.host.scroll_to(a, 10);
    h.pump(now);
    assert_eq!(h.engine.leader(), Some(a));

    h.host.open("c", &lines_of(10, 100));
    h.pump(now);

    assert_eq!(h.engine.leader(), None);
    assert!(h.engine.session().is_idle());
}

#[test]
fn jump_and_copy_agree_on_corresponding_line() {
    let mut h = Harness::with_mode(AlignmentMode::Normal);
    let a = h.host.open("a", "zero\none\ntwo\nthree\n");
    let b = h.host.open("b", "ZERO\nONE\nTWO\nTHREE\n");
    let now = Instant::now();
    h.pump(now);

    h.host
        .set_selection(a, Selection::new(Position::new(2, 0), Position::new(2, 3)));
    h.pump(now);

    let jump = h.engine.jump_to_next_corresponding_position(&h.host, a).unwrap();
    assert_eq!(jump.view, b);
    assert_eq!(
        jump.location,
        JumpLocation::Range(TextRange::new(Position::new(2, 0), Position::new(2, 3)))
    );

    let edits = h.engine.copy_to_all_corresponding_positions(&h.host, a);
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].text, "two");
    assert_eq!(edits[0].range, TextRange::new(Position::new(2, 0), Position::new(2, 3)));
    assert_eq!(h.host.text_in_range(b, edits[0].range), "TWO");
}

#[test]
fn highlight_follows_selection_and_is_disposed_on_toggle() {
    let mut h = Harness::with_mode(AlignmentMode::Normal);
    let a = h.host.open("a", &lines_of(40, 50));
    let b = h.host.open("b", &lines_of(80, 50));
    let now = Instant::now();
    h.pump(now);

    h.host
        .set_selection(a, Selection::new(Position::new(3, 10), Position::new(3, 20)));
    h.pump(now);

    let highlights: Vec<TextRange> = h.host.buffer(b).unwrap().highlights().copied().collect();
    assert_eq!(
        highlights,
        vec![TextRange::new(Position::new(3, 20), Position::new(3, 40))]
    );

    let _ = h.engine.toggle(&mut h.host);
    assert_eq!(h.host.buffer(b).unwrap().highlights().count(), 0);
}
