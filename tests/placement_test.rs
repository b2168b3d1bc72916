// Test automatic placement: line wrap, overflow, delete-last and cursor resync

use scoresheet_wasm::input::KeyInput;
use scoresheet_wasm::placement::PlacementCursor;
use scoresheet_wasm::error::Result;
use scoresheet_wasm::metronome::{TimerHost, TimerId};
use scoresheet_wasm::{EditOutcome, PageSnapshot, ScoreEditor};

/// Timer host for sessions that never start the metronome
struct NoTimers;

impl TimerHost for NoTimers {
    fn start_interval(&mut self, _period_ms: u32) -> Result<TimerId> {
        Ok(TimerId(0))
    }

    fn clear_interval(&mut self, _id: TimerId) {}
}

/// Press a key and return the placed note's position
fn place(editor: &mut ScoreEditor, key: &str) -> (f64, f64) {
    match editor.handle_key(&KeyInput::new(key)) {
        EditOutcome::Placed { note } => (note.x, note.y),
        other => panic!("expected a placement, got {:?}", other),
    }
}

#[test]
fn test_seventeenth_note_wraps_to_second_line() {
    let mut editor = ScoreEditor::default();

    for i in 0..16 {
        let (x, y) = place(&mut editor, "a");
        assert_eq!(x, 170.0 + 50.0 * i as f64);
        assert_eq!(y, 230.0, "note {} should stay on the first line", i + 1);
    }

    let (x, y) = place(&mut editor, "a");
    assert_eq!((x, y), (170.0, 340.0));
    assert_eq!(editor.cursor(), PlacementCursor { next_x: 220.0, line_index: 1 });
}

#[test]
fn test_overflow_after_last_line_places_nothing() {
    let mut editor = ScoreEditor::default();

    // 16 notes fit on each of the 11 lines
    let mut placed = 0;
    loop {
        match editor.handle_key(&KeyInput::new("b")) {
            EditOutcome::Placed { .. } => placed += 1,
            EditOutcome::MaxLinesReached => break,
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(placed < 1000, "placement never overflowed");
    }

    assert_eq!(placed, 16 * 11);
    assert_eq!(editor.page().notes.len(), placed);
    let cursor = editor.cursor();

    // further attempts do not mutate anything
    assert_eq!(editor.handle_key(&KeyInput::new("b")), EditOutcome::MaxLinesReached);
    assert_eq!(editor.cursor(), cursor);
    assert_eq!(editor.page().notes.len(), placed);
}

#[test]
fn test_note_count_matches_successful_placements() {
    let mut editor = ScoreEditor::default();
    let keys = ["a", "x", "Shift", "9", "C", "Enter", "d"];
    let mut successes = 0;
    for key in keys {
        if let EditOutcome::Placed { .. } = editor.handle_key(&KeyInput::new(key)) {
            successes += 1;
        }
    }
    assert_eq!(successes, 4);
    assert_eq!(editor.page().notes.len(), successes);
}

#[test]
fn test_delete_last_removes_latest_insertion() {
    let mut editor = ScoreEditor::default();
    place(&mut editor, "a");
    place(&mut editor, "b");
    place(&mut editor, "c");
    let latest = editor.page().notes.last().unwrap().id;

    match editor.handle_key(&KeyInput::new("Backspace")) {
        EditOutcome::Removed { note } => {
            assert_eq!(note.id, latest);
            assert_eq!(note.symbol(), 'c');
        }
        other => panic!("expected removal, got {:?}", other),
    }
    assert_eq!(editor.page().notes.len(), 2);
    assert_eq!(editor.cursor(), PlacementCursor { next_x: 270.0, line_index: 0 });

    editor.handle_key(&KeyInput::new("Backspace"));
    editor.handle_key(&KeyInput::new("Backspace"));
    assert!(editor.page().notes.is_empty());
    assert_eq!(editor.cursor(), PlacementCursor { next_x: 170.0, line_index: 0 });
    assert_eq!(editor.handle_key(&KeyInput::new("Backspace")), EditOutcome::NothingToRemove);
}

#[test]
fn test_enter_moves_to_next_line() {
    let mut editor = ScoreEditor::default();
    place(&mut editor, "a");
    place(&mut editor, "a");
    assert_eq!(
        editor.handle_key(&KeyInput::new("Enter")),
        EditOutcome::LineAdvanced { line_index: 1 }
    );
    assert_eq!(place(&mut editor, "a"), (170.0, 340.0));
}

#[test]
fn test_enter_on_last_line_is_noop() {
    let mut editor = ScoreEditor::default();
    for _ in 0..10 {
        editor.handle_key(&KeyInput::new("Enter"));
    }
    assert_eq!(editor.cursor().line_index, 10);
    let before = editor.cursor();

    let outcome = editor.handle_key(&KeyInput::new("Enter"));
    assert_eq!(outcome, EditOutcome::LastLineReached);
    assert!(outcome.is_warning());
    assert_eq!(editor.cursor(), before);
}

#[test]
fn test_manual_click_is_clamped_and_off_grid() {
    let mut editor = ScoreEditor::default();
    let note = editor.place_at('e', 5.0, 2000.0).unwrap().unwrap();
    assert_eq!((note.x, note.y), (20.0, 1480.0));

    // off-grid last note: cursor falls back to the first line
    assert_eq!(editor.cursor(), PlacementCursor { next_x: 70.0, line_index: 0 });

    assert!(editor.place_at('~', 300.0, 300.0).unwrap().is_none());
}

#[test]
fn test_undo_redo_resyncs_cursor() {
    let mut editor = ScoreEditor::default();
    place(&mut editor, "a");
    place(&mut editor, "b");

    editor.undo().unwrap();
    assert_eq!(editor.page().notes.len(), 1);
    assert_eq!(editor.cursor(), PlacementCursor { next_x: 220.0, line_index: 0 });

    editor.redo().unwrap();
    assert_eq!(editor.page().notes.len(), 2);
    assert_eq!(editor.cursor(), PlacementCursor { next_x: 270.0, line_index: 0 });

    editor.undo().unwrap();
    editor.undo().unwrap();
    assert!(editor.undo().is_err());
    assert_eq!(editor.cursor(), PlacementCursor { next_x: 170.0, line_index: 0 });
}

#[test]
fn test_clear_page_is_undoable() {
    let mut editor = ScoreEditor::default();
    place(&mut editor, "a");
    place(&mut editor, "b");

    let removed = editor.clear_page();
    assert_eq!(removed.len(), 2);
    assert_eq!(editor.cursor(), PlacementCursor { next_x: 170.0, line_index: 0 });

    editor.undo().unwrap();
    assert_eq!(editor.page().notes.len(), 2);
    assert_eq!(editor.cursor().next_x, 270.0);
}

#[test]
fn test_load_resyncs_and_keeps_ids_unique() {
    let mut source = ScoreEditor::default();
    place(&mut source, "a");
    for _ in 0..3 {
        source.handle_key(&KeyInput::new("Enter"));
    }
    place(&mut source, "b");
    let json = serde_json::to_string(&source.snapshot()).unwrap();

    let mut editor = ScoreEditor::default();
    let snapshot: PageSnapshot = serde_json::from_str(&json).unwrap();
    editor.load(snapshot, &mut NoTimers);

    assert_eq!(editor.cursor(), PlacementCursor { next_x: 220.0, line_index: 3 });
    assert!(!editor.history().can_undo());

    let (_, y) = place(&mut editor, "c");
    assert_eq!(y, 560.0);
    let ids: Vec<u64> = editor.page().notes.iter().map(|n| n.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}
