// Test the editing session: input modes, MIDI access, settings, metronome and text

use std::collections::HashMap;

use scoresheet_wasm::error::Result;
use scoresheet_wasm::input::{InputContext, InputSource, KeyInput, MidiAccess};
use scoresheet_wasm::metronome::{TimerHost, TimerId};
use scoresheet_wasm::{
    EditOutcome, PageSettingsPatch, PageSnapshot, ScoreEditor, ScoreError, TextElementPatch,
    TextId,
};

/// Records live intervals the way a browser window would
#[derive(Default)]
struct FakeTimers {
    next: i32,
    live: HashMap<TimerId, u32>,
    started: usize,
    refuse: bool,
}

impl TimerHost for FakeTimers {
    fn start_interval(&mut self, period_ms: u32) -> Result<TimerId> {
        if self.refuse {
            return Err(ScoreError::Timer("interval refused".to_string()));
        }
        let id = TimerId(self.next);
        self.next += 1;
        self.started += 1;
        self.live.insert(id, period_ms);
        Ok(id)
    }

    fn clear_interval(&mut self, id: TimerId) {
        self.live.remove(&id);
    }
}

fn placed_symbol(outcome: EditOutcome) -> Option<char> {
    match outcome {
        EditOutcome::Placed { note } => Some(note.symbol()),
        _ => None,
    }
}

#[test]
fn test_midi_and_keyboard_place_the_same_notation() {
    let mut editor = ScoreEditor::default();
    editor.midi_access_requested();
    editor.midi_access_granted();

    assert_eq!(placed_symbol(editor.handle_midi(&[0x90, 60, 100])), Some('a'));
    assert_eq!(placed_symbol(editor.handle_key(&KeyInput::new("a"))), Some('a'));
    assert_eq!(placed_symbol(editor.handle_midi(&[0x91, 86, 64])), Some('A'));

    let notes = &editor.page().notes;
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0].notation, notes[1].notation);
    assert_eq!(notes[1].x, 220.0);
}

#[test]
fn test_midi_ignored_until_access_granted() {
    let mut editor = ScoreEditor::default();
    assert_eq!(editor.handle_midi(&[0x90, 60, 100]), EditOutcome::Ignored);
    assert!(editor.set_midi_mode(true).is_err());
    assert!(!editor.is_input_enabled(InputSource::Midi));
}

#[test]
fn test_midi_failure_forces_mode_off() {
    let mut editor = ScoreEditor::default();
    editor.midi_access_granted();
    assert!(editor.is_input_enabled(InputSource::Midi));

    editor.midi_access_failed("permission denied");
    assert_eq!(editor.midi_access(), &MidiAccess::Failed("permission denied".to_string()));
    assert!(!editor.is_input_enabled(InputSource::Midi));
    assert!(matches!(editor.set_midi_mode(true), Err(ScoreError::MidiUnavailable(_))));
    assert_eq!(editor.handle_midi(&[0x90, 60, 100]), EditOutcome::Ignored);

    // keyboard is unaffected
    assert!(placed_symbol(editor.handle_key(&KeyInput::new("b"))).is_some());
}

#[test]
fn test_keyboard_mode_toggle() {
    let mut editor = ScoreEditor::default();
    editor.set_keyboard_mode(false);
    assert!(!editor.router().tracker().is_live(InputSource::Keyboard));
    assert_eq!(editor.handle_key(&KeyInput::new("a")), EditOutcome::Ignored);
    assert_eq!(editor.handle_key(&KeyInput::new("Backspace")), EditOutcome::Ignored);

    editor.set_keyboard_mode(true);
    editor.set_keyboard_mode(true);
    assert!(editor.router().tracker().is_live(InputSource::Keyboard));
    assert!(placed_symbol(editor.handle_key(&KeyInput::new("a"))).is_some());
}

#[test]
fn test_modal_and_text_mode_suppress_input() {
    let mut editor = ScoreEditor::default();
    editor.midi_access_granted();

    editor.set_input_context(InputContext { modal_open: true, ..Default::default() });
    assert_eq!(editor.handle_key(&KeyInput::new("a")), EditOutcome::Ignored);
    assert_eq!(editor.handle_midi(&[0x90, 62, 100]), EditOutcome::Ignored);

    editor.set_input_context(InputContext { text_mode: true, ..Default::default() });
    assert_eq!(editor.handle_key(&KeyInput::new("Enter")), EditOutcome::Ignored);

    editor.set_input_context(InputContext::default());
    assert_eq!(editor.handle_key(&KeyInput::in_editable("a")), EditOutcome::Ignored);
    assert!(editor.page().notes.is_empty());
}

#[test]
fn test_tempo_change_replaces_running_interval() {
    let mut editor = ScoreEditor::default();
    let mut timers = FakeTimers::default();

    editor.start_metronome(&mut timers).unwrap();
    editor.start_metronome(&mut timers).unwrap();
    assert_eq!(timers.live.len(), 1);
    assert_eq!(timers.live.values().copied().collect::<Vec<_>>(), vec![500]);

    editor.update_page_settings(&PageSettingsPatch::tempo(60), &mut timers).unwrap();
    assert_eq!(editor.page().settings.tempo_bpm, 60);
    assert_eq!(timers.live.len(), 1, "tempo change must not stack intervals");
    assert_eq!(timers.live.values().copied().collect::<Vec<_>>(), vec![1000]);

    editor.stop_metronome(&mut timers);
    assert!(timers.live.is_empty());
    assert!(!editor.metronome().is_running());
}

#[test]
fn test_tempo_change_while_stopped_starts_nothing() {
    let mut editor = ScoreEditor::default();
    let mut timers = FakeTimers::default();
    editor.update_page_settings(&PageSettingsPatch::tempo(90), &mut timers).unwrap();
    assert_eq!(timers.started, 0);
    assert_eq!(editor.metronome().tempo_bpm(), 90);
}

#[test]
fn test_invalid_settings_leave_page_unchanged() {
    let mut editor = ScoreEditor::default();
    let mut timers = FakeTimers::default();
    let before = editor.page().settings.clone();

    let patch = PageSettingsPatch {
        tempo_bpm: Some(100),
        time_signature: Some("7/9".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        editor.update_page_settings(&patch, &mut timers),
        Err(ScoreError::Settings(_))
    ));
    assert!(editor.update_page_settings(&PageSettingsPatch::tempo(500), &mut timers).is_err());
    assert_eq!(editor.page().settings, before);
    assert_eq!(editor.metronome().tempo_bpm(), 120);

    let patch = PageSettingsPatch {
        time_signature: Some("3/4".to_string()),
        key_signature: Some("G".to_string()),
        ..Default::default()
    };
    editor.update_page_settings(&patch, &mut timers).unwrap();
    assert_eq!(editor.page().settings.time_signature, "3/4");
    assert_eq!(editor.page().settings.key_signature, "G");
}

#[test]
fn test_text_elements_do_not_move_the_cursor() {
    let mut editor = ScoreEditor::default();
    editor.handle_key(&KeyInput::new("a"));
    let cursor = editor.cursor();

    let title = editor.add_text_element("Etude", 500.0, 100.0);
    assert_eq!(editor.cursor(), cursor);

    let patch = TextElementPatch {
        bold: Some(true),
        font_size: Some(24.0),
        ..Default::default()
    };
    let updated = editor.update_text_element(title.id, &patch).unwrap();
    assert!(updated.bold);
    assert_eq!(updated.font_size, 24.0);
    assert_eq!(updated.text, "Etude");

    editor.remove_text_element(title.id).unwrap();
    assert!(matches!(
        editor.remove_text_element(title.id),
        Err(ScoreError::TextElementNotFound(TextId(_)))
    ));
    assert_eq!(editor.cursor(), cursor);
}

#[test]
fn test_load_stops_running_metronome() {
    let mut editor = ScoreEditor::default();
    let mut timers = FakeTimers::default();
    editor.start_metronome(&mut timers).unwrap();

    let mut snapshot = PageSnapshot::default();
    snapshot.page.settings.tempo_bpm = 90;
    editor.load(snapshot, &mut timers);
    assert!(timers.live.is_empty(), "loading a page must clear the old interval");
    assert!(!editor.metronome().is_running());
    assert_eq!(editor.metronome().tempo_bpm(), 90);

    editor.stop_metronome(&mut timers);
    editor.start_metronome(&mut timers).unwrap();
    assert_eq!(timers.live.len(), 1);
    assert_eq!(timers.live.values().copied().collect::<Vec<_>>(), vec![666]);
}

#[test]
fn test_failed_retime_keeps_page_tempo() {
    let mut editor = ScoreEditor::default();
    let mut timers = FakeTimers::default();
    editor.start_metronome(&mut timers).unwrap();

    timers.refuse = true;
    let patch = PageSettingsPatch {
        tempo_bpm: Some(60),
        key_signature: Some("D".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        editor.update_page_settings(&patch, &mut timers),
        Err(ScoreError::MetronomeStopped(_))
    ));
    assert_eq!(editor.page().settings.tempo_bpm, 120);
    assert_eq!(editor.page().settings.key_signature, "C");
    assert!(!editor.metronome().is_running());
    assert!(timers.live.is_empty());

    timers.refuse = false;
    editor.start_metronome(&mut timers).unwrap();
    assert_eq!(timers.live.values().copied().collect::<Vec<_>>(), vec![500]);
}
