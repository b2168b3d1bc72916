//! Shared types for the WASM API
//!
//! This module contains common result types used across the exported functions.

use crate::drawing::DrawingState;
use crate::editor::{EditOutcome, ScoreEditor};
use crate::input::{InputSource, MidiAccess};
use crate::placement::PlacementCursor;

/// Result of an edit operation (mutation primitive)
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub outcome: EditOutcome,
    pub cursor: PlacementCursor,
    pub note_count: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl EditResult {
    pub fn from_editor(outcome: EditOutcome, editor: &ScoreEditor) -> Self {
        Self {
            outcome,
            cursor: editor.cursor(),
            note_count: editor.page().notes.len(),
            can_undo: editor.history().can_undo(),
            can_redo: editor.history().can_redo(),
        }
    }
}

/// Which host listeners should be attached
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListenerState {
    pub keyboard: bool,
    pub midi: bool,
    pub midi_access: MidiAccess,
}

impl ListenerState {
    pub fn from_editor(editor: &ScoreEditor) -> Self {
        let tracker = editor.router().tracker();
        Self {
            keyboard: tracker.is_live(InputSource::Keyboard),
            midi: tracker.is_live(InputSource::Midi),
            midi_access: editor.midi_access().clone(),
        }
    }
}

/// Result of a pointer event on the drawing surface
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    /// Committed strokes changed; the host should call `redrawStrokes`
    pub strokes_changed: bool,
    pub state: DrawingState,
    pub stroke_count: usize,
}

impl DrawResult {
    pub fn from_editor(strokes_changed: bool, editor: &ScoreEditor) -> Self {
        Self {
            strokes_changed,
            state: editor.surface().state(),
            stroke_count: editor.surface().strokes().len(),
        }
    }
}
