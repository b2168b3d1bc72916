//! WASM API for the scoresheet editing session
//!
//! One session lives in WASM-owned storage. Every exported call locks it,
//! applies one operation and returns a plain serde record to JavaScript.

use lazy_static::lazy_static;
use std::sync::Mutex;
use wasm_bindgen::prelude::*;

use super::canvas::CanvasTarget;
use super::helpers::{
    deserialize, deserialize_or_default, score_error, serialize, validate_coordinate,
    validate_symbol, validation_error,
};
use super::timers::{clear_tick_handler, set_tick_handler, BrowserTimers};
use super::types::{DrawResult, EditResult, ListenerState};
use crate::config::EditorConfig;
use crate::drawing::ActiveTool;
use crate::editor::{EditOutcome, PageSnapshot, ScoreEditor};
use crate::input::{InputContext, KeyInput};
use crate::models::{
    Notation, NotationCatalog, NoteId, PageSettingsPatch, TextElementPatch, TextId,
};
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

// WASM-owned session storage (canonical source of truth)
lazy_static! {
    static ref EDITOR: Mutex<Option<ScoreEditor>> = Mutex::new(None);
}

fn with_editor<T>(f: impl FnOnce(&mut ScoreEditor) -> Result<T, JsValue>) -> Result<T, JsValue> {
    let mut guard = EDITOR
        .lock()
        .map_err(|_| validation_error("Editor session lock poisoned"))?;
    let editor = guard
        .as_mut()
        .ok_or_else(|| validation_error("No session: call createSession first"))?;
    f(editor)
}

fn edit_result(outcome: EditOutcome, editor: &ScoreEditor) -> Result<JsValue, JsValue> {
    if outcome.is_warning() {
        wasm_warn!("{:?}", outcome);
    }
    serialize(&EditResult::from_editor(outcome, editor), "EditResult serialization error")
}

// ============================================================================
// Session
// ============================================================================

/// Create (or replace) the editing session
///
/// # Parameters
/// - `config_js`: optional `EditorConfig` object; missing fields use defaults
///
/// # Returns
/// The empty page snapshot
#[wasm_bindgen(js_name = createSession)]
pub fn create_session(config_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("createSession called");

    let config: EditorConfig = deserialize_or_default(config_js, "Invalid editor config")?;
    let editor = ScoreEditor::new(config).map_err(score_error)?;
    let snapshot = editor.snapshot();
    let mut guard = EDITOR
        .lock()
        .map_err(|_| validation_error("Editor session lock poisoned"))?;
    *guard = Some(editor);

    wasm_info!("createSession completed successfully");
    serialize(&snapshot, "Page serialization error")
}

#[wasm_bindgen(js_name = getPage)]
pub fn get_page() -> Result<JsValue, JsValue> {
    with_editor(|editor| serialize(&editor.snapshot(), "Page serialization error"))
}

/// Replace the page with a saved snapshot (notes, text, settings, strokes)
#[wasm_bindgen(js_name = loadPage)]
pub fn load_page(snapshot_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("loadPage called");
    let snapshot: PageSnapshot = deserialize(snapshot_js, "Invalid page snapshot")?;
    with_editor(|editor| {
        editor.load(snapshot, &mut BrowserTimers);
        serialize(&editor.cursor(), "Cursor serialization error")
    })
}

#[wasm_bindgen(js_name = getCursor)]
pub fn get_cursor() -> Result<JsValue, JsValue> {
    with_editor(|editor| serialize(&editor.cursor(), "Cursor serialization error"))
}

// ============================================================================
// Keyboard / MIDI input
// ============================================================================

/// Route a key press through the placement pipeline
///
/// # Parameters
/// - `key`: browser key name (`KeyboardEvent.key`)
/// - `target_editable`: focus is inside an input-like control
#[wasm_bindgen(js_name = handleKey)]
pub fn handle_key(key: String, target_editable: bool) -> Result<JsValue, JsValue> {
    wasm_log!("handleKey called: key={:?}, editable={}", key, target_editable);
    let input = KeyInput { key, target_editable };
    with_editor(|editor| {
        let outcome = editor.handle_key(&input);
        edit_result(outcome, editor)
    })
}

/// Route a raw MIDI message (`MIDIMessageEvent.data`)
#[wasm_bindgen(js_name = handleMidiMessage)]
pub fn handle_midi_message(data: Vec<u8>) -> Result<JsValue, JsValue> {
    wasm_log!("handleMidiMessage called: {:02X?}", data);
    with_editor(|editor| {
        let outcome = editor.handle_midi(&data);
        edit_result(outcome, editor)
    })
}

/// Update modal / tool / text-mode state used by the suppression rules
#[wasm_bindgen(js_name = setInputContext)]
pub fn set_input_context(context_js: JsValue) -> Result<(), JsValue> {
    let context: InputContext = deserialize(context_js, "Invalid input context")?;
    wasm_log!("setInputContext: {:?}", context);
    with_editor(|editor| {
        editor.set_input_context(context);
        Ok(())
    })
}

#[wasm_bindgen(js_name = setKeyboardMode)]
pub fn set_keyboard_mode(enabled: bool) -> Result<JsValue, JsValue> {
    wasm_info!("setKeyboardMode: {}", enabled);
    with_editor(|editor| {
        editor.set_keyboard_mode(enabled);
        serialize(&ListenerState::from_editor(editor), "Listener state serialization error")
    })
}

/// Turn MIDI mode on or off. Turning it on fails until access is granted.
#[wasm_bindgen(js_name = setMidiMode)]
pub fn set_midi_mode(enabled: bool) -> Result<JsValue, JsValue> {
    wasm_info!("setMidiMode: {}", enabled);
    with_editor(|editor| {
        editor.set_midi_mode(enabled).map_err(score_error)?;
        serialize(&ListenerState::from_editor(editor), "Listener state serialization error")
    })
}

#[wasm_bindgen(js_name = getListenerState)]
pub fn get_listener_state() -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        serialize(&ListenerState::from_editor(editor), "Listener state serialization error")
    })
}

#[wasm_bindgen(js_name = midiAccessRequested)]
pub fn midi_access_requested() -> Result<(), JsValue> {
    with_editor(|editor| {
        editor.midi_access_requested();
        Ok(())
    })
}

#[wasm_bindgen(js_name = midiAccessGranted)]
pub fn midi_access_granted() -> Result<JsValue, JsValue> {
    wasm_info!("MIDI access granted");
    with_editor(|editor| {
        editor.midi_access_granted();
        serialize(&ListenerState::from_editor(editor), "Listener state serialization error")
    })
}

#[wasm_bindgen(js_name = midiAccessFailed)]
pub fn midi_access_failed(reason: String) -> Result<JsValue, JsValue> {
    wasm_error!("MIDI access failed: {}", reason);
    with_editor(|editor| {
        editor.midi_access_failed(&reason);
        serialize(&ListenerState::from_editor(editor), "Listener state serialization error")
    })
}

#[wasm_bindgen(js_name = midiUnsupported)]
pub fn midi_unsupported() -> Result<JsValue, JsValue> {
    wasm_warn!("Web MIDI API not supported in this browser");
    with_editor(|editor| {
        editor.midi_unsupported();
        serialize(&ListenerState::from_editor(editor), "Listener state serialization error")
    })
}

// ============================================================================
// Note edits
// ============================================================================

/// Place a notation where the user clicked
///
/// # Returns
/// The placed note, or `undefined` if the symbol has no notation
#[wasm_bindgen(js_name = placeAt)]
pub fn place_at(symbol: String, x: f64, y: f64) -> Result<JsValue, JsValue> {
    wasm_info!("placeAt called: symbol={:?}, x={}, y={}", symbol, x, y);
    let symbol = validate_symbol(&symbol).map_err(validation_error)?;
    validate_coordinate(x, "x").map_err(validation_error)?;
    validate_coordinate(y, "y").map_err(validation_error)?;

    with_editor(|editor| {
        let note = editor.place_at(symbol, x, y).map_err(score_error)?;
        serialize(&note, "Note serialization error")
    })
}

#[wasm_bindgen(js_name = removeNote)]
pub fn remove_note(id: u32) -> Result<JsValue, JsValue> {
    wasm_info!("removeNote called: id={}", id);
    with_editor(|editor| {
        let note = editor.remove_note(NoteId(u64::from(id))).map_err(score_error)?;
        edit_result(EditOutcome::Removed { note }, editor)
    })
}

#[wasm_bindgen(js_name = clearPage)]
pub fn clear_page() -> Result<JsValue, JsValue> {
    wasm_info!("clearPage called");
    with_editor(|editor| {
        let removed = editor.clear_page();
        wasm_log!("  Removed {} note(s)", removed.len());
        serialize(&editor.cursor(), "Cursor serialization error")
    })
}

/// Undo the last note edit
#[wasm_bindgen(js_name = undo)]
pub fn undo() -> Result<JsValue, JsValue> {
    wasm_info!("undo called");
    with_editor(|editor| {
        editor.undo().map_err(score_error)?;
        serialize(&editor.snapshot(), "Page serialization error")
    })
}

/// Redo the last undone note edit
#[wasm_bindgen(js_name = redo)]
pub fn redo() -> Result<JsValue, JsValue> {
    wasm_info!("redo called");
    with_editor(|editor| {
        editor.redo().map_err(score_error)?;
        serialize(&editor.snapshot(), "Page serialization error")
    })
}

// ============================================================================
// Text elements and page settings
// ============================================================================

#[wasm_bindgen(js_name = addTextElement)]
pub fn add_text_element(text: String, x: f64, y: f64) -> Result<JsValue, JsValue> {
    wasm_info!("addTextElement called: x={}, y={}", x, y);
    validate_coordinate(x, "x").map_err(validation_error)?;
    validate_coordinate(y, "y").map_err(validation_error)?;
    with_editor(|editor| {
        let element = editor.add_text_element(&text, x, y);
        serialize(&element, "Text element serialization error")
    })
}

#[wasm_bindgen(js_name = updateTextElement)]
pub fn update_text_element(id: u32, patch_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("updateTextElement called: id={}", id);
    let patch: TextElementPatch = deserialize(patch_js, "Invalid text element patch")?;
    with_editor(|editor| {
        let element = editor
            .update_text_element(TextId(u64::from(id)), &patch)
            .map_err(score_error)?;
        serialize(&element, "Text element serialization error")
    })
}

#[wasm_bindgen(js_name = removeTextElement)]
pub fn remove_text_element(id: u32) -> Result<JsValue, JsValue> {
    wasm_info!("removeTextElement called: id={}", id);
    with_editor(|editor| {
        let element = editor
            .remove_text_element(TextId(u64::from(id)))
            .map_err(score_error)?;
        serialize(&element, "Text element serialization error")
    })
}

/// Apply a partial settings update (tempo, time/key signature, label position)
#[wasm_bindgen(js_name = updatePageSettings)]
pub fn update_page_settings(patch_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("updatePageSettings called");
    let patch: PageSettingsPatch = deserialize(patch_js, "Invalid page settings")?;
    with_editor(|editor| {
        editor
            .update_page_settings(&patch, &mut BrowserTimers)
            .map_err(score_error)?;
        serialize(&editor.page().settings, "Settings serialization error")
    })
}

// ============================================================================
// Metronome
// ============================================================================

/// Start the metronome; `on_tick` is called once per beat
#[wasm_bindgen(js_name = startMetronome)]
pub fn start_metronome(on_tick: js_sys::Function) -> Result<(), JsValue> {
    wasm_info!("startMetronome called");
    set_tick_handler(on_tick);
    with_editor(|editor| editor.start_metronome(&mut BrowserTimers).map_err(score_error))
}

#[wasm_bindgen(js_name = stopMetronome)]
pub fn stop_metronome() -> Result<(), JsValue> {
    wasm_info!("stopMetronome called");
    with_editor(|editor| {
        editor.stop_metronome(&mut BrowserTimers);
        Ok(())
    })?;
    clear_tick_handler();
    Ok(())
}

// ============================================================================
// Drawing
// ============================================================================

/// Select `"none"`, `"pen"` or `"eraser"`
#[wasm_bindgen(js_name = setActiveTool)]
pub fn set_active_tool(tool_js: JsValue) -> Result<JsValue, JsValue> {
    let tool: ActiveTool = deserialize(tool_js, "Invalid tool")?;
    wasm_info!("setActiveTool: {:?}", tool);
    with_editor(|editor| {
        let changed = editor.set_active_tool(tool);
        serialize(&DrawResult::from_editor(changed, editor), "DrawResult serialization error")
    })
}

#[wasm_bindgen(js_name = pointerDown)]
pub fn pointer_down(x: f64, y: f64) -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let changed = editor.pointer_down(x, y);
        serialize(&DrawResult::from_editor(changed, editor), "DrawResult serialization error")
    })
}

#[wasm_bindgen(js_name = pointerMove)]
pub fn pointer_move(x: f64, y: f64) -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let changed = editor.pointer_move(x, y);
        serialize(&DrawResult::from_editor(changed, editor), "DrawResult serialization error")
    })
}

#[wasm_bindgen(js_name = pointerUp)]
pub fn pointer_up() -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let changed = editor.pointer_up();
        serialize(&DrawResult::from_editor(changed, editor), "DrawResult serialization error")
    })
}

#[wasm_bindgen(js_name = pointerLeave)]
pub fn pointer_leave() -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let changed = editor.pointer_leave();
        serialize(&DrawResult::from_editor(changed, editor), "DrawResult serialization error")
    })
}

/// Clear the canvas and replay every committed stroke
#[wasm_bindgen(js_name = redrawStrokes)]
pub fn redraw_strokes(canvas: web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
    let mut target = CanvasTarget::from_canvas(&canvas)?;
    with_editor(|editor| {
        editor.redraw(&mut target);
        Ok(())
    })
}

#[wasm_bindgen(js_name = clearDrawing)]
pub fn clear_drawing() -> Result<usize, JsValue> {
    wasm_info!("clearDrawing called");
    with_editor(|editor| Ok(editor.clear_drawing().len()))
}

// ============================================================================
// Catalog
// ============================================================================

#[wasm_bindgen(js_name = getCatalog)]
pub fn get_catalog() -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let entries: Vec<&Notation> = editor.catalog().entries().collect();
        serialize(&entries, "Catalog serialization error")
    })
}

/// Replace the notation catalog
///
/// # Parameters
/// - `text`: catalog source
/// - `format`: `"yaml"` or `"json"`
#[wasm_bindgen(js_name = loadCatalog)]
pub fn load_catalog(text: String, format: String) -> Result<usize, JsValue> {
    wasm_info!("loadCatalog called: format={}", format);
    let catalog = match format.as_str() {
        "yaml" | "yml" => NotationCatalog::from_yaml(&text),
        "json" => NotationCatalog::from_json(&text),
        other => return Err(validation_error(format!("Unknown catalog format '{}'", other))),
    }
    .map_err(|e| validation_error(e.to_string()))?;

    let count = catalog.len();
    with_editor(|editor| {
        editor.set_catalog(catalog);
        Ok(count)
    })
}
