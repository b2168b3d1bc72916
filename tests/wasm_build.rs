//! WASM build test
//!
//! This module tests that the WASM module can be built and the exported
//! session functions work end to end in a browser.

#![cfg(target_arch = "wasm32")]

use scoresheet_wasm::api::types::EditResult;
use scoresheet_wasm::api::*;
use scoresheet_wasm::placement::PlacementCursor;
use scoresheet_wasm::EditOutcome;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn fresh_session() {
    create_session(JsValue::UNDEFINED).unwrap();
}

fn cursor() -> PlacementCursor {
    serde_wasm_bindgen::from_value(get_cursor().unwrap()).unwrap()
}

#[wasm_bindgen_test]
fn test_session_creation() {
    fresh_session();
    assert_eq!(cursor(), PlacementCursor { next_x: 170.0, line_index: 0 });
}

#[wasm_bindgen_test]
fn test_key_places_note() {
    fresh_session();
    let result: EditResult = serde_wasm_bindgen::from_value(handle_key("a".to_string(), false).unwrap()).unwrap();
    assert!(matches!(result.outcome, EditOutcome::Placed { .. }));
    assert_eq!(result.note_count, 1);
    assert!(result.can_undo);
    assert_eq!(cursor().next_x, 220.0);
}

#[wasm_bindgen_test]
fn test_editable_focus_is_ignored() {
    fresh_session();
    let result: EditResult = serde_wasm_bindgen::from_value(handle_key("a".to_string(), true).unwrap()).unwrap();
    assert_eq!(result.outcome, EditOutcome::Ignored);
    assert_eq!(result.note_count, 0);
}

#[wasm_bindgen_test]
fn test_midi_message_after_grant() {
    fresh_session();
    midi_access_granted().unwrap();
    let result: EditResult =
        serde_wasm_bindgen::from_value(handle_midi_message(vec![0x90, 60, 100]).unwrap()).unwrap();
    assert_eq!(result.note_count, 1);
}

#[wasm_bindgen_test]
fn test_invalid_symbol_rejected() {
    fresh_session();
    assert!(place_at("ab".to_string(), 300.0, 300.0).is_err());
    assert!(place_at("a".to_string(), f64::NAN, 300.0).is_err());
}

#[wasm_bindgen_test]
fn test_page_round_trip() {
    fresh_session();
    handle_key("c".to_string(), false).unwrap();
    handle_key("Enter".to_string(), false).unwrap();
    handle_key("d".to_string(), false).unwrap();
    let page = get_page().unwrap();

    fresh_session();
    load_page(page).unwrap();
    assert_eq!(cursor(), PlacementCursor { next_x: 220.0, line_index: 1 });
}
