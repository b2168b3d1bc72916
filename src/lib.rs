//! Scoresheet Editor WASM Module
//!
//! Core of the browser scoresheet editor: turns keyboard keys and MIDI
//! note-on messages into notation placements on a fixed line grid, and
//! captures freehand pen strokes with a vector eraser.

pub mod config;
pub mod drawing;
pub mod editor;
pub mod error;
pub mod input;
pub mod metronome;
pub mod models;
pub mod placement;
pub mod undo;
pub mod api;

// Re-export commonly used types
pub use config::{EditorConfig, LayoutConfig};
pub use editor::{EditOutcome, PageSnapshot, ScoreEditor};
pub use error::{PlacementError, ScoreError};
pub use models::*;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        return;
    }

    log::info!("Scoresheet editor WASM module initialized");
}
