//! Scoresheet Editor WASM API
//!
//! This module provides the JavaScript-facing API for the scoresheet editor.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, validation, error handling, and logging
//! - `types`: Result records returned to JavaScript
//! - `core`: The exported session functions
//! - `canvas`: Stroke replay onto an HTML canvas
//! - `timers`: Browser intervals backing the metronome

pub mod helpers;
pub mod types;
pub mod canvas;
pub mod timers;
pub mod core;

// Re-export all public functions to keep a flat API
pub use core::*;
