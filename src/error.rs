//! Error types for the scoresheet core
//!
//! Nothing in here is fatal to an editing session. Placement errors are
//! warnings the host shows as a notice; the rest reject a single call.

use thiserror::Error;

use crate::models::{NoteId, TextId};

/// Non-fatal outcomes of automatic placement and line advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Every grid line is full; the note was not placed
    #[error("maximum lines reached: no grid line left for automatic placement")]
    Overflow,

    /// Enter was pressed on the last grid line
    #[error("already on the last line")]
    LastLineReached,
}

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog YAML is invalid: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("catalog JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate catalog symbol '{0}'")]
    DuplicateSymbol(char),

    #[error("catalog entry '{0}' has an empty name")]
    EmptyName(char),
}

/// Page setting validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("tempo {0} bpm out of range (20-300)")]
    TempoOutOfRange(u32),

    #[error("invalid time signature '{0}' (expected beats/unit, e.g. 3/4)")]
    InvalidTimeSignature(String),

    #[error("key signature must not be empty")]
    EmptyKeySignature,
}

/// Top-level error type for editor operations
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("invalid layout configuration: {0}")]
    Config(String),

    #[error("note {0} not found")]
    NoteNotFound(NoteId),

    #[error("text element {0} not found")]
    TextElementNotFound(TextId),

    #[error("manual placement is disabled while a drawing tool is active")]
    DrawingToolActive,

    #[error("MIDI input unavailable: {0}")]
    MidiUnavailable(String),

    #[error("timer error: {0}")]
    Timer(String),

    #[error("metronome stopped: {0}")]
    MetronomeStopped(String),

    #[error("{0}")]
    History(String),
}

pub type Result<T, E = ScoreError> = std::result::Result<T, E>;
