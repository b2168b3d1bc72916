//! Notes placed on the page

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::notation::Notation;

/// Page-unique note id, increasing in generation order
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct NoteId(pub u64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A notation placed at page-relative pixel coordinates
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacedNotation {
    pub id: NoteId,
    pub notation: Arc<Notation>,
    pub x: f64,
    pub y: f64,
    /// Reserved; layout does not read it
    #[serde(default)]
    pub stave_index: Option<u32>,
    /// Reserved; layout does not read it
    #[serde(default)]
    pub octave: Option<i8>,
}

impl PlacedNotation {
    pub fn new(id: NoteId, notation: Arc<Notation>, x: f64, y: f64) -> Self {
        Self {
            id,
            notation,
            x,
            y,
            stave_index: None,
            octave: None,
        }
    }

    pub fn symbol(&self) -> char {
        self.notation.symbol
    }
}
