//! Score page: the data container mutated by the placement pipeline
//!
//! The page owns the ordered note list, the text elements and the page
//! settings. Everything outside this module mutates it through [`ScoreHost`]
//! or the explicit text/settings operations; nobody keeps a cached copy.

use serde::{Deserialize, Serialize};

use super::placed::{NoteId, PlacedNotation};
use super::text::{TextElement, TextElementPatch, TextId};
use crate::error::SettingsError;

pub const DEFAULT_TEMPO_BPM: u32 = 120;
pub const MIN_TEMPO_BPM: u32 = 20;
pub const MAX_TEMPO_BPM: u32 = 300;

/// Mutation callbacks the placement core calls outward
pub trait ScoreHost {
    /// Current notes in placement order
    fn notes(&self) -> &[PlacedNotation];

    /// Allocate a fresh note id
    fn allocate_note_id(&mut self) -> NoteId;

    fn add_note(&mut self, note: PlacedNotation);

    fn remove_note(&mut self, id: NoteId) -> Option<PlacedNotation>;

    /// Remove every note, returning them in placement order
    fn clear_page(&mut self) -> Vec<PlacedNotation>;

    fn update_page_settings(&mut self, patch: &PageSettingsPatch) -> Result<(), SettingsError>;
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LabelPosition {
    pub x: f64,
    pub y: f64,
}

/// Page-level settings shown in the info label
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub tempo_bpm: u32,
    pub time_signature: String,
    pub key_signature: String,
    pub info_label: LabelPosition,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            tempo_bpm: DEFAULT_TEMPO_BPM,
            time_signature: "4/4".to_string(),
            key_signature: "C".to_string(),
            info_label: LabelPosition { x: 40.0, y: 60.0 },
        }
    }
}

/// Partial settings update; absent fields are left unchanged
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettingsPatch {
    pub tempo_bpm: Option<u32>,
    pub time_signature: Option<String>,
    pub key_signature: Option<String>,
    pub info_label: Option<LabelPosition>,
}

impl PageSettingsPatch {
    pub fn tempo(tempo_bpm: u32) -> Self {
        Self {
            tempo_bpm: Some(tempo_bpm),
            ..Default::default()
        }
    }

    /// Validate every present field
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(tempo) = self.tempo_bpm {
            if !(MIN_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&tempo) {
                return Err(SettingsError::TempoOutOfRange(tempo));
            }
        }
        if let Some(time_signature) = &self.time_signature {
            validate_time_signature(time_signature)?;
        }
        if let Some(key) = &self.key_signature {
            if key.trim().is_empty() {
                return Err(SettingsError::EmptyKeySignature);
            }
        }
        Ok(())
    }
}

fn validate_time_signature(text: &str) -> Result<(), SettingsError> {
    let invalid = || SettingsError::InvalidTimeSignature(text.to_string());
    let (beats, unit) = text.split_once('/').ok_or_else(invalid)?;
    let beats: u32 = beats.trim().parse().map_err(|_| invalid())?;
    let unit: u32 = unit.trim().parse().map_err(|_| invalid())?;
    if !(1..=32).contains(&beats) || !unit.is_power_of_two() || unit > 64 {
        return Err(invalid());
    }
    Ok(())
}

impl PageSettings {
    /// Apply a patch atomically: nothing changes unless every field is valid
    pub fn apply(&mut self, patch: &PageSettingsPatch) -> Result<(), SettingsError> {
        patch.validate()?;
        if let Some(tempo) = patch.tempo_bpm {
            self.tempo_bpm = tempo;
        }
        if let Some(time_signature) = &patch.time_signature {
            self.time_signature = time_signature.trim().to_string();
        }
        if let Some(key) = &patch.key_signature {
            self.key_signature = key.trim().to_string();
        }
        if let Some(label) = patch.info_label {
            self.info_label = label;
        }
        Ok(())
    }
}

/// One scoresheet page
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScorePage {
    pub notes: Vec<PlacedNotation>,
    pub text_elements: Vec<TextElement>,
    pub settings: PageSettings,
    next_note_id: u64,
    next_text_id: u64,
}

impl ScorePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move id counters past every loaded id so new ids stay unique
    pub fn normalize_ids(&mut self) {
        let max_note = self.notes.iter().map(|n| n.id.0 + 1).max().unwrap_or(0);
        let max_text = self.text_elements.iter().map(|t| t.id.0 + 1).max().unwrap_or(0);
        self.next_note_id = self.next_note_id.max(max_note);
        self.next_text_id = self.next_text_id.max(max_text);
    }

    pub fn note(&self, id: NoteId) -> Option<&PlacedNotation> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn note_index(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    pub fn last_note(&self) -> Option<&PlacedNotation> {
        self.notes.last()
    }

    /// Reinsert a note at a given index (used by undo)
    pub fn insert_note(&mut self, index: usize, note: PlacedNotation) {
        let index = index.min(self.notes.len());
        self.notes.insert(index, note);
    }

    pub fn add_text_element(&mut self, text: impl Into<String>, x: f64, y: f64) -> &TextElement {
        let id = TextId(self.next_text_id);
        self.next_text_id += 1;
        self.text_elements.push(TextElement::new(id, text, x, y));
        &self.text_elements[self.text_elements.len() - 1]
    }

    pub fn update_text_element(&mut self, id: TextId, patch: &TextElementPatch) -> Option<&TextElement> {
        let element = self.text_elements.iter_mut().find(|t| t.id == id)?;
        element.apply(patch);
        Some(&*element)
    }

    pub fn remove_text_element(&mut self, id: TextId) -> Option<TextElement> {
        let index = self.text_elements.iter().position(|t| t.id == id)?;
        Some(self.text_elements.remove(index))
    }
}

impl ScoreHost for ScorePage {
    fn notes(&self) -> &[PlacedNotation] {
        &self.notes
    }

    fn allocate_note_id(&mut self) -> NoteId {
        let id = NoteId(self.next_note_id);
        self.next_note_id += 1;
        id
    }

    fn add_note(&mut self, note: PlacedNotation) {
        self.notes.push(note);
    }

    fn remove_note(&mut self, id: NoteId) -> Option<PlacedNotation> {
        let index = self.note_index(id)?;
        Some(self.notes.remove(index))
    }

    fn clear_page(&mut self) -> Vec<PlacedNotation> {
        std::mem::take(&mut self.notes)
    }

    fn update_page_settings(&mut self, patch: &PageSettingsPatch) -> Result<(), SettingsError> {
        self.settings.apply(patch)
    }
}
