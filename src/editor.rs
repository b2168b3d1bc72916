//! Editing session
//!
//! `ScoreEditor` owns one page and everything that acts on it: the input
//! router, the placement engine and its cursor, the drawing surface, the
//! undo history and the metronome. Raw events go in, page mutations and an
//! [`EditOutcome`] come out.
//!
//! After every note-list mutation (placement, removal, clear, undo, redo,
//! load) the cursor is rebuilt from the list with `resync`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::drawing::{ActiveTool, DrawingSurface, Point, RenderTarget, Stroke};
use crate::error::{Result, ScoreError};
use crate::input::{InputCommand, InputContext, InputRouter, InputSource, KeyInput, MidiAccess};
use crate::metronome::{Metronome, TimerHost};
use crate::models::{
    Notation, NotationCatalog, NoteId, PageSettingsPatch, PlacedNotation, ScoreHost, ScorePage,
    TextElement, TextElementPatch, TextId,
};
use crate::placement::{PlacementCursor, PlacementEngine};
use crate::undo::{Command, UndoStack};

/// What an input event or edit did
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EditOutcome {
    /// Suppressed or unmapped input
    Ignored,
    Placed { note: PlacedNotation },
    Removed { note: PlacedNotation },
    /// Delete-last with an empty page
    NothingToRemove,
    #[serde(rename_all = "camelCase")]
    LineAdvanced { line_index: usize },
    /// Automatic placement ran out of grid lines
    MaxLinesReached,
    /// Enter on the last grid line
    LastLineReached,
}

impl EditOutcome {
    /// Outcomes the host should surface as a notice
    pub fn is_warning(&self) -> bool {
        matches!(self, EditOutcome::MaxLinesReached | EditOutcome::LastLineReached)
    }
}

/// Saved form of a page with its drawing
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSnapshot {
    pub page: ScorePage,
    pub strokes: Vec<Stroke>,
}

#[derive(Debug)]
pub struct ScoreEditor {
    config: EditorConfig,
    page: ScorePage,
    engine: PlacementEngine,
    cursor: PlacementCursor,
    router: InputRouter,
    surface: DrawingSurface,
    history: UndoStack,
    metronome: Metronome,
}

impl Default for ScoreEditor {
    fn default() -> Self {
        Self::build(EditorConfig::default(), NotationCatalog::builtin())
    }
}

impl ScoreEditor {
    pub fn new(config: EditorConfig) -> Result<Self> {
        Self::with_catalog(config, NotationCatalog::builtin())
    }

    /// Create a session; the configuration is validated first
    pub fn with_catalog(config: EditorConfig, catalog: NotationCatalog) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, catalog))
    }

    fn build(config: EditorConfig, catalog: NotationCatalog) -> Self {
        let engine = PlacementEngine::new(config.layout.clone());
        let cursor = PlacementCursor::initial(engine.layout());
        let mut router = InputRouter::new(catalog);
        if config.keyboard_enabled {
            router.enable_keyboard();
        }
        let page = ScorePage::new();
        let metronome = Metronome::new(page.settings.tempo_bpm);

        Self {
            surface: DrawingSurface::new(config.eraser_radius),
            history: UndoStack::new(config.undo_limit),
            config,
            page,
            engine,
            cursor,
            router,
            metronome,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn page(&self) -> &ScorePage {
        &self.page
    }

    pub fn cursor(&self) -> PlacementCursor {
        self.cursor
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn metronome(&self) -> &Metronome {
        &self.metronome
    }

    pub fn catalog(&self) -> &NotationCatalog {
        self.router.catalog()
    }

    pub fn set_catalog(&mut self, catalog: NotationCatalog) {
        log::info!("notation catalog replaced ({} entries)", catalog.len());
        self.router.set_catalog(catalog);
    }

    fn resync(&mut self) {
        self.cursor.resync(&self.page.notes, self.engine.layout());
    }

    // ------------------------------------------------------------------
    // Keyboard / MIDI pipeline
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, input: &KeyInput) -> EditOutcome {
        match self.router.route_key(input) {
            Some(command) => self.dispatch(command),
            None => EditOutcome::Ignored,
        }
    }

    pub fn handle_midi(&mut self, bytes: &[u8]) -> EditOutcome {
        match self.router.route_midi(bytes) {
            Some(command) => self.dispatch(command),
            None => EditOutcome::Ignored,
        }
    }

    pub fn dispatch(&mut self, command: InputCommand) -> EditOutcome {
        match command {
            InputCommand::Place(notation) => self.place_notation(notation),
            InputCommand::DeleteLast => self.delete_last(),
            InputCommand::AdvanceLine => self.advance_line(),
        }
    }

    /// Place a notation at the cursor
    pub fn place_notation(&mut self, notation: Arc<Notation>) -> EditOutcome {
        let page = &mut self.page;
        match self.engine.place(notation, &self.cursor, || page.allocate_note_id()) {
            Ok((note, cursor)) => {
                log::debug!("placed '{}' at ({}, {})", note.symbol(), note.x, note.y);
                self.page.add_note(note.clone());
                self.history.push(Command::AddNote { note: note.clone() });
                self.cursor = cursor;
                self.resync();
                EditOutcome::Placed { note }
            }
            Err(e) => {
                log::warn!("{}", e);
                EditOutcome::MaxLinesReached
            }
        }
    }

    /// Remove the most recently placed note
    pub fn delete_last(&mut self) -> EditOutcome {
        let Some(last) = self.page.last_note() else {
            return EditOutcome::NothingToRemove;
        };
        let index = self.page.notes.len() - 1;
        let id = last.id;
        match self.page.remove_note(id) {
            Some(note) => {
                self.history.push(Command::RemoveNote { index, note: note.clone() });
                self.resync();
                EditOutcome::Removed { note }
            }
            None => EditOutcome::NothingToRemove,
        }
    }

    /// Move the cursor to the start of the next grid line
    pub fn advance_line(&mut self) -> EditOutcome {
        match self.cursor.advance_line(self.engine.layout()) {
            Ok(()) => EditOutcome::LineAdvanced {
                line_index: self.cursor.line_index,
            },
            Err(e) => {
                log::warn!("{}", e);
                EditOutcome::LastLineReached
            }
        }
    }

    /// Manual placement at a pointer position, clamped into the page margin.
    /// Bypasses the grid and the cursor.
    pub fn place_at(&mut self, symbol: char, x: f64, y: f64) -> Result<Option<PlacedNotation>> {
        if self.router.context().active_tool.is_drawing() {
            return Err(ScoreError::DrawingToolActive);
        }
        let Some(notation) = self.catalog().by_key(symbol) else {
            log::debug!("no notation for symbol '{}'", symbol);
            return Ok(None);
        };
        let (x, y) = self.engine.clamp_to_page(x, y);
        let note = PlacedNotation::new(self.page.allocate_note_id(), notation, x, y);
        self.page.add_note(note.clone());
        self.history.push(Command::AddNote { note: note.clone() });
        self.resync();
        Ok(Some(note))
    }

    pub fn remove_note(&mut self, id: NoteId) -> Result<PlacedNotation> {
        let index = self.page.note_index(id).ok_or(ScoreError::NoteNotFound(id))?;
        let note = self
            .page
            .remove_note(id)
            .ok_or(ScoreError::NoteNotFound(id))?;
        self.history.push(Command::RemoveNote { index, note: note.clone() });
        self.resync();
        Ok(note)
    }

    /// Remove every note. Undoable.
    pub fn clear_page(&mut self) -> Vec<PlacedNotation> {
        let notes = self.page.clear_page();
        if !notes.is_empty() {
            self.history.push(Command::ClearNotes { notes: notes.clone() });
        }
        self.resync();
        notes
    }

    pub fn undo(&mut self) -> Result<()> {
        let result = self.history.undo(&mut self.page).map_err(ScoreError::History);
        self.resync();
        result
    }

    pub fn redo(&mut self) -> Result<()> {
        let result = self.history.redo(&mut self.page).map_err(ScoreError::History);
        self.resync();
        result
    }

    // ------------------------------------------------------------------
    // Save / load
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            page: self.page.clone(),
            strokes: self.surface.strokes().to_vec(),
        }
    }

    /// Replace the page. History is dropped, the cursor rebuilt and a
    /// running metronome stopped.
    pub fn load(&mut self, snapshot: PageSnapshot, timers: &mut impl TimerHost) {
        let PageSnapshot { mut page, strokes } = snapshot;
        self.metronome.stop(timers);
        page.normalize_ids();
        log::info!(
            "loaded page: {} notes, {} text elements, {} strokes",
            page.notes.len(),
            page.text_elements.len(),
            strokes.len()
        );
        self.metronome = Metronome::new(page.settings.tempo_bpm);
        self.page = page;
        self.surface.load_strokes(strokes);
        self.history.clear();
        self.resync();
    }

    // ------------------------------------------------------------------
    // Text elements and settings
    // ------------------------------------------------------------------

    pub fn add_text_element(&mut self, text: &str, x: f64, y: f64) -> TextElement {
        let (x, y) = self.engine.clamp_to_page(x, y);
        self.page.add_text_element(text, x, y).clone()
    }

    pub fn update_text_element(&mut self, id: TextId, patch: &TextElementPatch) -> Result<TextElement> {
        self.page
            .update_text_element(id, patch)
            .cloned()
            .ok_or(ScoreError::TextElementNotFound(id))
    }

    pub fn remove_text_element(&mut self, id: TextId) -> Result<TextElement> {
        self.page
            .remove_text_element(id)
            .ok_or(ScoreError::TextElementNotFound(id))
    }

    /// Apply a settings patch. A tempo change retimes a running metronome.
    /// Nothing on the page changes if the patch is invalid or the metronome
    /// cannot be retimed.
    pub fn update_page_settings(
        &mut self,
        patch: &PageSettingsPatch,
        timers: &mut impl TimerHost,
    ) -> Result<()> {
        patch.validate()?;
        if let Some(tempo) = patch.tempo_bpm {
            self.metronome.set_tempo(tempo, timers)?;
        }
        self.page.update_page_settings(patch)?;
        Ok(())
    }

    pub fn start_metronome(&mut self, timers: &mut impl TimerHost) -> Result<()> {
        self.metronome.start(timers)
    }

    pub fn stop_metronome(&mut self, timers: &mut impl TimerHost) {
        self.metronome.stop(timers)
    }

    // ------------------------------------------------------------------
    // Input modes
    // ------------------------------------------------------------------

    pub fn set_input_context(&mut self, context: InputContext) {
        self.router.set_context(context);
        self.surface.set_tool(context.active_tool);
    }

    pub fn set_keyboard_mode(&mut self, enabled: bool) {
        if enabled {
            self.router.enable_keyboard();
        } else {
            self.router.disable_keyboard();
        }
    }

    pub fn set_midi_mode(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.router.enable_midi()
        } else {
            self.router.disable_midi();
            Ok(())
        }
    }

    pub fn is_input_enabled(&self, source: InputSource) -> bool {
        self.router.is_enabled(source)
    }

    pub fn midi_access(&self) -> &MidiAccess {
        self.router.midi_access()
    }

    pub fn midi_access_requested(&mut self) {
        self.router.midi_access_requested();
    }

    pub fn midi_access_granted(&mut self) {
        self.router.midi_access_granted();
    }

    pub fn midi_access_failed(&mut self, reason: &str) {
        self.router.midi_access_failed(reason);
    }

    pub fn midi_unsupported(&mut self) {
        self.router.midi_unsupported();
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Select the drawing tool; returns true if the stroke list changed
    pub fn set_active_tool(&mut self, tool: ActiveTool) -> bool {
        self.router.set_active_tool(tool);
        self.surface.set_tool(tool)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.surface.pointer_down(Point::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.surface.pointer_move(Point::new(x, y))
    }

    pub fn pointer_up(&mut self) -> bool {
        self.surface.pointer_up()
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.surface.pointer_leave()
    }

    pub fn redraw(&self, target: &mut impl RenderTarget) {
        self.surface.redraw(target);
    }

    pub fn clear_drawing(&mut self) -> Vec<Stroke> {
        self.surface.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_places_at_cursor() {
        let mut editor = ScoreEditor::default();
        let outcome = editor.handle_key(&KeyInput::new("c"));
        match outcome {
            EditOutcome::Placed { note } => {
                assert_eq!((note.x, note.y), (170.0, 230.0));
                assert_eq!(note.symbol(), 'c');
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(editor.cursor(), PlacementCursor { next_x: 220.0, line_index: 0 });
    }

    #[test]
    fn test_backspace_on_empty_page() {
        let mut editor = ScoreEditor::default();
        assert_eq!(editor.handle_key(&KeyInput::new("Backspace")), EditOutcome::NothingToRemove);
    }

    #[test]
    fn test_manual_click_rejected_while_drawing() {
        let mut editor = ScoreEditor::default();
        editor.set_active_tool(ActiveTool::Pen);
        assert!(matches!(editor.place_at('a', 300.0, 300.0), Err(ScoreError::DrawingToolActive)));
        assert!(editor.page().notes.is_empty());
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let json = serde_json::to_string(&EditOutcome::LineAdvanced { line_index: 2 }).unwrap();
        assert_eq!(json, r#"{"kind":"lineAdvanced","lineIndex":2}"#);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EditorConfig::default();
        config.layout.line_ys.clear();
        assert!(matches!(ScoreEditor::new(config), Err(ScoreError::Config(_))));
        assert!(ScoreEditor::new(EditorConfig::default()).is_ok());
    }
}
