//! Undo/redo history for note edits
//!
//! Every note-list mutation the editor performs is recorded as a reversible
//! command. Undo and redo change the note list out of band, so the editor
//! resyncs the placement cursor after each of them.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::{PlacedNotation, ScoreHost, ScorePage};

/// Represents a reversible note edit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A note appended to the end of the list
    AddNote { note: PlacedNotation },
    /// A note removed from a position in the list
    RemoveNote {
        index: usize,
        /// The removed note (for restoration)
        note: PlacedNotation,
    },
    /// The whole note list cleared
    ClearNotes { notes: Vec<PlacedNotation> },
}

impl Command {
    /// Execute this command on the page
    pub fn execute(&self, page: &mut ScorePage) -> Result<(), String> {
        match self {
            Command::AddNote { note } => {
                page.add_note(note.clone());
                Ok(())
            }
            Command::RemoveNote { note, .. } => page
                .remove_note(note.id)
                .map(|_| ())
                .ok_or_else(|| format!("Note {} not found", note.id)),
            Command::ClearNotes { .. } => {
                page.clear_page();
                Ok(())
            }
        }
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, page: &mut ScorePage) -> Result<(), String> {
        match self {
            Command::AddNote { note } => page
                .remove_note(note.id)
                .map(|_| ())
                .ok_or_else(|| format!("Note {} not found", note.id)),
            Command::RemoveNote { index, note } => {
                page.insert_note(*index, note.clone());
                Ok(())
            }
            Command::ClearNotes { notes } => {
                page.notes = notes.clone();
                Ok(())
            }
        }
    }
}

/// Manages undo/redo command history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    pub commands: VecDeque<Command>,
    /// Current position in the stack (for redo support)
    pub current_index: usize,
    /// Maximum number of commands to keep in history
    max_size: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoStack {
    /// Create a new undo stack with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            current_index: 0,
            max_size: max_size.max(1),
        }
    }

    /// Record an executed command; any redo history is discarded
    pub fn push(&mut self, command: Command) {
        self.commands.truncate(self.current_index);
        self.commands.push_back(command);
        self.current_index = self.commands.len();

        // Enforce max size
        if self.commands.len() > self.max_size {
            self.commands.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Undo the last command
    pub fn undo(&mut self, page: &mut ScorePage) -> Result<(), String> {
        if !self.can_undo() {
            return Err("No undo history available".to_string());
        }

        let command = &self.commands[self.current_index - 1];
        command.undo(page)?;
        self.current_index -= 1;
        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self, page: &mut ScorePage) -> Result<(), String> {
        if !self.can_redo() {
            return Err("No redo history available".to_string());
        }

        let command = &self.commands[self.current_index];
        command.execute(page)?;
        self.current_index += 1;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.commands.len()
    }

    /// Clear all undo history
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = 0;
    }

    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    pub fn redo_count(&self) -> usize {
        self.commands.len() - self.current_index
    }
}
