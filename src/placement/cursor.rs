//! Next-placement cursor
//!
//! The cursor is derived state: after any change to the note list it is
//! rebuilt from the last note with [`PlacementCursor::resync`] instead of
//! being patched incrementally.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::PlacementError;
use crate::models::PlacedNotation;

/// Tolerance when matching a note's y against the grid
const GRID_EPSILON: f64 = 1e-6;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementCursor {
    /// X of the next automatically placed note
    pub next_x: f64,
    /// Active grid line, always `< layout.line_ys.len()`
    pub line_index: usize,
}

impl PlacementCursor {
    pub fn initial(layout: &LayoutConfig) -> Self {
        Self {
            next_x: layout.left_boundary,
            line_index: 0,
        }
    }

    pub fn reset(&mut self, layout: &LayoutConfig) {
        *self = Self::initial(layout);
    }

    /// Rebuild from the note list. Notes off the grid (manual clicks) map to
    /// line 0.
    pub fn resync(&mut self, notes: &[PlacedNotation], layout: &LayoutConfig) {
        *self = Self::derive(notes, layout);
    }

    pub fn derive(notes: &[PlacedNotation], layout: &LayoutConfig) -> Self {
        match notes.last() {
            None => Self::initial(layout),
            Some(last) => Self {
                next_x: last.x + layout.x_increment,
                line_index: grid_index(layout, last.y).unwrap_or(0),
            },
        }
    }

    /// Move to the start of the next grid line
    pub fn advance_line(&mut self, layout: &LayoutConfig) -> Result<(), PlacementError> {
        if self.line_index + 1 >= layout.line_ys.len() {
            return Err(PlacementError::LastLineReached);
        }
        self.line_index += 1;
        self.next_x = layout.left_boundary;
        Ok(())
    }

    /// Y of the active grid line
    pub fn line_y(&self, layout: &LayoutConfig) -> f64 {
        layout.line_ys[self.line_index.min(layout.line_ys.len() - 1)]
    }

    pub fn is_on_last_line(&self, layout: &LayoutConfig) -> bool {
        self.line_index + 1 >= layout.line_ys.len()
    }
}

/// Index of `y` in the grid, if it is a grid line
pub fn grid_index(layout: &LayoutConfig, y: f64) -> Option<usize> {
    layout
        .line_ys
        .iter()
        .position(|&line_y| (line_y - y).abs() < GRID_EPSILON)
}
