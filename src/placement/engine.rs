//! Automatic and manual note placement

use std::sync::Arc;

use crate::config::LayoutConfig;
use crate::error::PlacementError;
use crate::models::{Notation, NoteId, PlacedNotation};

use super::cursor::PlacementCursor;

/// Computes where notes land on the page
#[derive(Clone, Debug, Default)]
pub struct PlacementEngine {
    layout: LayoutConfig,
}

impl PlacementEngine {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Place `notation` at the cursor, wrapping to the next grid line when the
    /// note would cross the right boundary.
    ///
    /// On overflow nothing is allocated and the caller's cursor is untouched.
    /// The id is only requested once the position is known to fit.
    pub fn place(
        &self,
        notation: Arc<Notation>,
        cursor: &PlacementCursor,
        next_id: impl FnOnce() -> NoteId,
    ) -> Result<(PlacedNotation, PlacementCursor), PlacementError> {
        let layout = &self.layout;
        let mut line_index = cursor.line_index;
        let mut x = cursor.next_x;

        if x + layout.notation_width > layout.right_boundary {
            if line_index + 1 >= layout.line_ys.len() {
                return Err(PlacementError::Overflow);
            }
            line_index += 1;
            x = layout.left_boundary;
        }

        let y = layout.line_ys[line_index];
        let note = PlacedNotation::new(next_id(), notation, x, y);
        let updated = PlacementCursor {
            next_x: x + layout.x_increment,
            line_index,
        };
        Ok((note, updated))
    }

    /// Clamp a pointer position into the page interior for manual placement.
    /// The grid is not consulted.
    pub fn clamp_to_page(&self, x: f64, y: f64) -> (f64, f64) {
        let layout = &self.layout;
        let margin = layout.page_margin;
        (
            x.clamp(margin, layout.page_width - margin),
            y.clamp(margin, layout.page_height - margin),
        )
    }

    pub fn cursor_for(&self, notes: &[PlacedNotation]) -> PlacementCursor {
        PlacementCursor::derive(notes, &self.layout)
    }
}
