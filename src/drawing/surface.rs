//! Drawing surface: pointer gestures to strokes
//!
//! The surface is idle, drawing with the pen, or erasing. Pointer-down starts
//! a gesture for the selected tool; pointer-up or pointer-leave ends it.
//!
//! The eraser edits the committed stroke list instead of painting over
//! pixels, so a full redraw never brings erased ink back.

use serde::{Deserialize, Serialize};

use crate::config::ERASER_RADIUS;

use super::render::RenderTarget;
use super::stroke::{Point, Stroke};
use super::tool::ActiveTool;

pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DrawingState {
    #[default]
    Idle,
    PenDrawing,
    Erasing,
}

#[derive(Clone, Debug)]
pub struct DrawingSurface {
    tool: ActiveTool,
    state: DrawingState,
    current: Vec<Point>,
    strokes: Vec<Stroke>,
    eraser_radius: f64,
    line_width: f64,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new(ERASER_RADIUS)
    }
}

impl DrawingSurface {
    pub fn new(eraser_radius: f64) -> Self {
        Self {
            tool: ActiveTool::None,
            state: DrawingState::Idle,
            current: Vec::new(),
            strokes: Vec::new(),
            eraser_radius,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    pub fn tool(&self) -> ActiveTool {
        self.tool
    }

    pub fn state(&self) -> DrawingState {
        self.state
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Points of the pen gesture in progress
    pub fn current_stroke(&self) -> &[Point] {
        &self.current
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn set_line_width(&mut self, line_width: f64) {
        self.line_width = line_width;
    }

    /// Select a tool. A gesture in progress ends as if the pointer was
    /// released. Returns true if the stroke list changed.
    pub fn set_tool(&mut self, tool: ActiveTool) -> bool {
        let changed = if self.tool != tool {
            self.end_gesture()
        } else {
            false
        };
        self.tool = tool;
        changed
    }

    /// Returns true if the stroke list changed
    pub fn pointer_down(&mut self, point: Point) -> bool {
        match self.tool {
            ActiveTool::None => false,
            ActiveTool::Pen => {
                self.state = DrawingState::PenDrawing;
                self.current.clear();
                self.current.push(point);
                false
            }
            ActiveTool::Eraser => {
                self.state = DrawingState::Erasing;
                self.erase_at(point)
            }
        }
    }

    /// Returns true if the stroke list changed
    pub fn pointer_move(&mut self, point: Point) -> bool {
        match self.state {
            DrawingState::Idle => false,
            DrawingState::PenDrawing => {
                self.current.push(point);
                false
            }
            DrawingState::Erasing => self.erase_at(point),
        }
    }

    /// Returns true if a stroke was committed
    pub fn pointer_up(&mut self) -> bool {
        self.end_gesture()
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.end_gesture()
    }

    fn end_gesture(&mut self) -> bool {
        let committed = match self.state {
            DrawingState::PenDrawing => self.commit_current(),
            DrawingState::Idle | DrawingState::Erasing => false,
        };
        self.current.clear();
        self.state = DrawingState::Idle;
        committed
    }

    fn commit_current(&mut self) -> bool {
        let points = std::mem::take(&mut self.current);
        let count = points.len();
        match Stroke::from_points(points) {
            Some(stroke) => {
                log::debug!("committed stroke with {} points", count);
                self.strokes.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Erase ink under a circle of the eraser radius centered at `point`.
    /// Returns true if any stroke was cut or removed.
    pub fn erase_at(&mut self, point: Point) -> bool {
        let radius = self.eraser_radius;
        if !self.strokes.iter().any(|s| s.hit(point, radius)) {
            return false;
        }
        let strokes = std::mem::take(&mut self.strokes);
        self.strokes = strokes
            .into_iter()
            .flat_map(|stroke| {
                if stroke.hit(point, radius) {
                    stroke.erase(point, radius)
                } else {
                    vec![stroke]
                }
            })
            .collect();
        true
    }

    /// Clear the target and replay every committed stroke in order
    pub fn redraw(&self, target: &mut impl RenderTarget) {
        target.clear();
        for stroke in &self.strokes {
            target.draw_polyline(stroke.points(), self.line_width);
        }
    }

    /// Replace the stroke list (page load, undo of a clear)
    pub fn load_strokes(&mut self, strokes: Vec<Stroke>) {
        self.end_gesture();
        self.strokes = strokes
            .into_iter()
            .filter(|s| s.points().len() >= Stroke::MIN_POINTS)
            .collect();
    }

    pub fn clear(&mut self) -> Vec<Stroke> {
        self.end_gesture();
        std::mem::take(&mut self.strokes)
    }
}
