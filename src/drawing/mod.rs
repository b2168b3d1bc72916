//! Freehand annotation
//!
//! - `tool`: the toolbar's active tool
//! - `stroke`: stroke geometry and vector erasure
//! - `surface`: gesture state machine and committed stroke list
//! - `render`: replay targets (in-memory raster)

pub mod render;
pub mod stroke;
pub mod surface;
pub mod tool;

pub use render::{Raster, RenderTarget};
pub use stroke::{Point, Stroke};
pub use surface::{DrawingState, DrawingSurface};
pub use tool::ActiveTool;
