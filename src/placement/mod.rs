//! Automatic note placement
//!
//! - `cursor`: the derived next-placement cursor
//! - `engine`: position computation with line wrap and overflow

pub mod cursor;
pub mod engine;

pub use cursor::{grid_index, PlacementCursor};
pub use engine::PlacementEngine;
