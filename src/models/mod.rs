//! Models module for the scoresheet editor
//!
//! Plain data records shared between the placement core, the drawing
//! surface and the WASM API.

pub mod notation;
pub mod page;
pub mod placed;
pub mod text;

// Re-export commonly used types
pub use notation::*;
pub use page::*;
pub use placed::*;
pub use text::*;
